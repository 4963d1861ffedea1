//! Career Twin: a professional "digital twin" of the caller.
//!
//! The fallback ranks the caller's skills by domain and builds one suitability entry per
//! ranked domain, padded with the strongest domain's ladder so there are always 3 roles.

use serde::{Deserialize, Serialize};

use super::prompts::{render_task_prompt, CAREER_TWIN_EXAMPLE, CAREER_TWIN_PROMPT_TEMPLATE};
use super::skills::{missing_adjacent, rank_domains};
use crate::models::lenient;
use crate::models::profile::ProfileInput;
use crate::orchestrator::{CareerTask, TaskKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerTwinProfile {
    pub professional_identity: ProfessionalIdentity,
    pub strengths_and_differentiators: StrengthsAndDifferentiators,
    pub role_suitability: Vec<RoleSuitability>,
    pub growth_potential: GrowthPotential,
    pub risk_factors_and_improvements: RiskFactorsAndImprovements,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalIdentity {
    pub archetype: String,
    pub summary: String,
    #[serde(default)]
    pub core_values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrengthsAndDifferentiators {
    #[serde(default)]
    pub top_strengths: Vec<String>,
    #[serde(default)]
    pub unique_differentiators: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSuitability {
    pub role: String,
    #[serde(deserialize_with = "lenient::score")]
    pub fit_score: u8,
    #[serde(default)]
    pub key_matching_skills: Vec<String>,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthPotential {
    #[serde(deserialize_with = "lenient::score")]
    pub score: u8,
    pub outlook: String,
    #[serde(default)]
    pub emerging_opportunities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFactorsAndImprovements {
    #[serde(default)]
    pub risks: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
}

pub struct CareerTwinTask;

impl CareerTask for CareerTwinTask {
    const KIND: TaskKind = TaskKind::CareerTwin;
    type Payload = ProfileInput;
    type Output = CareerTwinProfile;

    fn build_prompt(profile: &ProfileInput) -> String {
        render_task_prompt(CAREER_TWIN_PROMPT_TEMPLATE, CAREER_TWIN_EXAMPLE, profile, &[])
    }

    fn synthesize(profile: &ProfileInput) -> CareerTwinProfile {
        let skills = profile.skills();
        let ranked = rank_domains(&skills);
        let lead = ranked[0].domain;
        let lead_profile = lead.profile();
        let years = profile.years_of_experience();

        let mut roles: Vec<RoleSuitability> = ranked
            .iter()
            .take(3)
            .enumerate()
            .map(|(i, m)| {
                let key_skills = if m.skills.is_empty() {
                    profile.top_skills(3)
                } else {
                    m.skills.iter().take(3).cloned().collect()
                };
                RoleSuitability {
                    role: m.domain.profile().ladder[1].to_string(),
                    fit_score: 88u8.saturating_sub(8 * i as u8),
                    reasoning: format!(
                        "Your experience with {} maps directly onto this role.",
                        key_skills.join(", ")
                    ),
                    key_matching_skills: key_skills,
                }
            })
            .collect();

        // pad with the lead domain's ladder so there are always 3 roles
        for rung in lead_profile.ladder.iter().skip(2) {
            if roles.len() >= 3 {
                break;
            }
            let fit_score = 88u8.saturating_sub(8 * roles.len() as u8);
            roles.push(RoleSuitability {
                role: rung.to_string(),
                fit_score,
                key_matching_skills: profile.top_skills(2),
                reasoning: "A natural next step once your core skills deepen.".to_string(),
            });
        }

        let top_strengths = profile
            .top_skills(3)
            .into_iter()
            .map(|s| format!("Hands-on ability with {s}"))
            .collect();

        let mut differentiators = vec![format!(
            "{} background combined with {}",
            profile.education_text(),
            profile.experience_text()
        )];
        if ranked.len() > 1 {
            differentiators.push("Skills that span more than one technical domain".to_string());
        }

        let gaps = missing_adjacent(lead, &skills, 2);
        let improvements = if gaps.is_empty() {
            vec!["Lead a visible project end to end to demonstrate ownership".to_string()]
        } else {
            gaps.iter().map(|g| format!("Build working depth in {g}")).collect()
        };

        CareerTwinProfile {
            professional_identity: ProfessionalIdentity {
                archetype: lead_profile.archetype.to_string(),
                summary: lead_profile.summary.to_string(),
                core_values: vec![
                    "Continuous learning".to_string(),
                    "Practical problem solving".to_string(),
                ],
            },
            strengths_and_differentiators: StrengthsAndDifferentiators {
                top_strengths,
                unique_differentiators: differentiators,
            },
            role_suitability: roles,
            growth_potential: GrowthPotential {
                score: (70 + years.min(5) * 4) as u8,
                outlook: format!(
                    "Strong demand for {} skills; a move toward {} is realistic within 2-3 years.",
                    lead_profile.industries[0], lead_profile.ladder[2]
                ),
                emerging_opportunities: lead_profile
                    .industries
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            },
            risk_factors_and_improvements: RiskFactorsAndImprovements {
                risks: vec![
                    "Skill set concentrated in a single domain".to_string(),
                    "Limited evidence of measurable project outcomes".to_string(),
                ],
                improvements,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(skills: &[&str]) -> ProfileInput {
        ProfileInput {
            skills: skills.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_fallback_echoes_react_into_role_suitability() {
        let twin = CareerTwinTask::synthesize(&profile(&["React", "Python"]));

        assert!(!twin.professional_identity.archetype.is_empty());
        assert!(twin
            .role_suitability
            .iter()
            .any(|r| r.key_matching_skills.iter().any(|s| s == "React")));
    }

    #[test]
    fn test_fallback_always_has_three_roles() {
        for skills in [&[][..], &["Figma"][..], &["React", "Go", "SQL", "AWS"][..]] {
            let twin = CareerTwinTask::synthesize(&profile(skills));
            assert_eq!(twin.role_suitability.len(), 3, "skills {skills:?}");
        }
    }

    #[test]
    fn test_fallback_scores_are_in_range() {
        let twin = CareerTwinTask::synthesize(&ProfileInput {
            experience: Some("25 years".to_string()),
            ..profile(&["Rust"])
        });
        assert!(twin.growth_potential.score <= 100);
        assert!(twin.role_suitability.iter().all(|r| r.fit_score <= 100));
    }

    #[test]
    fn test_prompt_lists_caller_skills() {
        let prompt = CareerTwinTask::build_prompt(&profile(&["React", "Python"]));
        assert!(prompt.contains("- Skills: React, Python"));
        assert!(prompt.contains("exactly 3 roles"));
    }

    #[test]
    fn test_model_output_with_string_scores_parses() {
        let raw = r#"{
            "professionalIdentity": {"archetype": "A", "summary": "S"},
            "strengthsAndDifferentiators": {},
            "roleSuitability": [{"role": "R", "fitScore": "91%", "reasoning": "x"}],
            "growthPotential": {"score": 80, "outlook": "good"},
            "riskFactorsAndImprovements": {"risks": ["r"]}
        }"#;
        let parsed: CareerTwinProfile =
            crate::llm_client::normalize::normalize(&TaskKind::CareerTwin.schema(), raw).unwrap();
        assert_eq!(parsed.role_suitability[0].fit_score, 91);
        assert!(parsed.professional_identity.core_values.is_empty());
    }
}
