//! Learning roadmap toward a target role.

use serde::{Deserialize, Serialize};

use super::prompts::{render_task_prompt, ROADMAP_EXAMPLE, ROADMAP_PROMPT_TEMPLATE};
use super::skills::{missing_adjacent, rank_domains, SkillDomain};
use crate::models::lenient;
use crate::models::profile::RoadmapPayload;
use crate::orchestrator::{CareerTask, TaskKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerRoadmap {
    pub target_role: String,
    #[serde(deserialize_with = "lenient::count")]
    pub total_months: u32,
    #[serde(default)]
    pub phases: Vec<RoadmapPhase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapPhase {
    pub title: String,
    #[serde(deserialize_with = "lenient::count")]
    pub duration_months: u32,
    #[serde(default)]
    pub focus_skills: Vec<String>,
    #[serde(default)]
    pub milestones: Vec<String>,
}

impl RoadmapPayload {
    /// The requested role, or the next rung up from the caller's strongest domain.
    pub fn resolved_target_role(&self) -> String {
        if let Some(role) = self
            .target_role
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
        {
            return role.to_string();
        }
        let lead = rank_domains(&self.profile.skills())[0].domain;
        lead.profile().ladder[2].to_string()
    }
}

pub struct RoadmapTask;

impl CareerTask for RoadmapTask {
    const KIND: TaskKind = TaskKind::Roadmap;
    type Payload = RoadmapPayload;
    type Output = CareerRoadmap;

    fn build_prompt(payload: &RoadmapPayload) -> String {
        let target_role = payload.resolved_target_role();
        render_task_prompt(
            ROADMAP_PROMPT_TEMPLATE,
            ROADMAP_EXAMPLE,
            &payload.profile,
            &[("target_role", &target_role)],
        )
    }

    /// Three phases: close the gaps for the target role's domain, apply them in projects,
    /// then prepare for the move. `totalMonths` is always the sum of the phases.
    fn synthesize(payload: &RoadmapPayload) -> CareerRoadmap {
        let target_role = payload.resolved_target_role();
        let skills = payload.profile.skills();
        let target_domain = SkillDomain::of_skill(&target_role);
        let domain = if target_domain == SkillDomain::Generalist {
            rank_domains(&skills)[0].domain
        } else {
            target_domain
        };

        let mut gaps = missing_adjacent(domain, &skills, 3);
        if gaps.is_empty() {
            gaps.push("System Design".to_string());
        }
        let foundation_months = if payload.profile.years_of_experience() >= 3 { 2 } else { 3 };

        let phases = vec![
            RoadmapPhase {
                title: "Close the skill gaps".to_string(),
                duration_months: foundation_months,
                milestones: gaps
                    .iter()
                    .take(2)
                    .map(|g| format!("Complete a structured course in {g}"))
                    .collect(),
                focus_skills: gaps.clone(),
            },
            RoadmapPhase {
                title: "Build portfolio projects".to_string(),
                duration_months: 3,
                focus_skills: gaps.iter().take(2).cloned().collect(),
                milestones: vec![
                    format!("Ship a project that a {target_role} would own"),
                    "Publish a write-up of the design decisions".to_string(),
                ],
            },
            RoadmapPhase {
                title: "Prepare for the transition".to_string(),
                duration_months: 2,
                focus_skills: vec!["Interviewing".to_string(), "Networking".to_string()],
                milestones: vec![
                    "Practice 10 mock interviews".to_string(),
                    format!("Apply to 15 {target_role} openings"),
                ],
            },
        ];

        CareerRoadmap {
            total_months: phases.iter().map(|p| p.duration_months).sum(),
            target_role,
            phases,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::ProfileInput;

    fn payload(target: Option<&str>, skills: &[&str]) -> RoadmapPayload {
        RoadmapPayload {
            target_role: target.map(String::from),
            profile: ProfileInput {
                skills: skills.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_total_months_is_sum_of_phases() {
        let roadmap = RoadmapTask::synthesize(&payload(Some("Data Scientist"), &["Excel"]));
        let sum: u32 = roadmap.phases.iter().map(|p| p.duration_months).sum();
        assert_eq!(roadmap.total_months, sum);
        assert_eq!(roadmap.target_role, "Data Scientist");
    }

    #[test]
    fn test_target_role_domain_drives_focus_skills() {
        let roadmap = RoadmapTask::synthesize(&payload(Some("Cloud Architect"), &["React"]));
        assert_eq!(roadmap.phases[0].focus_skills[0], "Kubernetes");
    }

    #[test]
    fn test_missing_target_role_uses_next_rung() {
        let p = payload(Some("  "), &["React"]);
        assert_eq!(p.resolved_target_role(), "Senior Frontend Engineer");
        assert!(RoadmapTask::build_prompt(&p).contains("the role of Senior Frontend Engineer"));
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let p = payload(None, &["Python"]);
        assert_eq!(RoadmapTask::synthesize(&p), RoadmapTask::synthesize(&p));
    }
}
