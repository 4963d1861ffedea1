//! Career trajectory prediction: where the caller's current path leads over 5 years.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::prompts::{render_task_prompt, TRAJECTORY_EXAMPLE, TRAJECTORY_PROMPT_TEMPLATE};
use super::skills::{missing_adjacent, rank_domains};
use crate::models::lenient;
use crate::models::profile::ProfileInput;
use crate::orchestrator::{CareerTask, TaskKind};

/// Closed range of the cosmetic growth percentage drawn by fallbacks.
pub const FALLBACK_GROWTH_RANGE: std::ops::RangeInclusive<u32> = 5..=24;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryPrediction {
    pub current_level: String,
    #[serde(default)]
    pub projections: Vec<Projection>,
    #[serde(deserialize_with = "lenient::percent")]
    pub growth_rate: f64,
    #[serde(default)]
    pub recommended_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    #[serde(deserialize_with = "lenient::count")]
    pub years_from_now: u32,
    pub role: String,
    #[serde(deserialize_with = "lenient::score")]
    pub confidence: u8,
}

/// Seniority label for a number of years in the field.
pub fn level_for_years(years: u32) -> &'static str {
    match years {
        0..=1 => "Entry Level",
        2..=4 => "Mid Level",
        5..=9 => "Senior Level",
        _ => "Lead Level",
    }
}

/// Random growth percentage from `FALLBACK_GROWTH_RANGE`.
pub fn random_growth_rate() -> f64 {
    f64::from(rand::thread_rng().gen_range(FALLBACK_GROWTH_RANGE))
}

pub struct TrajectoryTask;

impl CareerTask for TrajectoryTask {
    const KIND: TaskKind = TaskKind::Trajectory;
    type Payload = ProfileInput;
    type Output = TrajectoryPrediction;

    fn build_prompt(profile: &ProfileInput) -> String {
        render_task_prompt(TRAJECTORY_PROMPT_TEMPLATE, TRAJECTORY_EXAMPLE, profile, &[])
    }

    fn synthesize(profile: &ProfileInput) -> TrajectoryPrediction {
        let skills = profile.skills();
        let lead = rank_domains(&skills)[0].domain;
        let ladder = lead.profile().ladder;
        let years = profile.years_of_experience();

        // starting rung by experience, then one step per projection, capped at the top
        let start = match years {
            0..=1 => 0,
            2..=4 => 1,
            _ => 2,
        };
        let projections = [(1u32, 90u8), (3, 75), (5, 60)]
            .into_iter()
            .enumerate()
            .map(|(step, (years_from_now, confidence))| Projection {
                years_from_now,
                role: ladder[(start + step).min(ladder.len() - 1)].to_string(),
                confidence,
            })
            .collect();

        TrajectoryPrediction {
            current_level: level_for_years(years).to_string(),
            projections,
            growth_rate: random_growth_rate(),
            recommended_skills: missing_adjacent(lead, &skills, 3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_years() {
        assert_eq!(level_for_years(0), "Entry Level");
        assert_eq!(level_for_years(3), "Mid Level");
        assert_eq!(level_for_years(7), "Senior Level");
        assert_eq!(level_for_years(15), "Lead Level");
    }

    #[test]
    fn test_fallback_growth_rate_stays_in_range() {
        for _ in 0..200 {
            let prediction = TrajectoryTask::synthesize(&ProfileInput::default());
            assert!((5.0..=24.0).contains(&prediction.growth_rate));
        }
    }

    #[test]
    fn test_fallback_projections_climb_the_ladder() {
        let prediction = TrajectoryTask::synthesize(&ProfileInput {
            skills: vec!["Python".into(), "SQL".into()],
            experience: Some("3 years".into()),
            ..Default::default()
        });
        let roles: Vec<&str> = prediction.projections.iter().map(|p| p.role.as_str()).collect();
        assert_eq!(
            roles,
            vec!["Data Scientist", "Senior Data Scientist", "Machine Learning Lead"]
        );
        assert_eq!(prediction.current_level, "Mid Level");
        assert!(!prediction.recommended_skills.iter().any(|s| s == "SQL"));
    }

    #[test]
    fn test_senior_profiles_cap_at_top_rung() {
        let prediction = TrajectoryTask::synthesize(&ProfileInput {
            skills: vec!["Go".into()],
            experience: Some("12 years".into()),
            ..Default::default()
        });
        assert_eq!(prediction.projections[2].role, "Principal Engineer");
        assert_eq!(prediction.projections[1].role, "Principal Engineer");
    }
}
