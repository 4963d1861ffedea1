//! Orchestration core: task kinds, the per-task contract, and the pipeline that
//! turns a payload into a result without ever failing the caller.
//!
//! Flow per call: build prompt → invoke candidates → normalize → return,
//! with any failure diverted to the task's fallback synthesizer.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::llm_client::normalize::{ResponseSchema, ResultShape};

pub mod pipeline;
pub mod tracker;

pub use pipeline::{FallbackReason, Outcome, ResultSource};
pub use tracker::{RequestTicket, RequestTracker};

/// Which domain computation a prompt/response pair belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    CareerTwin,
    Trajectory,
    InterviewEval,
    JobMatch,
    SkillDemand,
    Roadmap,
    Simulation,
}

impl TaskKind {
    pub const ALL: [TaskKind; 7] = [
        TaskKind::CareerTwin,
        TaskKind::Trajectory,
        TaskKind::InterviewEval,
        TaskKind::JobMatch,
        TaskKind::SkillDemand,
        TaskKind::Roadmap,
        TaskKind::Simulation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::CareerTwin => "career_twin",
            TaskKind::Trajectory => "trajectory",
            TaskKind::InterviewEval => "interview_eval",
            TaskKind::JobMatch => "job_match",
            TaskKind::SkillDemand => "skill_demand",
            TaskKind::Roadmap => "roadmap",
            TaskKind::Simulation => "simulation",
        }
    }

    /// Shape and top-level keys every result of this kind carries, model-made or synthesized.
    pub fn schema(self) -> ResponseSchema {
        let (shape, required_keys): (ResultShape, &'static [&'static str]) = match self {
            TaskKind::CareerTwin => (
                ResultShape::Object,
                &[
                    "professionalIdentity",
                    "strengthsAndDifferentiators",
                    "roleSuitability",
                    "growthPotential",
                    "riskFactorsAndImprovements",
                ],
            ),
            TaskKind::Trajectory => (
                ResultShape::Object,
                &["currentLevel", "projections", "growthRate", "recommendedSkills"],
            ),
            TaskKind::InterviewEval => (
                ResultShape::Object,
                &[
                    "overallScore",
                    "strengths",
                    "improvements",
                    "detailedFeedback",
                    "followUpSuggestions",
                ],
            ),
            TaskKind::JobMatch => (
                ResultShape::Array,
                &[
                    "title",
                    "company",
                    "matchScore",
                    "matchingSkills",
                    "missingSkills",
                    "reason",
                ],
            ),
            TaskKind::SkillDemand => (
                ResultShape::Array,
                &["industry", "skill", "demandScore", "growthRate"],
            ),
            TaskKind::Roadmap => (ResultShape::Object, &["targetRole", "totalMonths", "phases"]),
            TaskKind::Simulation => (
                ResultShape::Object,
                &["scenario", "outcomes", "salaryImpactPercent", "recommendation"],
            ),
        };
        ResponseSchema {
            shape,
            required_keys,
        }
    }

    /// Kinds whose fallback draws a cosmetic growth percentage at random.
    pub fn has_randomized_fallback(self) -> bool {
        matches!(self, TaskKind::Trajectory | TaskKind::SkillDemand)
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown task kind '{0}'")]
pub struct UnknownTaskKind(pub String);

impl FromStr for TaskKind {
    type Err = UnknownTaskKind;

    /// Accepts `career_twin`, `career-twin` and `careerTwin` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        TaskKind::ALL
            .into_iter()
            .find(|k| k.as_str().replace('_', "") == normalized)
            .ok_or_else(|| UnknownTaskKind(s.to_string()))
    }
}

/// One task kind's contribution to the pipeline: how to ask, and what to say
/// when asking did not work.
///
/// Both paths produce `Output`, so model results and fallbacks share one shape.
pub trait CareerTask {
    const KIND: TaskKind;

    type Payload: Send + Sync;
    type Output: Serialize + DeserializeOwned + Send;

    /// Pure and deterministic. Missing payload fields are replaced by named defaults.
    fn build_prompt(payload: &Self::Payload) -> String;

    /// Infallible, schema-valid substitute built from the payload alone.
    fn synthesize(payload: &Self::Payload) -> Self::Output;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_kind_round_trips_through_str() {
        for kind in TaskKind::ALL {
            assert_eq!(kind.as_str().parse::<TaskKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_task_kind_accepts_url_and_camel_spellings() {
        assert_eq!("career-twin".parse::<TaskKind>().unwrap(), TaskKind::CareerTwin);
        assert_eq!("skillDemand".parse::<TaskKind>().unwrap(), TaskKind::SkillDemand);
        assert!("horoscope".parse::<TaskKind>().is_err());
    }

    #[test]
    fn test_task_kind_serde_is_snake_case() {
        let json = serde_json::to_string(&TaskKind::InterviewEval).unwrap();
        assert_eq!(json, "\"interview_eval\"");
    }

    #[test]
    fn test_every_kind_requires_keys() {
        for kind in TaskKind::ALL {
            assert!(!kind.schema().required_keys.is_empty(), "{kind} has no keys");
        }
    }
}
