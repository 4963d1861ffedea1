//! `CareerServices`: the facade the HTTP layer (or any other caller) talks to.
//!
//! Every method returns an `Outcome`: model data when a candidate answered with a
//! usable result, synthesized data otherwise. None of them can fail.

use super::heatmap::{HeatmapPoint, SkillDemandTask};
use super::interview::{InterviewEvaluation, InterviewTask};
use super::job_match::{JobMatch, JobMatchTask};
use super::roadmap::{CareerRoadmap, RoadmapTask};
use super::simulation::{SimulationResult, SimulationTask};
use super::trajectory::{TrajectoryPrediction, TrajectoryTask};
use super::twin::{CareerTwinProfile, CareerTwinTask};
use crate::llm_client::ModelInvoker;
use crate::models::profile::{InterviewPayload, ProfileInput, RoadmapPayload, SimulationPayload};
use crate::orchestrator::{pipeline, CareerTask, Outcome};

/// Built once at startup and cloned into every handler. Holds no per-call state.
#[derive(Clone)]
pub struct CareerServices {
    invoker: ModelInvoker,
}

impl CareerServices {
    pub fn new(invoker: ModelInvoker) -> Self {
        Self { invoker }
    }

    pub async fn run<T: CareerTask>(&self, payload: &T::Payload) -> Outcome<T::Output> {
        pipeline::run::<T>(&self.invoker, payload).await
    }

    pub async fn career_twin(&self, profile: &ProfileInput) -> Outcome<CareerTwinProfile> {
        self.run::<CareerTwinTask>(profile).await
    }

    pub async fn trajectory(&self, profile: &ProfileInput) -> Outcome<TrajectoryPrediction> {
        self.run::<TrajectoryTask>(profile).await
    }

    pub async fn evaluate_interview(
        &self,
        payload: &InterviewPayload,
    ) -> Outcome<InterviewEvaluation> {
        self.run::<InterviewTask>(payload).await
    }

    pub async fn match_jobs(&self, profile: &ProfileInput) -> Outcome<Vec<JobMatch>> {
        self.run::<JobMatchTask>(profile).await
    }

    pub async fn skill_demand(&self, profile: &ProfileInput) -> Outcome<Vec<HeatmapPoint>> {
        self.run::<SkillDemandTask>(profile).await
    }

    pub async fn roadmap(&self, payload: &RoadmapPayload) -> Outcome<CareerRoadmap> {
        self.run::<RoadmapTask>(payload).await
    }

    pub async fn simulate(&self, payload: &SimulationPayload) -> Outcome<SimulationResult> {
        self.run::<SimulationTask>(payload).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde::Serialize;
    use serde_json::Value;

    use super::*;
    use crate::career::prompts::*;
    use crate::llm_client::testing::{candidates, invoker, FailingTransport};
    use crate::llm_client::{ModelCandidate, ModelTransport, TransportError};
    use crate::orchestrator::{ResultSource, TaskKind};

    /// Answers every prompt with the JSON example embedded in that prompt's template.
    struct ExampleEchoTransport;

    #[async_trait]
    impl ModelTransport for ExampleEchoTransport {
        async fn generate(
            &self,
            _candidate: &ModelCandidate,
            prompt: &str,
        ) -> Result<String, TransportError> {
            let example = [
                CAREER_TWIN_EXAMPLE,
                TRAJECTORY_EXAMPLE,
                INTERVIEW_EXAMPLE,
                JOB_MATCH_EXAMPLE,
                SKILL_DEMAND_EXAMPLE,
                ROADMAP_EXAMPLE,
                SIMULATION_EXAMPLE,
            ]
            .into_iter()
            .find(|e| prompt.contains(e))
            .ok_or(TransportError::EmptyContent)?;
            Ok(format!("```json\n{example}\n```"))
        }
    }

    /// Returns one job match echoing the prompt's skills line, after a delay that is
    /// longer for the first profile so the calls finish out of order.
    struct SkillEchoTransport;

    #[async_trait]
    impl ModelTransport for SkillEchoTransport {
        async fn generate(
            &self,
            _candidate: &ModelCandidate,
            prompt: &str,
        ) -> Result<String, TransportError> {
            let skills = prompt
                .lines()
                .find_map(|l| l.strip_prefix("- Skills: "))
                .unwrap_or_default()
                .to_string();
            let delay = if skills.contains("React") { 50 } else { 5 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(serde_json::json!([{
                "title": "Engineer",
                "company": "Echo Inc",
                "matchScore": 80,
                "matchingSkills": skills.split(", ").collect::<Vec<_>>(),
                "missingSkills": [],
                "reason": "echo"
            }])
            .to_string())
        }
    }

    fn profile(skills: &[&str]) -> ProfileInput {
        ProfileInput {
            skills: skills.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn top_level_keys<T: Serialize>(outcome: &Outcome<T>) -> BTreeSet<String> {
        match outcome.data_json() {
            Value::Object(map) => map.keys().cloned().collect(),
            Value::Array(items) => items
                .iter()
                .flat_map(|item| item.as_object().into_iter().flat_map(|o| o.keys().cloned()))
                .collect(),
            other => panic!("unexpected result shape: {other}"),
        }
    }

    fn services(transport: impl ModelTransport + 'static) -> CareerServices {
        CareerServices::new(invoker(transport, &["gemini-1.5-flash"]))
    }

    macro_rules! assert_same_keys {
        ($method:ident, $payload:expr, $kind:expr) => {{
            let payload = $payload;
            let parsed = services(ExampleEchoTransport).$method(&payload).await;
            let fallback = services(FailingTransport).$method(&payload).await;

            assert!(!parsed.source.is_fallback(), "{} did not parse", $kind);
            assert!(fallback.source.is_fallback());
            let keys = top_level_keys(&parsed);
            assert_eq!(keys, top_level_keys(&fallback), "{}", $kind);
            let expected: BTreeSet<String> = $kind
                .schema()
                .required_keys
                .iter()
                .map(|k| k.to_string())
                .collect();
            assert_eq!(keys, expected);
        }};
    }

    #[tokio::test]
    async fn test_parsed_and_fallback_results_share_key_sets() {
        let p = profile(&["React", "Python"]);
        assert_same_keys!(career_twin, p.clone(), TaskKind::CareerTwin);
        assert_same_keys!(trajectory, p.clone(), TaskKind::Trajectory);
        assert_same_keys!(match_jobs, p.clone(), TaskKind::JobMatch);
        assert_same_keys!(skill_demand, p.clone(), TaskKind::SkillDemand);
        assert_same_keys!(
            evaluate_interview,
            InterviewPayload {
                question: "Why us?".into(),
                answer: "I like the product.".into(),
                role: None,
                profile: p.clone(),
            },
            TaskKind::InterviewEval
        );
        assert_same_keys!(
            roadmap,
            RoadmapPayload {
                target_role: Some("Data Scientist".into()),
                profile: p.clone(),
            },
            TaskKind::Roadmap
        );
        assert_same_keys!(
            simulate,
            SimulationPayload {
                scenario: "Learn Kubernetes".into(),
                profile: p,
            },
            TaskKind::Simulation
        );
    }

    #[tokio::test]
    async fn test_deterministic_fallbacks_are_idempotent() {
        let services = services(FailingTransport);
        let p = profile(&["Go", "Docker"]);

        assert_eq!(
            services.career_twin(&p).await.data,
            services.career_twin(&p).await.data
        );
        assert_eq!(
            services.match_jobs(&p).await.data,
            services.match_jobs(&p).await.data
        );
        let roadmap = RoadmapPayload {
            target_role: None,
            profile: p,
        };
        assert_eq!(
            services.roadmap(&roadmap).await.data,
            services.roadmap(&roadmap).await.data
        );
    }

    #[tokio::test]
    async fn test_concurrent_calls_do_not_share_results() {
        let services = services(SkillEchoTransport);
        let first = profile(&["React", "CSS"]);
        let second = profile(&["Go", "Postgres"]);

        let (a, b) = tokio::join!(services.match_jobs(&first), services.match_jobs(&second));

        assert_eq!(a.data[0].matching_skills, vec!["React", "CSS"]);
        assert_eq!(b.data[0].matching_skills, vec!["Go", "Postgres"]);
    }

    #[tokio::test]
    async fn test_all_candidates_failing_yields_fallback_without_error() {
        let services = CareerServices::new(crate::llm_client::ModelInvoker::unchecked(
            Arc::new(FailingTransport),
            candidates(&["a", "b", "c"]),
        ));
        let outcome = services.career_twin(&profile(&["React", "Python"])).await;

        assert!(matches!(outcome.source, ResultSource::Fallback { .. }));
        assert!(outcome
            .data
            .role_suitability
            .iter()
            .any(|r| r.key_matching_skills.contains(&"React".to_string())));
    }
}
