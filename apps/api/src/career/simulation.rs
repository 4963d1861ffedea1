//! "What if" career simulation.
//!
//! The fallback reads the scenario for a few known kinds of change (learning a skill,
//! a certification, a degree, switching roles) and shifts three baseline metrics.

use serde::{Deserialize, Serialize};

use super::prompts::{render_task_prompt, SIMULATION_EXAMPLE, SIMULATION_PROMPT_TEMPLATE};
use super::skills::{rank_domains, SkillDomain};
use crate::models::lenient;
use crate::models::profile::SimulationPayload;
use crate::orchestrator::{CareerTask, TaskKind};

const DEFAULT_SCENARIO: &str = "(no scenario provided)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub scenario: String,
    #[serde(default)]
    pub outcomes: Vec<SimulationOutcome>,
    #[serde(deserialize_with = "lenient::percent")]
    pub salary_impact_percent: f64,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutcome {
    pub metric: String,
    #[serde(deserialize_with = "lenient::score")]
    pub current: u8,
    #[serde(deserialize_with = "lenient::score")]
    pub projected: u8,
}

/// Kind of change a scenario describes, with its metric deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScenarioKind {
    Upskill,
    Certification,
    Degree,
    RoleSwitch,
    Other,
}

impl ScenarioKind {
    fn classify(scenario: &str) -> Self {
        let lower = scenario.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));
        if has(&["certif"]) {
            ScenarioKind::Certification
        } else if has(&["master", "degree", "mba", "phd", "bootcamp"]) {
            ScenarioKind::Degree
        } else if has(&["switch", "move into", "transition", "become a", "change to"]) {
            ScenarioKind::RoleSwitch
        } else if has(&["learn", "study", "pick up", "skill"]) {
            ScenarioKind::Upskill
        } else {
            ScenarioKind::Other
        }
    }

    /// (role fit, market demand, interview readiness) deltas and salary impact.
    fn impact(self) -> ([i16; 3], f64) {
        match self {
            ScenarioKind::Upskill => ([12, 10, 8], 8.0),
            ScenarioKind::Certification => ([8, 12, 6], 6.0),
            ScenarioKind::Degree => ([10, 8, 5], 12.0),
            ScenarioKind::RoleSwitch => ([-10, 5, -5], -5.0),
            ScenarioKind::Other => ([5, 4, 3], 3.0),
        }
    }

    fn recommendation(self) -> &'static str {
        match self {
            ScenarioKind::Upskill => {
                "Worth it: pair the new skill with a portfolio project so employers can see it applied."
            }
            ScenarioKind::Certification => {
                "Worth it if the certification is recognised in your target industry; schedule the exam early."
            }
            ScenarioKind::Degree => {
                "Strong long-term payoff; weigh the cost against part-time or employer-sponsored options."
            }
            ScenarioKind::RoleSwitch => {
                "Expect a short dip before growth; bridge the gap with a transition project in the new role."
            }
            ScenarioKind::Other => {
                "Modest upside; define a measurable goal so you can tell whether the change is paying off."
            }
        }
    }
}

const METRICS: [&str; 3] = ["Role fit", "Market demand", "Interview readiness"];

pub struct SimulationTask;

impl CareerTask for SimulationTask {
    const KIND: TaskKind = TaskKind::Simulation;
    type Payload = SimulationPayload;
    type Output = SimulationResult;

    fn build_prompt(payload: &SimulationPayload) -> String {
        render_task_prompt(
            SIMULATION_PROMPT_TEMPLATE,
            SIMULATION_EXAMPLE,
            &payload.profile,
            &[("scenario", scenario_or_default(payload))],
        )
    }

    fn synthesize(payload: &SimulationPayload) -> SimulationResult {
        let kind = ScenarioKind::classify(&payload.scenario);
        let (deltas, salary_impact_percent) = kind.impact();

        let skills = payload.profile.skills();
        let lead = rank_domains(&skills)[0].domain;
        let breadth = (skills.len().min(5) * 4) as i16;
        let experience = (payload.profile.years_of_experience().min(10) * 2) as i16;
        let generalist_penalty = if lead == SkillDomain::Generalist { 10 } else { 0 };
        let baselines = [
            45 + breadth + experience - generalist_penalty,
            55 + breadth / 2,
            40 + experience + breadth / 2,
        ];

        let outcomes = METRICS
            .iter()
            .zip(baselines.iter().zip(deltas))
            .map(|(metric, (base, delta))| SimulationOutcome {
                metric: metric.to_string(),
                current: clamp_score(*base),
                projected: clamp_score(base + delta),
            })
            .collect();

        SimulationResult {
            scenario: scenario_or_default(payload).to_string(),
            outcomes,
            salary_impact_percent,
            recommendation: kind.recommendation().to_string(),
        }
    }
}

fn clamp_score(value: i16) -> u8 {
    value.clamp(0, 100) as u8
}

fn scenario_or_default(payload: &SimulationPayload) -> &str {
    match payload.scenario.trim() {
        "" => DEFAULT_SCENARIO,
        scenario => scenario,
    }
}
