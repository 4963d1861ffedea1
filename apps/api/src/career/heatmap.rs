//! Skill demand heatmap: demand for each of the caller's skills across the top 3 industries.

use serde::{Deserialize, Serialize};

use super::prompts::{render_task_prompt, SKILL_DEMAND_EXAMPLE, SKILL_DEMAND_PROMPT_TEMPLATE};
use super::skills::{rank_domains, SkillDomain};
use super::trajectory::random_growth_rate;
use crate::models::lenient;
use crate::models::profile::ProfileInput;
use crate::orchestrator::{CareerTask, TaskKind};

pub const HEATMAP_INDUSTRIES: usize = 3;
pub const HEATMAP_SKILLS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapPoint {
    pub industry: String,
    pub skill: String,
    #[serde(deserialize_with = "lenient::score")]
    pub demand_score: u8,
    #[serde(deserialize_with = "lenient::percent")]
    pub growth_rate: f64,
}

pub struct SkillDemandTask;

impl CareerTask for SkillDemandTask {
    const KIND: TaskKind = TaskKind::SkillDemand;
    type Payload = ProfileInput;
    type Output = Vec<HeatmapPoint>;

    fn build_prompt(profile: &ProfileInput) -> String {
        render_task_prompt(SKILL_DEMAND_PROMPT_TEMPLATE, SKILL_DEMAND_EXAMPLE, profile, &[])
    }

    /// Industries come from the caller's strongest domain. A skill scores higher in
    /// industries that belong to its own domain.
    fn synthesize(profile: &ProfileInput) -> Vec<HeatmapPoint> {
        let skills = profile.top_skills(HEATMAP_SKILLS);
        let skill_refs: Vec<&str> = skills.iter().map(String::as_str).collect();
        let lead = rank_domains(&skill_refs)[0].domain;
        let industries = &lead.profile().industries[..HEATMAP_INDUSTRIES];

        let mut points = Vec::with_capacity(industries.len() * skills.len());
        for (row, industry) in industries.iter().enumerate() {
            for skill in &skills {
                let domain = SkillDomain::of_skill(skill);
                let in_domain = domain.profile().industries.contains(industry);
                let base: u8 = if in_domain { 85 } else { 62 };
                points.push(HeatmapPoint {
                    industry: industry.to_string(),
                    skill: skill.clone(),
                    demand_score: base.saturating_sub(5 * row as u8),
                    growth_rate: random_growth_rate(),
                });
            }
        }
        points
    }
}
