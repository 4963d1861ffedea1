//! Job matching: roles and employers that fit the caller's skills.

use serde::{Deserialize, Serialize};

use super::prompts::{render_task_prompt, JOB_MATCH_EXAMPLE, JOB_MATCH_PROMPT_TEMPLATE};
use super::skills::{missing_adjacent, rank_domains};
use crate::models::lenient;
use crate::models::profile::ProfileInput;
use crate::orchestrator::{CareerTask, TaskKind};

pub const MAX_JOB_MATCHES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatch {
    pub title: String,
    pub company: String,
    #[serde(deserialize_with = "lenient::score")]
    pub match_score: u8,
    #[serde(default)]
    pub matching_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    pub reason: String,
}

pub struct JobMatchTask;

impl CareerTask for JobMatchTask {
    const KIND: TaskKind = TaskKind::JobMatch;
    type Payload = ProfileInput;
    type Output = Vec<JobMatch>;

    fn build_prompt(profile: &ProfileInput) -> String {
        render_task_prompt(JOB_MATCH_PROMPT_TEMPLATE, JOB_MATCH_EXAMPLE, profile, &[])
    }

    /// One match per (domain, employer), strongest domain first, capped at
    /// `MAX_JOB_MATCHES`. `matchingSkills` only ever holds the caller's own skills.
    fn synthesize(profile: &ProfileInput) -> Vec<JobMatch> {
        let skills = profile.skills();
        let ranked = rank_domains(&skills);
        let years = profile.years_of_experience();
        let rung = if years >= 5 { 2 } else { 1 };

        let mut matches = Vec::new();
        for (domain_rank, m) in ranked.iter().enumerate() {
            let domain_profile = m.domain.profile();
            let matching: Vec<String> = m.skills.iter().take(3).cloned().collect();
            let missing = missing_adjacent(m.domain, &skills, 2);
            for (i, company) in domain_profile.employers.iter().enumerate() {
                let penalty = 6 * domain_rank + 3 * i;
                matches.push(JobMatch {
                    title: domain_profile.ladder[rung].to_string(),
                    company: company.to_string(),
                    match_score: 90u8.saturating_sub(penalty.min(90) as u8),
                    matching_skills: matching.clone(),
                    missing_skills: missing.clone(),
                    reason: reason_for(&matching, company),
                });
            }
        }
        matches.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        matches.truncate(MAX_JOB_MATCHES);
        matches
    }
}

fn reason_for(matching: &[String], company: &str) -> String {
    if matching.is_empty() {
        format!("{company} hires broadly for adaptable engineers early in their careers.")
    } else {
        format!("{company} actively hires for {}.", matching.join(", "))
    }
}
