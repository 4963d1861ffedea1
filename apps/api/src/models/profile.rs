use serde::{Deserialize, Serialize};

pub const DEFAULT_EDUCATION: &str = "Not specified";
pub const DEFAULT_SKILLS: &str = "general problem-solving and communication";
pub const DEFAULT_EXPERIENCE: &str = "0-2 years";
pub const DEFAULT_INTERESTS: &str = "technology";
pub const DEFAULT_GOALS: &str = "grow into a fulfilling technology career";

/// The caller's profile as submitted by the dashboard. Every field is optional here;
/// the UI is what insists on a non-empty skills list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileInput {
    pub education: Option<String>,
    pub skills: Vec<String>,
    pub experience: Option<String>,
    pub interests: Vec<String>,
    pub goals: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn non_blank_items(items: &[String]) -> Vec<&str> {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect()
}

impl ProfileInput {
    /// Skills with blank entries removed, in the caller's order.
    pub fn skills(&self) -> Vec<&str> {
        non_blank_items(&self.skills)
    }

    pub fn interests(&self) -> Vec<&str> {
        non_blank_items(&self.interests)
    }

    pub fn education_text(&self) -> &str {
        non_blank(&self.education).unwrap_or(DEFAULT_EDUCATION)
    }

    pub fn experience_text(&self) -> &str {
        non_blank(&self.experience).unwrap_or(DEFAULT_EXPERIENCE)
    }

    pub fn goals_text(&self) -> &str {
        non_blank(&self.goals).unwrap_or(DEFAULT_GOALS)
    }

    pub fn skills_text(&self) -> String {
        join_or(&self.skills(), DEFAULT_SKILLS)
    }

    pub fn interests_text(&self) -> String {
        join_or(&self.interests(), DEFAULT_INTERESTS)
    }

    /// The first `n` skills, or a single generic skill when none were given.
    pub fn top_skills(&self, n: usize) -> Vec<String> {
        let skills = self.skills();
        if skills.is_empty() {
            return vec!["Problem Solving".to_string()];
        }
        skills.into_iter().take(n).map(String::from).collect()
    }

    /// Rough years of experience parsed from the free-form description ("2 years",
    /// "3-5 yrs", "six months" → 0). Missing or unparseable text counts as 1.
    pub fn years_of_experience(&self) -> u32 {
        let Some(text) = non_blank(&self.experience) else {
            return 1;
        };
        let digits: String = text
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();
        match digits.parse::<u32>() {
            Ok(n) if text.to_lowercase().contains("month") => n / 12,
            Ok(n) => n,
            Err(_) => 1,
        }
    }
}

fn join_or(items: &[&str], default: &str) -> String {
    if items.is_empty() {
        default.to_string()
    } else {
        items.join(", ")
    }
}

/// Payload for interview answer evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterviewPayload {
    pub question: String,
    pub answer: String,
    pub role: Option<String>,
    pub profile: ProfileInput,
}

/// Payload for a learning roadmap toward a target role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoadmapPayload {
    pub target_role: Option<String>,
    pub profile: ProfileInput,
}

/// Payload for a "what if" career simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationPayload {
    pub scenario: String,
    pub profile: ProfileInput,
}
