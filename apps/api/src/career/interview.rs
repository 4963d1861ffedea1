//! Interview answer evaluation.
//!
//! The fallback is a keyword heuristic over the answer text: length, STAR structure,
//! concrete numbers and overlap with the caller's skills each add to a 40-point base.

use serde::{Deserialize, Serialize};

use super::prompts::{render_task_prompt, INTERVIEW_EXAMPLE, INTERVIEW_PROMPT_TEMPLATE};
use super::skills::mentions_term;
use crate::models::lenient;
use crate::models::profile::InterviewPayload;
use crate::orchestrator::{CareerTask, TaskKind};

const DEFAULT_ROLE: &str = "the target role";
const DEFAULT_QUESTION: &str = "(no question provided)";
const DEFAULT_ANSWER: &str = "(no answer provided)";

const SITUATION_MARKERS: &[&str] = &["situation", "when i", "at my", "we had", "our team"];
const ACTION_MARKERS: &[&str] = &["i built", "i led", "i decided", "i implemented", "i designed", "i created"];
const RESULT_MARKERS: &[&str] = &["result", "as a result", "outcome", "improved", "reduced", "increased"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewEvaluation {
    #[serde(deserialize_with = "lenient::score")]
    pub overall_score: u8,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    pub detailed_feedback: String,
    #[serde(default)]
    pub follow_up_suggestions: Vec<String>,
}

/// Signals the heuristic scorer extracts from an answer.
#[derive(Debug, Default, PartialEq)]
struct AnswerSignals {
    words: usize,
    has_situation: bool,
    has_action: bool,
    has_result: bool,
    has_numbers: bool,
    skills_mentioned: Vec<String>,
}

impl AnswerSignals {
    fn read(answer: &str, skills: &[&str]) -> Self {
        let lower = answer.to_lowercase();
        let contains_any = |markers: &[&str]| markers.iter().any(|m| lower.contains(m));
        Self {
            words: answer.split_whitespace().count(),
            has_situation: contains_any(SITUATION_MARKERS),
            has_action: contains_any(ACTION_MARKERS),
            has_result: contains_any(RESULT_MARKERS),
            has_numbers: answer.chars().any(|c| c.is_ascii_digit()),
            skills_mentioned: skills
                .iter()
                .filter(|s| mentions_term(answer, s))
                .map(|s| s.to_string())
                .collect(),
        }
    }

    fn star_parts(&self) -> usize {
        [self.has_situation, self.has_action, self.has_result]
            .iter()
            .filter(|b| **b)
            .count()
    }

    fn score(&self) -> u8 {
        let length = match self.words {
            0..=19 => 0,
            20..=59 => 10,
            60..=249 => 20,
            _ => 15,
        };
        let structure = 8 * self.star_parts();
        let numbers = if self.has_numbers { 8 } else { 0 };
        let skills = if self.skills_mentioned.is_empty() { 0 } else { 8 };
        (40 + length + structure + numbers + skills).min(100) as u8
    }
}

pub struct InterviewTask;

impl CareerTask for InterviewTask {
    const KIND: TaskKind = TaskKind::InterviewEval;
    type Payload = InterviewPayload;
    type Output = InterviewEvaluation;

    fn build_prompt(payload: &InterviewPayload) -> String {
        let role = role_or_default(payload);
        render_task_prompt(
            INTERVIEW_PROMPT_TEMPLATE,
            INTERVIEW_EXAMPLE,
            &payload.profile,
            &[
                ("role", role),
                ("question", or_default(&payload.question, DEFAULT_QUESTION)),
                ("answer", or_default(&payload.answer, DEFAULT_ANSWER)),
            ],
        )
    }

    fn synthesize(payload: &InterviewPayload) -> InterviewEvaluation {
        let signals = AnswerSignals::read(&payload.answer, &payload.profile.skills());
        let mut strengths = Vec::new();
        let mut improvements = Vec::new();

        if signals.star_parts() >= 2 {
            strengths.push("Answer follows a clear situation-action-result structure".to_string());
        } else {
            improvements.push(
                "Structure the answer as situation, action and result (STAR)".to_string(),
            );
        }
        if signals.has_numbers {
            strengths.push("Backs claims with concrete numbers".to_string());
        } else {
            improvements.push("Quantify the impact of your work with metrics".to_string());
        }
        if !signals.skills_mentioned.is_empty() {
            strengths.push(format!(
                "Connects the answer to relevant skills: {}",
                signals.skills_mentioned.join(", ")
            ));
        }
        if signals.words < 60 {
            improvements.push("Add more detail about your own contribution".to_string());
        } else if signals.words >= 250 {
            improvements.push("Tighten the answer to keep it under two minutes".to_string());
        }
        if strengths.is_empty() {
            strengths.push("Answered the question directly".to_string());
        }

        let role = role_or_default(payload);
        InterviewEvaluation {
            overall_score: signals.score(),
            detailed_feedback: format!(
                "Your answer runs {} words and covers {} of the 3 STAR elements. \
                 For {role}, interviewers look for a specific example, your personal actions, \
                 and a measurable outcome.",
                signals.words,
                signals.star_parts()
            ),
            strengths,
            improvements,
            follow_up_suggestions: vec![
                "What would you do differently if you faced this again?".to_string(),
                "How did you measure whether it worked?".to_string(),
            ],
        }
    }
}

fn role_or_default(payload: &InterviewPayload) -> &str {
    or_default(payload.role.as_deref().unwrap_or_default(), DEFAULT_ROLE)
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    match value.trim() {
        "" => default,
        trimmed => trimmed,
    }
}
