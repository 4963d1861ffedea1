//! The per-call state machine behind every domain facade.
//!
//! ```text
//! BuildPrompt -> Invoke -> (ok) -> Normalize -> (ok) -> Return(parsed)
//!                  |                   |
//!                (err)               (err)
//!                  v                   v
//!              Synthesize ---------> Return(fallback)
//! ```
//!
//! Both terminal states are successes for the caller, which is why `run` returns
//! `Outcome` rather than `Result`.

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use super::CareerTask;
use crate::llm_client::normalize::{normalize, ParseError};
use crate::llm_client::{InvocationError, ModelInvoker};

/// Why a call ended in the fallback synthesizer.
#[derive(Debug)]
pub enum FallbackReason {
    EmptyPrompt,
    Invocation(InvocationError),
    Parse(ParseError),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::EmptyPrompt => f.write_str("prompt builder produced an empty prompt"),
            FallbackReason::Invocation(e) => write!(f, "invocation failed: {e}"),
            FallbackReason::Parse(e) => write!(f, "response rejected: {e}"),
        }
    }
}

/// Diagnostic tag describing where the data came from. Kept apart from the data so
/// consumers never branch on it to read the result.
#[derive(Debug)]
pub enum ResultSource {
    Model { model: String },
    Fallback { reason: FallbackReason },
}

impl ResultSource {
    pub fn label(&self) -> &'static str {
        match self {
            ResultSource::Model { .. } => "model",
            ResultSource::Fallback { .. } => "fallback",
        }
    }

    pub fn model(&self) -> Option<&str> {
        match self {
            ResultSource::Model { model } => Some(model),
            ResultSource::Fallback { .. } => None,
        }
    }

    #[cfg(test)]
    pub fn is_fallback(&self) -> bool {
        matches!(self, ResultSource::Fallback { .. })
    }
}

#[derive(Debug)]
pub struct Outcome<T> {
    pub data: T,
    pub source: ResultSource,
}

impl<T: Serialize> Outcome<T> {
    pub fn data_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.data).unwrap_or(serde_json::Value::Null)
    }
}

enum Stage {
    BuildPrompt,
    Invoke { prompt: String },
    Normalize { raw: String, model: String },
    Synthesize { reason: FallbackReason },
}

/// Runs one task end to end. Never fails: every error path ends in `T::synthesize`.
pub async fn run<T: CareerTask>(invoker: &ModelInvoker, payload: &T::Payload) -> Outcome<T::Output> {
    let kind = T::KIND;
    let mut stage = Stage::BuildPrompt;

    loop {
        stage = match stage {
            Stage::BuildPrompt => {
                let prompt = T::build_prompt(payload);
                if prompt.trim().is_empty() {
                    Stage::Synthesize {
                        reason: FallbackReason::EmptyPrompt,
                    }
                } else {
                    debug!(task = %kind, chars = prompt.len(), "prompt built");
                    Stage::Invoke { prompt }
                }
            }
            Stage::Invoke { prompt } => match invoker.invoke(&prompt).await {
                Ok(invocation) => Stage::Normalize {
                    raw: invocation.text,
                    model: invocation.model,
                },
                Err(e) => Stage::Synthesize {
                    reason: FallbackReason::Invocation(e),
                },
            },
            Stage::Normalize { raw, model } => {
                match normalize::<T::Output>(&kind.schema(), &raw) {
                    Ok(data) => {
                        debug!(task = %kind, model = %model, "model response accepted");
                        return Outcome {
                            data,
                            source: ResultSource::Model { model },
                        };
                    }
                    Err(e) => {
                        debug!(
                            task = %kind,
                            model = %model,
                            raw = %raw.chars().take(200).collect::<String>(),
                            "model response rejected"
                        );
                        Stage::Synthesize {
                            reason: FallbackReason::Parse(e),
                        }
                    }
                }
            }
            Stage::Synthesize { reason } => {
                warn!(
                    task = %kind,
                    reason = %reason,
                    randomized = kind.has_randomized_fallback(),
                    "serving synthesized fallback"
                );
                return Outcome {
                    data: T::synthesize(payload),
                    source: ResultSource::Fallback { reason },
                };
            }
        };
    }
}
