/// LLM Client: the single point of entry for all model calls in the career service.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// Every generation goes through `ModelInvoker`, which walks the configured
/// candidates in order and stops at the first one that answers.
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{Config, ConfigurationError};

pub mod gemini;
pub mod normalize;
pub mod prompts;

pub use gemini::GeminiTransport;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model returned empty content")]
    EmptyContent,
}

#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("No model candidates configured")]
    NoCandidates,

    #[error("All {attempts} model candidates failed; last error: {last}")]
    AllCandidatesFailed {
        attempts: usize,
        last: TransportError,
    },
}

/// One model identifier paired with the API key used to call it.
#[derive(Clone, PartialEq, Eq)]
pub struct ModelCandidate {
    pub model: String,
    pub api_key: String,
    /// Position of the key in the configured key list, for log labels.
    pub key_index: usize,
}

impl ModelCandidate {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>, key_index: usize) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            key_index,
        }
    }

    /// Redacted label safe to log.
    pub fn key_label(&self) -> String {
        format!("key#{}", self.key_index + 1)
    }
}

impl fmt::Debug for ModelCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelCandidate")
            .field("model", &self.model)
            .field("api_key", &self.key_label())
            .finish()
    }
}

/// Expands models × keys into the ordered candidate list, model-major:
/// every key is tried for the preferred model before moving to the next model.
pub fn expand_candidates(models: &[String], api_keys: &[String]) -> Vec<ModelCandidate> {
    models
        .iter()
        .flat_map(|model| {
            api_keys
                .iter()
                .enumerate()
                .map(move |(i, key)| ModelCandidate::new(model.clone(), key.clone(), i))
        })
        .collect()
}

/// A single remote text-generation call. Implementations must not retry:
/// retry-by-candidate is the invoker's job.
#[async_trait]
pub trait ModelTransport: Send + Sync {
    async fn generate(
        &self,
        candidate: &ModelCandidate,
        prompt: &str,
    ) -> Result<String, TransportError>;
}

/// Text returned by the first candidate that answered.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub text: String,
    pub model: String,
}

/// Walks an ordered candidate list against a transport. Stateless between calls.
#[derive(Clone)]
pub struct ModelInvoker {
    transport: Arc<dyn ModelTransport>,
    candidates: Arc<[ModelCandidate]>,
}

impl ModelInvoker {
    pub fn new(
        transport: Arc<dyn ModelTransport>,
        candidates: Vec<ModelCandidate>,
    ) -> Result<Self, ConfigurationError> {
        if candidates.is_empty() {
            return Err(ConfigurationError::NoCandidates);
        }
        Ok(Self::unchecked(transport, candidates))
    }

    /// Skips the empty-list check. `invoke` still reports `NoCandidates` at call time.
    pub(crate) fn unchecked(
        transport: Arc<dyn ModelTransport>,
        candidates: Vec<ModelCandidate>,
    ) -> Self {
        Self {
            transport,
            candidates: candidates.into(),
        }
    }

    /// Builds the Gemini-backed invoker described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, ConfigurationError> {
        let transport = GeminiTransport::new(&config.gemini_api_url, config.llm_timeout_secs)?;
        Self::new(
            Arc::new(transport),
            expand_candidates(&config.gemini_models, &config.gemini_api_keys),
        )
    }

    pub fn candidates(&self) -> &[ModelCandidate] {
        &self.candidates
    }

    /// Tries each candidate once, in order. The first non-error response wins,
    /// whether or not it later parses.
    pub async fn invoke(&self, prompt: &str) -> Result<Invocation, InvocationError> {
        let mut last_error: Option<TransportError> = None;

        for (attempt, candidate) in self.candidates.iter().enumerate() {
            match self.transport.generate(candidate, prompt).await {
                Ok(text) => {
                    info!(
                        model = %candidate.model,
                        key = %candidate.key_label(),
                        attempt = attempt + 1,
                        "model candidate succeeded"
                    );
                    return Ok(Invocation {
                        text,
                        model: candidate.model.clone(),
                    });
                }
                Err(e) => {
                    warn!(
                        model = %candidate.model,
                        key = %candidate.key_label(),
                        attempt = attempt + 1,
                        error = %e,
                        "model candidate failed, moving to next"
                    );
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            None => Err(InvocationError::NoCandidates),
            Some(last) => Err(InvocationError::AllCandidatesFailed {
                attempts: self.candidates.len(),
                last,
            }),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted transports shared by the tests of every layer above the invoker.

    use std::sync::Mutex;

    use super::*;

    /// Replies from a script keyed by model name; unknown models get a 404.
    /// Records every model it was asked for.
    pub struct ScriptedTransport {
        replies: Vec<(String, Result<String, u16>)>,
        pub calls: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        pub fn new(replies: Vec<(&str, Result<&str, u16>)>) -> Self {
            Self {
                replies: replies
                    .into_iter()
                    .map(|(m, r)| (m.to_string(), r.map(String::from)))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ModelTransport for ScriptedTransport {
        async fn generate(
            &self,
            candidate: &ModelCandidate,
            _prompt: &str,
        ) -> Result<String, TransportError> {
            self.calls.lock().unwrap().push(candidate.model.clone());
            match self.replies.iter().find(|(m, _)| *m == candidate.model) {
                Some((_, Ok(text))) => Ok(text.clone()),
                Some((_, Err(status))) => Err(TransportError::Api {
                    status: *status,
                    message: "scripted failure".to_string(),
                }),
                None => Err(TransportError::Api {
                    status: 404,
                    message: format!("models/{} is not found", candidate.model),
                }),
            }
        }
    }

    /// A transport where every call fails, as when every key is over quota.
    pub struct FailingTransport;

    #[async_trait]
    impl ModelTransport for FailingTransport {
        async fn generate(
            &self,
            _candidate: &ModelCandidate,
            _prompt: &str,
        ) -> Result<String, TransportError> {
            Err(TransportError::Api {
                status: 429,
                message: "Resource has been exhausted (e.g. check quota).".to_string(),
            })
        }
    }

    pub fn candidates(models: &[&str]) -> Vec<ModelCandidate> {
        models
            .iter()
            .map(|m| ModelCandidate::new(*m, "test-key", 0))
            .collect()
    }

    pub fn invoker(transport: impl ModelTransport + 'static, models: &[&str]) -> ModelInvoker {
        ModelInvoker::unchecked(Arc::new(transport), candidates(models))
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn test_expand_candidates_is_model_major() {
        let models = vec!["m1".to_string(), "m2".to_string()];
        let keys = vec!["k1".to_string(), "k2".to_string()];
        let order: Vec<(String, String)> = expand_candidates(&models, &keys)
            .into_iter()
            .map(|c| (c.model, c.api_key))
            .collect();
        assert_eq!(
            order,
            vec![
                ("m1".into(), "k1".into()),
                ("m1".into(), "k2".into()),
                ("m2".into(), "k1".into()),
                ("m2".into(), "k2".into()),
            ]
        );
    }

    #[test]
    fn test_candidate_debug_never_prints_key() {
        let c = ModelCandidate::new("gemini-pro", "AIza-secret", 1);
        let rendered = format!("{c:?}");
        assert!(!rendered.contains("AIza-secret"));
        assert!(rendered.contains("key#2"));
    }

    #[test]
    fn test_new_rejects_empty_candidates() {
        let result = ModelInvoker::new(Arc::new(FailingTransport), vec![]);
        assert!(matches!(result, Err(ConfigurationError::NoCandidates)));
    }

    #[tokio::test]
    async fn test_first_success_wins_and_later_candidates_are_skipped() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            ("a", Err(404)),
            ("b", Ok("{\"ok\":true}")),
            ("c", Ok("never reached")),
        ]));
        let invoker = ModelInvoker::unchecked(transport.clone(), candidates(&["a", "b", "c"]));

        let result = invoker.invoke("prompt").await.unwrap();
        assert_eq!(result.model, "b");
        assert_eq!(result.text, "{\"ok\":true}");
        assert_eq!(transport.calls(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_unparseable_text_still_counts_as_success() {
        let invoker = invoker(
            ScriptedTransport::new(vec![("a", Ok("not json at all"))]),
            &["a", "b"],
        );
        let result = invoker.invoke("prompt").await.unwrap();
        assert_eq!(result.model, "a");
    }

    #[tokio::test]
    async fn test_each_candidate_is_tried_exactly_once() {
        let transport = Arc::new(ScriptedTransport::new(vec![("a", Err(429)), ("b", Err(500))]));
        let invoker = ModelInvoker::unchecked(transport.clone(), candidates(&["a", "b"]));

        let err = invoker.invoke("prompt").await.unwrap_err();
        match err {
            InvocationError::AllCandidatesFailed { attempts, last } => {
                assert_eq!(attempts, 2);
                assert!(matches!(last, TransportError::Api { status: 500, .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(transport.calls(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_empty_candidate_list_reports_no_candidates() {
        let invoker = invoker(FailingTransport, &[]);
        let err = invoker.invoke("prompt").await.unwrap_err();
        assert!(matches!(err, InvocationError::NoCandidates));
    }
}
