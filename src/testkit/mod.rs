//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::entity::{BinomialName, Entity};
use crate::error::TransportError;
use crate::provider::Provider;
use crate::template::TemplatePair;

/// One scripted reaction to a submit call.
#[derive(Debug, Clone)]
pub enum ScriptStep {
    /// Return this text.
    Reply(String),
    /// Fail with a transport error (HTTP 503).
    FailTransport,
}

/// Deterministic provider stub driven by a script.
///
/// Call `n` takes step `n` of the script; past the end, the last step
/// repeats. The call counter lets tests assert retry behavior.
pub struct ScriptedProvider {
    steps: Vec<ScriptStep>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        assert!(!steps.is_empty(), "script needs at least one step");
        Self {
            steps,
            calls: AtomicUsize::new(0),
        }
    }

    /// Reply with the same text on every call.
    pub fn always(response: String) -> Self {
        Self::new(vec![ScriptStep::Reply(response)])
    }

    /// Fail transport on the first `failures` calls, then reply.
    pub fn failing_then(failures: usize, response: String) -> Self {
        let mut steps = vec![ScriptStep::FailTransport; failures];
        steps.push(ScriptStep::Reply(response));
        Self::new(steps)
    }

    /// Number of submit calls seen so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn submit(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
        _model: &str,
    ) -> Result<String, TransportError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.get(call).unwrap_or_else(|| {
            self.steps.last().expect("script is non-empty")
        });
        match step {
            ScriptStep::Reply(response) => Ok(response.clone()),
            ScriptStep::FailTransport => Err(TransportError::Status {
                status: 503,
                body: "scripted transport failure".to_string(),
            }),
        }
    }
}

/// Provider stub that fails transport whenever the user prompt contains
/// `needle`, and replies otherwise. Useful for failure-isolation tests.
pub struct SelectiveProvider {
    needle: String,
    response: String,
}

impl SelectiveProvider {
    pub fn failing_for(needle: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            needle: needle.into(),
            response: response.into(),
        }
    }
}

#[async_trait]
impl Provider for SelectiveProvider {
    fn name(&self) -> &'static str {
        "selective"
    }

    async fn submit(
        &self,
        _system_prompt: &str,
        user_prompt: &str,
        _model: &str,
    ) -> Result<String, TransportError> {
        if user_prompt.contains(&self.needle) {
            Err(TransportError::Status {
                status: 429,
                body: "scripted rate limit".to_string(),
            })
        } else {
            Ok(self.response.clone())
        }
    }
}

/// A complete, valid response for the stock schema.
pub fn valid_response() -> String {
    r#"{
        "gram_staining": "gram stain negative",
        "motility": "TRUE",
        "aerophilicity": ["facultatively anaerobic"],
        "extreme_environment_tolerance": "FALSE",
        "biofilm_formation": "TRUE",
        "animal_pathogenicity": "TRUE",
        "biosafety_level": "biosafety level 2",
        "health_association": "TRUE",
        "host_association": "TRUE",
        "plant_pathogenicity": "FALSE",
        "spore_formation": "FALSE",
        "hemolysis": "beta",
        "cell_shape": ["bacillus shaped"]
    }"#
    .to_string()
}

/// Canonical test entity.
pub fn entity(name: &str) -> Entity {
    Entity::new(BinomialName::parse(name).expect("well-formed binomial name"))
}

/// Canonical test template pair.
pub fn template_pair(label: &str) -> TemplatePair {
    TemplatePair::new(label, "You classify microbes.", "Classify {binomial_name}.")
}
