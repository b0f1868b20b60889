use crate::config::ConfigError;
use crate::docs::DocsError;
use crate::port::PortError;
use std::time::Duration;
use thiserror::Error;

/// Result alias used across the harness.
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Top-level error for driving DUTs and running scenarios.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The expected output never showed up. Fatal to the running scenario.
    #[error("{device}: pattern {pattern} not seen within {window:?} (last output: {tail:?})")]
    ExpectTimeout {
        device: String,
        pattern: String,
        window: Duration,
        tail: String,
    },

    /// The shell never answered the readiness probe.
    #[error("{device}: shell not ready within {window:?}")]
    NotReady { device: String, window: Duration },

    #[error("Invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Transport error on {device}: {source}")]
    Port {
        device: String,
        #[source]
        source: PortError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Docs(#[from] DocsError),

    #[error("Unknown scenario '{0}'")]
    UnknownScenario(String),

    #[error("Scenario '{scenario}' failed at step {step}: {source}")]
    ScenarioFailed {
        scenario: String,
        step: usize,
        #[source]
        source: Box<HarnessError>,
    },
}

impl HarnessError {
    pub fn port(device: impl Into<String>, source: PortError) -> Self {
        Self::Port {
            device: device.into(),
            source,
        }
    }

    /// True for an expectation timeout, including one wrapped in a scenario failure.
    pub fn is_expect_timeout(&self) -> bool {
        match self {
            Self::ExpectTimeout { .. } => true,
            Self::ScenarioFailed { source, .. } => source.is_expect_timeout(),
            _ => false,
        }
    }
}
