//! Transport error types.
//!
//! Kept apart from [`crate::error::HarnessError`] so the adapters stay usable
//! without the scenario layer.

use std::time::Duration;
use thiserror::Error;

/// Errors raised by a device transport.
#[derive(Debug, Error)]
pub enum PortError {
    /// The serial console does not exist on this host.
    #[error("Serial port not found: {0}")]
    NotFound(String),

    /// An I/O error occurred while talking to the console.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The console rejected its line settings.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A single read or write did not complete in time.
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// A serialport-specific error occurred.
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

impl PortError {
    pub fn not_found(port_name: impl Into<String>) -> Self {
        Self::NotFound(port_name.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn timeout(duration: Duration) -> Self {
        Self::Timeout(duration)
    }

    /// True when the read simply found nothing yet and polling may continue.
    pub fn is_idle(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }
}
