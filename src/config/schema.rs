//! Configuration schema definitions.
//!
//! Every section carries serde defaults, so a config file only needs the keys
//! it changes.

use crate::port::{DataBits, FlowControl, Parity, PortConfiguration, StopBits};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The two device consoles
    pub duts: DutsConfig,
    /// Expectation defaults
    pub expect: ExpectConfig,
    /// Shell readiness probing
    pub readiness: ReadinessConfig,
    /// Parameters shared by the scenario catalog
    pub scenario: ScenarioConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Both DUT consoles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DutsConfig {
    /// Peripheral / advertiser
    pub dut1: DutEndpoint,
    /// Central / scanner
    pub dut2: DutEndpoint,
}

/// One DUT console.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DutEndpoint {
    /// Serial device path; required before a hardware run
    pub port: Option<String>,
    pub baud: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub flow_control: FlowControl,
    /// Appended to every command
    pub line_ending: String,
}

impl Default for DutEndpoint {
    fn default() -> Self {
        Self {
            port: None,
            baud: 115_200,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
            line_ending: "\n".to_string(),
        }
    }
}

impl DutEndpoint {
    /// Line settings used to open this console.
    pub fn port_configuration(&self) -> PortConfiguration {
        PortConfiguration {
            baud_rate: self.baud,
            data_bits: self.data_bits,
            flow_control: self.flow_control,
            parity: self.parity,
            stop_bits: self.stop_bits,
            ..PortConfiguration::default()
        }
    }
}

/// Expectation defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpectConfig {
    /// Window used when a step does not name its own
    pub default_timeout_ms: u64,
    /// Upper bound for one blocking console read
    pub poll_interval_ms: u64,
    /// Unconsumed output kept per device, in bytes
    pub buffer_limit: usize,
}

impl Default for ExpectConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: 10_000,
            poll_interval_ms: 50,
            buffer_limit: 64 * 1024,
        }
    }
}

impl ExpectConfig {
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// How to decide that a shell is ready after a reboot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// Probe the prompt; when false, wait `fallback_settle_ms` instead
    pub enabled: bool,
    /// Banner printed once a reboot starts; output before it is stale.
    /// Empty skips the wait and only clears pending output.
    pub boot_marker: String,
    /// Line written on every probe
    pub probe: String,
    /// Output that proves the shell is accepting commands
    pub prompt: String,
    /// Time to wait for the prompt after each probe
    pub poll_ms: u64,
    /// Overall readiness budget
    pub timeout_ms: u64,
    pub fallback_settle_ms: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            boot_marker: "*** Booting Zephyr".to_string(),
            probe: String::new(),
            prompt: "uart:~$".to_string(),
            poll_ms: 250,
            timeout_ms: 10_000,
            fallback_settle_ms: 1_000,
        }
    }
}

impl ReadinessConfig {
    pub fn poll(&self) -> Duration {
        Duration::from_millis(self.poll_ms.max(1))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn fallback_settle(&self) -> Duration {
        Duration::from_millis(self.fallback_settle_ms)
    }
}

/// Parameters shared by the scenario catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Advertising name DUT2 connects to
    pub peer_name: String,
    /// L2CAP PSM registered on DUT1
    pub l2cap_psm: u16,
    /// Arguments of `l2cap send`
    pub l2cap_send_args: String,
    /// How long DUT2 scans before connecting
    pub scan_window_ms: u64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            peer_name: "test_shell".to_string(),
            l2cap_psm: 0x29,
            l2cap_send_args: "3 14".to_string(),
            scan_window_ms: 3_000,
        }
    }
}

impl ScenarioConfig {
    pub fn scan_window(&self) -> Duration {
        Duration::from_millis(self.scan_window_ms)
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
    /// Append logs to this file instead of stderr
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            file: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}
