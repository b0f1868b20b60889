//! Configuration for the DUT harness.
//!
//! TOML-based configuration with environment variable overrides.
//!
//! # Configuration Resolution
//!
//! 1. `DUT_HARNESS_CONFIG` environment variable (explicit path)
//! 2. `./dut-harness.toml`
//! 3. The platform config directory (`~/.config/dut-harness/dut-harness.toml` on Linux)
//! 4. Built-in defaults
//!
//! # Environment Overrides
//!
//! - `DUT_HARNESS_DUT1_PORT`, `DUT_HARNESS_DUT2_PORT` (or bare `DUT1_PORT`, `DUT2_PORT`)
//! - `DUT_HARNESS_DUT1_BAUD`, `DUT_HARNESS_DUT2_BAUD`
//! - `DUT_HARNESS_EXPECT_TIMEOUT_MS`
//! - `DUT_HARNESS_READINESS_ENABLED`, `DUT_HARNESS_READINESS_PROMPT`,
//!   `DUT_HARNESS_READINESS_BOOT_MARKER`
//! - `DUT_HARNESS_SCENARIO_PEER_NAME`
//! - `DUT_HARNESS_LOGGING_LEVEL`
//!
//! # Example
//!
//! ```toml
//! [duts.dut1]
//! port = "/dev/ttyACM0"
//!
//! [duts.dut2]
//! port = "/dev/ttyACM2"
//!
//! [readiness]
//! prompt = "uart:~$"
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    get_default_config_dir, get_default_config_path, resolve_config_path, ConfigLoader,
};
pub use schema::{
    Config, DutEndpoint, DutsConfig, ExpectConfig, LogFormat, LoggingConfig, ReadinessConfig,
    ScenarioConfig,
};
