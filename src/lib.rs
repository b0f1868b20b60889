//! DUT harness library
//!
//! Drives two Bluetooth LE boards over their serial shells and checks
//! connection workflows end to end. It also carries the configuration of the
//! SDK manuals and their post-build hook.
//!
//! # Modules
//!
//! - `config`: Configuration management with TOML support
//! - `port`: Serial transport abstraction (real consoles and a scripted mock)
//! - `dut`: Command/expectation driver for one board
//! - `session`: Lazily opened pair of boards shared across scenarios
//! - `scenario`: Reusable sequences, the scenario catalog and the runner
//! - `docs`: Manual configuration records and the static asset hook
//! - `logging`: Tracing subscriber setup
//! - `error`: Unified error handling

pub mod config;
pub mod docs;
pub mod dut;
pub mod error;
pub mod logging;
pub mod port;
pub mod scenario;
pub mod session;

pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
pub use dut::{Dut, ExpectMatch, OutputBuffer, Pattern};
pub use error::{HarnessError, HarnessResult};
pub use port::{
    DataBits, FlowControl, MockSerialPort, Parity, PortConfiguration, PortError, SerialPortAdapter,
    StopBits, SyncSerialPort,
};
pub use scenario::{Outcome, Scenario, ScenarioParams, ScenarioReport, ScenarioRunner, Step};
pub use session::{DutSession, PortFactory, Role, SerialPortFactory, SessionProvider};
