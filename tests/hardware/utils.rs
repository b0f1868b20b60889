//! Utility functions for hardware testing.
//!
//! Provides board discovery from the environment, a session provider over the
//! real consoles and a timing helper.

use dut_harness::config::{Config, ConfigLoader};
use dut_harness::port::{available_consoles, ConsoleInfo};
use dut_harness::SessionProvider;
use std::env;
use std::time::{Duration, Instant};

/// Board consoles from environment variables.
pub struct BoardPair {
    pub dut1: String,
    pub dut2: String,
}

impl BoardPair {
    /// `DUT1_PORT` and `DUT2_PORT` must both be set.
    pub fn from_env() -> Option<Self> {
        Some(BoardPair {
            dut1: env::var("DUT1_PORT").ok()?,
            dut2: env::var("DUT2_PORT").ok()?,
        })
    }

    /// Loaded configuration with the two consoles filled in.
    pub fn config(&self) -> Config {
        let mut config = ConfigLoader::load()
            .map(ConfigLoader::into_config)
            .unwrap_or_default();
        config.duts.dut1.port = Some(self.dut1.clone());
        config.duts.dut2.port = Some(self.dut2.clone());
        config
    }

    pub fn provider(&self) -> SessionProvider {
        SessionProvider::from_config(self.config())
    }
}

pub fn print_available_consoles() {
    let consoles: Vec<ConsoleInfo> = available_consoles().unwrap_or_default();
    if consoles.is_empty() {
        println!("No serial consoles detected on this system");
        return;
    }

    println!("Available serial consoles ({}):", consoles.len());
    for (idx, console) in consoles.iter().enumerate() {
        println!("  {}. {} [{}]", idx + 1, console.port_name, console.kind);
        if let Some(ref manufacturer) = console.manufacturer {
            println!("     Manufacturer: {}", manufacturer);
        }
        if let Some(ref product) = console.product {
            println!("     Product: {}", product);
        }
    }
}

/// Timing helper for measuring scenario duration.
pub struct TimingHelper {
    start: Instant,
    name: String,
}

impl TimingHelper {
    pub fn new(name: &str) -> Self {
        println!("Starting: {}", name);
        TimingHelper {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.start.elapsed();
        println!("Completed: {} in {:?}", self.name, elapsed);
        elapsed
    }
}

/// Skip test with a clear message if the boards are not configured.
#[macro_export]
macro_rules! skip_without_boards {
    () => {
        match $crate::hardware::utils::BoardPair::from_env() {
            Some(pair) => pair,
            None => {
                println!("Skipping: DUT1_PORT and DUT2_PORT must be set");
                return;
            }
        }
    };
}
