//! Tests requiring two real BLE boards.
//!
//! These tests are ignored by default and require actual hardware to run.
//!
//! # Running Hardware Tests
//!
//! ```bash
//! export DUT1_PORT=/dev/ttyACM0   # peripheral
//! export DUT2_PORT=/dev/ttyACM2   # central
//! cargo test --features hardware-tests -- --ignored
//! ```

#[macro_use]
pub mod utils;

use dut_harness::scenario::catalog;
use dut_harness::{Role, ScenarioParams, ScenarioRunner};

#[test]
#[ignore]
fn test_boards_reach_prompt() {
    let pair = skip_without_boards!();
    utils::print_available_consoles();

    let mut provider = pair.provider();
    let session = provider.acquire().expect("open both consoles");
    for role in [Role::Dut1, Role::Dut2] {
        let dut = session.dut(role);
        dut.write("kernel reboot cold").expect("reboot");
        let elapsed = dut.wait_ready().expect("shell prompt");
        println!("{role} ready after {elapsed:?}");
    }
    provider.teardown().expect("teardown");
}

#[test]
#[ignore]
fn test_catalog_on_hardware() {
    let pair = skip_without_boards!();
    let mut provider = pair.provider();
    let params = ScenarioParams::from(&provider.config().scenario);

    for scenario in catalog::all(&params) {
        let timer = utils::TimingHelper::new(&scenario.name);
        let report = ScenarioRunner::new(provider.acquire().expect("open both consoles")).run(&scenario);
        timer.finish();
        assert!(report.passed(), "{}", report.summary());
    }
}
