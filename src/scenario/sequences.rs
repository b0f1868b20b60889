//! Setup sequences shared by the catalog.

use super::{Scenario, Step};
use crate::session::Role;

/// Cold-reboot a board, wait for its shell and bring up the BT stack.
///
/// `hci_marker` is the log fragment printed once the controller is up.
pub fn boot_stack(role: Role, hci_marker: &str) -> Vec<Step> {
    Scenario::builder("boot")
        .send(role, "kernel reboot cold")
        .await_ready(role)
        .send(role, "bt init")
        .expect(role, hci_marker)
        .build()
        .steps
}

/// Both boards rebooted, DUT1 advertising, DUT2 connected to it by name.
///
/// Ends once both sides have reported a connection parameter update.
pub fn pairing(peer_name: &str) -> Vec<Step> {
    Scenario::builder("pairing")
        .extend(boot_stack(Role::Dut1, "bt_hci_core"))
        .send(Role::Dut1, "bt advertise on")
        .expect(Role::Dut1, "Advertising started")
        .extend(boot_stack(Role::Dut2, "bt_hci_core"))
        .send(Role::Dut2, connect_by_name(peer_name))
        .expect(Role::Dut2, "LE conn param updated")
        .expect(Role::Dut1, "LE conn param updated")
        .build()
        .steps
}

/// DUT1 advertising connectable with scan response, DUT2 initialised for
/// scanning. No connection is made.
pub fn scan() -> Vec<Step> {
    Scenario::builder("scan")
        .extend(boot_stack(Role::Dut1, "bt_hci_core:"))
        .send(Role::Dut1, "bt advertise on")
        .expect(Role::Dut1, "Advertising started")
        .send(Role::Dut1, "bt adv-param conn-scan name")
        .send(Role::Dut1, "bt adv-start")
        .expect(Role::Dut1, "Advertiser")
        .send(Role::Dut1, "bt adv-info")
        .extend(boot_stack(Role::Dut2, "bt_hci_core"))
        .build()
        .steps
}

pub fn connect_by_name(peer_name: &str) -> String {
    format!("bt connect-name '{peer_name}'")
}
