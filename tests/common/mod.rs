//! Shared test utilities for the DUT harness tests.
//!
//! This module provides a simulated pair of BLE shells built from two wired
//! [`MockSerialPort`]s, plus a fast configuration and a session provider
//! over the pair.

#![allow(dead_code)]

use dut_harness::config::{Config, DutEndpoint};
use dut_harness::port::{MockSerialPort, SerialPortAdapter};
use dut_harness::{HarnessResult, Role, SessionProvider};

pub const PROMPT: &str = "uart:~$ ";
pub const HCI_UP: &str = "bt_hci_core: HW Platform: Alif (0x0001)";
pub const CONN_UPDATE: &str = "LE conn param updated: int 0x0028 lat 0 to 42";

/// Two mock consoles that answer the shell commands the catalog issues.
///
/// `dut1` plays the advertising peripheral, `dut2` the scanning central.
/// Commands on one board produce the over-the-air effects on the other.
pub struct SimulatedPair {
    pub dut1: MockSerialPort,
    pub dut2: MockSerialPort,
}

impl SimulatedPair {
    pub fn new() -> Self {
        let dut1 = MockSerialPort::new("SIM-DUT1").with_echo(true);
        let dut2 = MockSerialPort::new("SIM-DUT2").with_echo(true);

        for port in [&dut1, &dut2] {
            port.on_write("", [PROMPT]);
            port.on_write("kernel reboot cold", ["*** Booting Zephyr OS build v3.6.0 ***"]);
            port.on_write("bt init", ["Bluetooth initialized", HCI_UP]);
        }

        dut1.on_write("bt advertise on", ["Advertising started"]);
        dut1.on_write("bt adv-param", ["Advertiser[0] 0x20001234 created"]);
        dut1.on_write("bt adv-start", ["Advertiser[0] 0x20001234 set started"]);
        dut1.on_write("bt adv-info", ["Advertiser[0] 0x20001234", "Own address: C0:11:22:33:44:55"]);
        dut1.on_write("l2cap register", ["L2CAP psm 41 sec_level 1 registered"]);

        dut2.on_write("bt scan on", ["Bluetooth active scan enabled"]);
        dut2.on_write("bt scan off", ["Scan successfully stopped"]);
        dut2.on_write("bt connect-name", ["Connected: C0:11:22:33:44:55 (random)", CONN_UPDATE]);
        dut2.on_write_notify("bt connect-name", &dut1, ["Connected: D0:AA:BB:CC:DD:EE (random)", CONN_UPDATE]);
        dut2.on_write("l2cap connect", ["Channel 0x20005678 connected"]);
        dut2.on_write("l2cap send", ["Outgoing data channel 0x20005678 len 14"]);
        dut2.on_write_notify("l2cap send", &dut1, ["Incoming data channel 0x2000abcd len 14"]);

        for (port, peer) in [(&dut1, &dut2), (&dut2, &dut1)] {
            port.on_write("bt disconnect", ["Disconnected: reason 0x16"]);
            port.on_write_notify("bt disconnect", peer, ["Disconnected: reason 0x13"]);
        }

        Self { dut1, dut2 }
    }

    pub fn port(&self, role: Role) -> &MockSerialPort {
        match role {
            Role::Dut1 => &self.dut1,
            Role::Dut2 => &self.dut2,
        }
    }

    /// Session provider handing out clones of this pair's consoles.
    pub fn provider(
        &self,
    ) -> SessionProvider<impl Fn(Role, &DutEndpoint) -> HarnessResult<Box<dyn SerialPortAdapter>>> {
        let dut1 = self.dut1.clone();
        let dut2 = self.dut2.clone();
        SessionProvider::with_factory(fast_config(), move |role: Role, _: &DutEndpoint| -> HarnessResult<Box<dyn SerialPortAdapter>> {
            let port: Box<dyn SerialPortAdapter> = match role {
                Role::Dut1 => Box::new(dut1.clone()),
                Role::Dut2 => Box::new(dut2.clone()),
            };
            Ok(port)
        })
    }
}

/// Short windows so failing expectations resolve quickly.
pub fn fast_config() -> Config {
    let mut config = Config::default();
    config.expect.default_timeout_ms = 300;
    config.expect.poll_interval_ms = 5;
    config.readiness.poll_ms = 20;
    config.readiness.timeout_ms = 300;
    config.scenario.scan_window_ms = 10;
    config
}
