//! The named end-to-end BLE checks.

use super::sequences::{connect_by_name, pairing, scan};
use super::Scenario;
use crate::config::ScenarioConfig;
use crate::dut::Pattern;
use crate::error::{HarnessError, HarnessResult};
use crate::session::Role;
use once_cell::sync::Lazy;
use std::time::Duration;

static CHANNEL_CONNECTED: Lazy<regex::bytes::Regex> = Lazy::new(|| {
    regex::bytes::Regex::new(r"Channel 0x[0-9a-fA-F]+ connected").expect("static regex")
});

/// Scenario names in catalog order.
pub const SCENARIO_NAMES: [&str; 4] = ["client-disconnect", "server-disconnect", "scan", "l2cap"];

/// Values the catalog substitutes into commands and expectations.
#[derive(Debug, Clone)]
pub struct ScenarioParams {
    pub peer_name: String,
    pub l2cap_psm: u16,
    pub l2cap_send_args: String,
    pub scan_window: Duration,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self::from(&ScenarioConfig::default())
    }
}

impl From<&ScenarioConfig> for ScenarioParams {
    fn from(config: &ScenarioConfig) -> Self {
        Self {
            peer_name: config.peer_name.clone(),
            l2cap_psm: config.l2cap_psm,
            l2cap_send_args: config.l2cap_send_args.clone(),
            scan_window: config.scan_window(),
        }
    }
}

/// Pair, drop the link from the central, re-advertise and reconnect.
pub fn client_disconnect(params: &ScenarioParams) -> Scenario {
    Scenario::builder("client-disconnect")
        .describe("central drops the link, peripheral re-advertises, central reconnects")
        .extend(pairing(&params.peer_name))
        .send(Role::Dut2, "bt disconnect")
        .send(Role::Dut1, "bt advertise on")
        .expect(Role::Dut1, "Advertising started")
        .send(Role::Dut2, connect_by_name(&params.peer_name))
        .expect(Role::Dut2, "LE conn param updated")
        .expect(Role::Dut1, "LE conn param updated")
        .build()
}

/// Pair, drop the link from the peripheral, re-advertise and reconnect.
pub fn server_disconnect(params: &ScenarioParams) -> Scenario {
    Scenario::builder("server-disconnect")
        .describe("peripheral drops the link, re-advertises, central reconnects")
        .extend(pairing(&params.peer_name))
        .send(Role::Dut1, "bt disconnect")
        .send(Role::Dut1, "bt advertise on")
        .expect(Role::Dut1, "Advertising started")
        .send(Role::Dut2, connect_by_name(&params.peer_name))
        .expect(Role::Dut2, "LE conn param updated:")
        .expect(Role::Dut1, "LE conn param updated:")
        .build()
}

/// Scan for the advertiser, then connect to it.
pub fn scan_then_connect(params: &ScenarioParams) -> Scenario {
    Scenario::builder("scan")
        .describe("central scans for the connectable advertiser, then connects by name")
        .extend(scan())
        .send(Role::Dut2, "bt scan on")
        .pause(params.scan_window, "scan window")
        .send(Role::Dut2, "bt scan off")
        .send(Role::Dut2, connect_by_name(&params.peer_name))
        .expect(Role::Dut2, "LE conn param updated:")
        .expect(Role::Dut1, "LE conn param updated:")
        .build()
}

/// Pair, open an L2CAP channel and push data across it.
///
/// The shell takes the PSM in hex and reports it in decimal.
pub fn l2cap(params: &ScenarioParams) -> Scenario {
    let psm = params.l2cap_psm;
    Scenario::builder("l2cap")
        .describe("peripheral registers a PSM, central connects a channel and sends data")
        .extend(pairing(&params.peer_name))
        .send(Role::Dut1, format!("l2cap register {psm:x}"))
        .expect(Role::Dut1, format!("L2CAP psm {psm} sec_level 1 registered"))
        .send(Role::Dut2, format!("l2cap connect {psm:x}"))
        .expect(Role::Dut2, Pattern::Regex(CHANNEL_CONNECTED.clone()))
        .send(Role::Dut2, format!("l2cap send {}", params.l2cap_send_args))
        .expect(Role::Dut2, "Outgoing data channel")
        .expect(Role::Dut1, "Incoming data channel")
        .build()
}

pub fn all(params: &ScenarioParams) -> Vec<Scenario> {
    vec![
        client_disconnect(params),
        server_disconnect(params),
        scan_then_connect(params),
        l2cap(params),
    ]
}

pub fn find(name: &str, params: &ScenarioParams) -> HarnessResult<Scenario> {
    match name {
        "client-disconnect" => Ok(client_disconnect(params)),
        "server-disconnect" => Ok(server_disconnect(params)),
        "scan" => Ok(scan_then_connect(params)),
        "l2cap" => Ok(l2cap(params)),
        other => Err(HarnessError::UnknownScenario(other.to_string())),
    }
}
