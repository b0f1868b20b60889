//! Session-scoped ownership of the two DUT handles.
//!
//! Opening and rebooting boards is slow, so one [`DutSession`] is shared by
//! every scenario in a run. [`SessionProvider`] opens it lazily on first use,
//! hands out the same handles afterwards and closes them on teardown.

use crate::config::{Config, ConfigError, DutEndpoint};
use crate::dut::Dut;
use crate::error::{HarnessError, HarnessResult};
use crate::port::{SerialPortAdapter, SyncSerialPort};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

/// Which of the two boards a step addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Peripheral: advertises and accepts connections
    Dut1,
    /// Central: scans and initiates connections
    Dut2,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Dut1 => "dut1",
            Role::Dut2 => "dut2",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two open device handles.
#[derive(Debug)]
pub struct DutSession {
    dut1: Dut,
    dut2: Dut,
    opened_at: DateTime<Utc>,
}

impl DutSession {
    pub fn new(dut1: Dut, dut2: Dut) -> Self {
        Self {
            dut1,
            dut2,
            opened_at: Utc::now(),
        }
    }

    pub fn dut(&mut self, role: Role) -> &mut Dut {
        match role {
            Role::Dut1 => &mut self.dut1,
            Role::Dut2 => &mut self.dut2,
        }
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Drop pending output on both consoles and release them.
    pub fn teardown(mut self) -> HarnessResult<()> {
        let first = self.dut1.discard_pending();
        let second = self.dut2.discard_pending();
        info!(
            dut1 = self.dut1.port_name(),
            dut2 = self.dut2.port_name(),
            "session closed"
        );
        first.and(second)
    }
}

/// Opens the transport behind one DUT.
pub trait PortFactory {
    fn open(&self, role: Role, endpoint: &DutEndpoint) -> HarnessResult<Box<dyn SerialPortAdapter>>;
}

impl<F> PortFactory for F
where
    F: Fn(Role, &DutEndpoint) -> HarnessResult<Box<dyn SerialPortAdapter>>,
{
    fn open(&self, role: Role, endpoint: &DutEndpoint) -> HarnessResult<Box<dyn SerialPortAdapter>> {
        self(role, endpoint)
    }
}

/// Opens real serial consoles from the `[duts]` configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialPortFactory;

impl PortFactory for SerialPortFactory {
    fn open(&self, role: Role, endpoint: &DutEndpoint) -> HarnessResult<Box<dyn SerialPortAdapter>> {
        let port_name = endpoint
            .port
            .as_deref()
            .ok_or_else(|| ConfigError::MissingRequired(format!("duts.{role}.port")))?;
        let port = SyncSerialPort::open(port_name, endpoint.port_configuration())
            .map_err(|e| HarnessError::port(role.as_str(), e))?;
        Ok(Box::new(port))
    }
}

/// Lazily opened, explicitly torn down owner of a [`DutSession`].
pub struct SessionProvider<F: PortFactory = SerialPortFactory> {
    config: Config,
    factory: F,
    session: Option<DutSession>,
    opens: u32,
}

impl SessionProvider<SerialPortFactory> {
    pub fn from_config(config: Config) -> Self {
        Self::with_factory(config, SerialPortFactory)
    }
}

impl<F: PortFactory> SessionProvider<F> {
    pub fn with_factory(config: Config, factory: F) -> Self {
        Self {
            config,
            factory,
            session: None,
            opens: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// How many times the consoles have been opened by this provider.
    pub fn open_count(&self) -> u32 {
        self.opens
    }

    /// The shared session, opening both consoles on first use.
    pub fn acquire(&mut self) -> HarnessResult<&mut DutSession> {
        let session = match self.session.take() {
            Some(session) => session,
            None => self.open()?,
        };
        Ok(self.session.insert(session))
    }

    /// Close the session if one is open. The next `acquire` reopens it.
    pub fn teardown(&mut self) -> HarnessResult<()> {
        match self.session.take() {
            Some(session) => session.teardown(),
            None => Ok(()),
        }
    }

    fn open(&mut self) -> HarnessResult<DutSession> {
        let dut1 = self.open_dut(Role::Dut1)?;
        let dut2 = self.open_dut(Role::Dut2)?;
        self.opens += 1;
        info!(
            dut1 = dut1.port_name(),
            dut2 = dut2.port_name(),
            "session opened"
        );
        Ok(DutSession::new(dut1, dut2))
    }

    fn open_dut(&self, role: Role) -> HarnessResult<Dut> {
        let endpoint = match role {
            Role::Dut1 => &self.config.duts.dut1,
            Role::Dut2 => &self.config.duts.dut2,
        };
        let port = self.factory.open(role, endpoint)?;
        Ok(Dut::new(role.as_str(), port, &self.config.expect)
            .with_line_ending(endpoint.line_ending.clone())
            .with_readiness(self.config.readiness.clone()))
    }
}

impl<F: PortFactory> Drop for SessionProvider<F> {
    fn drop(&mut self) {
        if let Err(e) = self.teardown() {
            warn!(error = %e, "session teardown failed");
        }
    }
}
