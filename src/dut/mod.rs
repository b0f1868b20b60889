//! Command/expectation driver for one device under test.
//!
//! A [`Dut`] writes shell commands to its console and blocks until expected
//! output shows up. Expectations are the only suspension point; they poll the
//! transport with short reads until a match or the window closes.

pub mod buffer;
pub mod pattern;

pub use buffer::OutputBuffer;
pub use pattern::Pattern;

use crate::config::{ExpectConfig, ReadinessConfig};
use crate::error::{HarnessError, HarnessResult};
use crate::port::SerialPortAdapter;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

const READ_CHUNK: usize = 512;
const TAIL_BYTES: usize = 256;

/// Output captured by a successful expectation.
#[derive(Debug, Clone)]
pub struct ExpectMatch {
    /// Output between the previous match and this one
    pub before: String,
    pub matched: String,
    pub elapsed: Duration,
}

/// Handle to one DUT shell console.
pub struct Dut {
    id: String,
    port: Box<dyn SerialPortAdapter>,
    buffer: OutputBuffer,
    line_ending: String,
    default_timeout: Duration,
    poll_interval: Duration,
    readiness: ReadinessConfig,
}

impl Dut {
    pub fn new(id: impl Into<String>, port: Box<dyn SerialPortAdapter>, expect: &ExpectConfig) -> Self {
        Self {
            id: id.into(),
            port,
            buffer: OutputBuffer::new(expect.buffer_limit),
            line_ending: "\n".to_string(),
            default_timeout: expect.default_timeout(),
            poll_interval: expect.poll_interval(),
            readiness: ReadinessConfig::default(),
        }
    }

    pub fn with_line_ending(mut self, line_ending: impl Into<String>) -> Self {
        self.line_ending = line_ending.into();
        self
    }

    pub fn with_readiness(mut self, readiness: ReadinessConfig) -> Self {
        self.readiness = readiness;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn port_name(&self) -> &str {
        self.port.name()
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Send one shell command. Nothing is read back; effects surface through
    /// later expectations.
    pub fn write(&mut self, command: &str) -> HarnessResult<()> {
        debug!(device = %self.id, command, "write");
        let line = format!("{command}{}", self.line_ending);
        self.port
            .write_bytes(line.as_bytes())
            .map_err(|e| HarnessError::port(self.id.clone(), e))?;
        Ok(())
    }

    /// Block until `pattern` shows up in the output or `timeout` elapses.
    pub fn expect(&mut self, pattern: impl Into<Pattern>, timeout: Duration) -> HarnessResult<ExpectMatch> {
        let pattern = pattern.into();
        let started = Instant::now();
        let deadline = started + timeout;

        let mut drained = false;
        loop {
            if let Some((before, matched)) = self.buffer.take_match(&pattern) {
                let elapsed = started.elapsed();
                debug!(device = %self.id, %pattern, ?elapsed, "matched");
                return Ok(ExpectMatch {
                    before,
                    matched,
                    elapsed,
                });
            }

            let now = Instant::now();
            if now >= deadline {
                // Even a zero window looks at what the transport already holds.
                if !drained {
                    drained = true;
                    self.fill(Duration::ZERO)?;
                    continue;
                }
                warn!(device = %self.id, %pattern, window = ?timeout, "expectation timed out");
                return Err(HarnessError::ExpectTimeout {
                    device: self.id.clone(),
                    pattern: pattern.to_string(),
                    window: timeout,
                    tail: self.buffer.tail(TAIL_BYTES),
                });
            }

            drained = true;
            self.fill((deadline - now).min(self.poll_interval))?;
        }
    }

    /// [`Dut::expect`] with the configured default window.
    pub fn expect_default(&mut self, pattern: impl Into<Pattern>) -> HarnessResult<ExpectMatch> {
        let timeout = self.default_timeout;
        self.expect(pattern, timeout)
    }

    /// Drop everything received so far, buffered or still in the transport.
    pub fn discard_pending(&mut self) -> HarnessResult<()> {
        self.buffer.clear();
        self.port
            .clear_buffers()
            .map_err(|e| HarnessError::port(self.id.clone(), e))
    }

    /// Wait until the shell accepts commands again, typically after a reboot.
    ///
    /// Output up to the boot marker predates the reboot and is dropped, so a
    /// prompt printed by the old image never counts. After the marker the
    /// readiness line is written and the prompt awaited, repeating until the
    /// readiness budget is spent. With readiness disabled this falls back to
    /// a fixed settle delay.
    pub fn wait_ready(&mut self) -> HarnessResult<Duration> {
        let started = Instant::now();

        if !self.readiness.enabled {
            std::thread::sleep(self.readiness.fallback_settle());
            return Ok(started.elapsed());
        }

        let budget = self.readiness.timeout();
        let deadline = started + budget;
        let not_ready = |id: &str| HarnessError::NotReady {
            device: id.to_string(),
            window: budget,
        };

        if self.readiness.boot_marker.is_empty() {
            self.discard_pending()?;
        } else {
            let marker = Pattern::literal(self.readiness.boot_marker.clone());
            match self.expect(marker, budget) {
                Ok(_) => debug!(device = %self.id, "boot marker seen"),
                Err(HarnessError::ExpectTimeout { .. }) => {
                    warn!(device = %self.id, "no boot marker");
                    return Err(not_ready(&self.id));
                }
                Err(e) => return Err(e),
            }
        }

        let probe = self.readiness.probe.clone();
        let prompt = Pattern::literal(self.readiness.prompt.clone());
        let mut attempts = 0u32;
        loop {
            let now = Instant::now();
            if now >= deadline {
                warn!(device = %self.id, attempts, "shell never became ready");
                return Err(not_ready(&self.id));
            }

            attempts += 1;
            self.write(&probe)?;
            let window = (deadline - now).min(self.readiness.poll());
            match self.expect(prompt.clone(), window) {
                Ok(_) => {
                    let elapsed = started.elapsed();
                    debug!(device = %self.id, attempts, ?elapsed, "shell ready");
                    return Ok(elapsed);
                }
                Err(HarnessError::ExpectTimeout { .. }) => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn fill(&mut self, wait: Duration) -> HarnessResult<usize> {
        self.port
            .set_timeout(wait)
            .map_err(|e| HarnessError::port(self.id.clone(), e))?;

        let mut chunk = [0u8; READ_CHUNK];
        match self.port.read_bytes(&mut chunk) {
            Ok(n) => {
                trace!(device = %self.id, bytes = n, "read");
                self.buffer.push(&chunk[..n]);
                Ok(n)
            }
            Err(e) if e.is_idle() => Ok(0),
            Err(e) => Err(HarnessError::port(self.id.clone(), e)),
        }
    }
}

impl std::fmt::Debug for Dut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dut")
            .field("id", &self.id)
            .field("port", &self.port.name())
            .field("buffered", &self.buffer.len())
            .finish()
    }
}
