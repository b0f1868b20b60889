//! Scripted console for exercising scenarios without hardware.
//!
//! A [`MockSerialPort`] records every command written to it and can react to
//! a command prefix by queueing reply lines, either on itself or on a peer
//! mock. Wiring two mocks together this way stands in for a pair of boards
//! that see each other over the air.

use super::error::PortError;
use super::traits::SerialPortAdapter;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::time::Duration;

struct Reply {
    /// `None` replies on the port that received the command.
    target: Option<Weak<Mutex<MockPortState>>>,
    lines: Vec<String>,
}

struct Reaction {
    prefix: String,
    replies: Vec<Reply>,
}

impl Reaction {
    /// An empty prefix only answers a blank line, like a shell prompt does.
    fn matches(&self, command: &str) -> bool {
        if self.prefix.is_empty() {
            command.is_empty()
        } else {
            command.starts_with(self.prefix.as_str())
        }
    }
}

struct MockPortState {
    read_queue: VecDeque<u8>,
    write_log: Vec<String>,
    reactions: Vec<Reaction>,
    echo: bool,
    fail_writes: bool,
    timeout: Duration,
    buffers_cleared: bool,
}

impl MockPortState {
    fn push_line(&mut self, line: &str) {
        self.read_queue.extend(line.as_bytes());
        self.read_queue.extend(b"\r\n");
    }
}

/// Mock DUT console.
///
/// # Example
/// ```
/// use dut_harness::port::{MockSerialPort, SerialPortAdapter};
///
/// let mut port = MockSerialPort::new("MOCK0");
/// port.on_write("bt init", ["bt_hci_core: HW Platform: Alif"]);
///
/// port.write_bytes(b"bt init\n").unwrap();
///
/// let mut buffer = [0u8; 64];
/// let n = port.read_bytes(&mut buffer).unwrap();
/// assert!(String::from_utf8_lossy(&buffer[..n]).contains("bt_hci_core"));
/// assert_eq!(port.commands(), vec!["bt init".to_string()]);
/// ```
#[derive(Clone)]
pub struct MockSerialPort {
    name: String,
    state: Arc<Mutex<MockPortState>>,
}

impl MockSerialPort {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockPortState {
                read_queue: VecDeque::new(),
                write_log: Vec::new(),
                reactions: Vec::new(),
                echo: false,
                fail_writes: false,
                timeout: Duration::from_millis(5),
                buffers_cleared: false,
            })),
        }
    }

    /// Echo each written command back, the way an interactive shell does.
    pub fn with_echo(self, echo: bool) -> Self {
        self.state.lock().echo = echo;
        self
    }

    /// Queue raw bytes for subsequent reads.
    pub fn enqueue_read(&self, data: &[u8]) {
        self.state.lock().read_queue.extend(data);
    }

    /// Queue one line of device output.
    pub fn push_line(&self, line: &str) {
        self.state.lock().push_line(line);
    }

    /// When a command starting with `prefix` is written, reply with `lines`
    /// on this port.
    pub fn on_write<I, S>(&self, prefix: &str, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_reply(prefix, None, lines);
    }

    /// When a command starting with `prefix` is written, make `peer` print
    /// `lines`. `peer` must be a different port than `self`.
    pub fn on_write_notify<I, S>(&self, prefix: &str, peer: &MockSerialPort, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_reply(prefix, Some(Arc::downgrade(&peer.state)), lines);
    }

    fn add_reply<I, S>(&self, prefix: &str, target: Option<Weak<Mutex<MockPortState>>>, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let reply = Reply {
            target,
            lines: lines.into_iter().map(Into::into).collect(),
        };
        let mut state = self.state.lock();
        match state.reactions.iter_mut().find(|r| r.prefix == prefix) {
            Some(reaction) => reaction.replies.push(reply),
            None => state.reactions.push(Reaction {
                prefix: prefix.to_string(),
                replies: vec![reply],
            }),
        }
    }

    /// Forget every reaction registered for `prefix`.
    pub fn clear_reactions(&self, prefix: &str) {
        self.state.lock().reactions.retain(|r| r.prefix != prefix);
    }

    /// Make every subsequent write fail with a broken-pipe error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.lock().fail_writes = fail;
    }

    /// Commands written so far, without line terminators.
    pub fn commands(&self) -> Vec<String> {
        self.state.lock().write_log.clone()
    }

    pub fn clear_write_log(&self) {
        self.state.lock().write_log.clear();
    }

    pub fn was_cleared(&self) -> bool {
        self.state.lock().buffers_cleared
    }

    pub fn available_bytes(&self) -> usize {
        self.state.lock().read_queue.len()
    }
}

impl SerialPortAdapter for MockSerialPort {
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        let mut state = self.state.lock();

        if state.fail_writes {
            return Err(PortError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "console disconnected",
            )));
        }

        let text = String::from_utf8_lossy(data);
        for command in text.lines().map(str::trim) {
            if !command.is_empty() {
                state.write_log.push(command.to_string());
                if state.echo {
                    state.push_line(command);
                }
            }

            let mut local = Vec::new();
            let mut remote = Vec::new();
            if let Some(reaction) = state.reactions.iter().find(|r| r.matches(command)) {
                for reply in &reaction.replies {
                    match &reply.target {
                        None => local.extend(reply.lines.iter().cloned()),
                        Some(peer) => remote.push((peer.clone(), reply.lines.clone())),
                    }
                }
            }

            for line in &local {
                state.push_line(line);
            }
            for (peer, lines) in remote {
                if let Some(peer) = peer.upgrade() {
                    let mut peer = peer.lock();
                    for line in &lines {
                        peer.push_line(line);
                    }
                }
            }
        }

        Ok(data.len())
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        let (n, timeout) = {
            let mut state = self.state.lock();
            let mut n = 0;
            for slot in buffer.iter_mut() {
                match state.read_queue.pop_front() {
                    Some(byte) => {
                        *slot = byte;
                        n += 1;
                    }
                    None => break,
                }
            }
            (n, state.timeout)
        };

        if n == 0 {
            // Behave like a blocking console read that found nothing.
            std::thread::sleep(timeout);
            return Err(PortError::timeout(timeout));
        }
        Ok(n)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_timeout(&mut self, timeout: Duration) -> Result<(), PortError> {
        self.state.lock().timeout = timeout;
        Ok(())
    }

    fn clear_buffers(&mut self) -> Result<(), PortError> {
        let mut state = self.state.lock();
        state.read_queue.clear();
        state.buffers_cleared = true;
        Ok(())
    }

    fn bytes_to_read(&self) -> Option<usize> {
        Some(self.available_bytes())
    }
}

impl std::fmt::Debug for MockSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSerialPort")
            .field("name", &self.name)
            .field("available_bytes", &self.available_bytes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(port: &mut MockSerialPort) -> String {
        let mut out = Vec::new();
        let mut buffer = [0u8; 32];
        while let Ok(n) = port.read_bytes(&mut buffer) {
            out.extend_from_slice(&buffer[..n]);
        }
        String::from_utf8_lossy(&out).into_owned()
    }

    #[test]
    fn test_reaction_replies_locally() {
        let mut port = MockSerialPort::new("MOCK0");
        port.on_write("bt advertise on", ["Advertising started"]);

        port.write_bytes(b"bt advertise on\n").unwrap();
        assert_eq!(drain(&mut port), "Advertising started\r\n");
    }

    #[test]
    fn test_reaction_notifies_peer() {
        let mut central = MockSerialPort::new("DUT2");
        let mut peripheral = MockSerialPort::new("DUT1");
        central.on_write_notify("bt connect-name", &peripheral, ["Connected: AA:BB"]);

        central.write_bytes(b"bt connect-name 'test_shell'\n").unwrap();
        assert_eq!(drain(&mut central), "");
        assert_eq!(drain(&mut peripheral), "Connected: AA:BB\r\n");
    }

    #[test]
    fn test_echo_precedes_reply() {
        let mut port = MockSerialPort::new("MOCK0").with_echo(true);
        port.on_write("bt init", ["bt_hci_core: ready"]);

        port.write_bytes(b"bt init\n").unwrap();
        assert_eq!(drain(&mut port), "bt init\r\nbt_hci_core: ready\r\n");
    }

    #[test]
    fn test_unmatched_command_is_logged_only() {
        let mut port = MockSerialPort::new("MOCK0");
        port.write_bytes(b"kernel reboot cold\n").unwrap();
        assert_eq!(port.commands(), vec!["kernel reboot cold".to_string()]);
        assert_eq!(port.available_bytes(), 0);
    }

    #[test]
    fn test_blank_line_reaction() {
        let mut port = MockSerialPort::new("MOCK0");
        port.on_write("", ["uart:~$ "]);

        port.write_bytes(b"bt init\n").unwrap();
        assert_eq!(port.available_bytes(), 0);

        port.write_bytes(b"\n").unwrap();
        assert_eq!(drain(&mut port), "uart:~$ \r\n");
        assert_eq!(port.commands(), vec!["bt init".to_string()]);
    }

    #[test]
    fn test_empty_read_is_idle() {
        let mut port = MockSerialPort::new("MOCK0");
        port.set_timeout(Duration::from_millis(1)).unwrap();
        let mut buffer = [0u8; 4];
        let err = port.read_bytes(&mut buffer).unwrap_err();
        assert!(err.is_idle());
    }

    #[test]
    fn test_clear_reactions_and_buffers() {
        let mut port = MockSerialPort::new("MOCK0");
        port.on_write("bt init", ["bt_hci_core"]);
        port.clear_reactions("bt init");
        port.write_bytes(b"bt init\n").unwrap();
        assert_eq!(port.available_bytes(), 0);

        port.push_line("stale");
        port.clear_buffers().unwrap();
        assert!(port.was_cleared());
        assert_eq!(port.available_bytes(), 0);
    }

    #[test]
    fn test_write_failure() {
        let mut port = MockSerialPort::new("MOCK0");
        port.set_fail_writes(true);
        assert!(matches!(port.write_bytes(b"bt init\n"), Err(PortError::Io(_))));
    }
}
