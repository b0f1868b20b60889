//! Scripted BLE workflows over two DUTs.
//!
//! A [`Scenario`] is an ordered list of [`Step`]s. The reusable sequences in
//! [`sequences`] bring the boards into a known state; [`catalog`] composes
//! them into the named end-to-end checks; [`runner`] executes a scenario and
//! produces a [`report::ScenarioReport`].

pub mod catalog;
pub mod report;
pub mod runner;
pub mod sequences;

pub use catalog::ScenarioParams;
pub use report::{Outcome, ScenarioReport, StepRecord};
pub use runner::ScenarioRunner;

use crate::dut::Pattern;
use crate::session::Role;
use std::fmt;
use std::time::Duration;

/// One action against a DUT.
#[derive(Debug, Clone)]
pub enum Step {
    /// Write a shell command.
    Send { role: Role, command: String },
    /// Wait for output; `None` uses the device's default window.
    Expect {
        role: Role,
        pattern: Pattern,
        timeout: Option<Duration>,
    },
    /// Wait until the shell answers its readiness probe.
    AwaitReady { role: Role },
    /// Deliberate dwell, such as letting a scan run. Not a readiness wait.
    Pause { duration: Duration, reason: String },
}

impl Step {
    pub fn role(&self) -> Option<Role> {
        match self {
            Step::Send { role, .. } | Step::Expect { role, .. } | Step::AwaitReady { role } => Some(*role),
            Step::Pause { .. } => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Send { role, command } => write!(f, "{role} <- {command}"),
            Step::Expect {
                role,
                pattern,
                timeout: Some(t),
            } => write!(f, "{role} expect {pattern} within {t:?}"),
            Step::Expect { role, pattern, .. } => write!(f, "{role} expect {pattern}"),
            Step::AwaitReady { role } => write!(f, "{role} await ready"),
            Step::Pause { duration, reason } => write!(f, "pause {duration:?} ({reason})"),
        }
    }
}

/// A named, ordered list of steps.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub description: String,
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn builder(name: impl Into<String>) -> ScenarioBuilder {
        ScenarioBuilder {
            scenario: Scenario {
                name: name.into(),
                description: String::new(),
                steps: Vec::new(),
            },
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Fluent construction of a [`Scenario`].
#[derive(Debug, Clone)]
pub struct ScenarioBuilder {
    scenario: Scenario,
}

impl ScenarioBuilder {
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.scenario.description = description.into();
        self
    }

    pub fn send(mut self, role: Role, command: impl Into<String>) -> Self {
        self.scenario.steps.push(Step::Send {
            role,
            command: command.into(),
        });
        self
    }

    pub fn expect(mut self, role: Role, pattern: impl Into<Pattern>) -> Self {
        self.scenario.steps.push(Step::Expect {
            role,
            pattern: pattern.into(),
            timeout: None,
        });
        self
    }

    pub fn expect_within(mut self, role: Role, pattern: impl Into<Pattern>, timeout: Duration) -> Self {
        self.scenario.steps.push(Step::Expect {
            role,
            pattern: pattern.into(),
            timeout: Some(timeout),
        });
        self
    }

    pub fn await_ready(mut self, role: Role) -> Self {
        self.scenario.steps.push(Step::AwaitReady { role });
        self
    }

    pub fn pause(mut self, duration: Duration, reason: impl Into<String>) -> Self {
        self.scenario.steps.push(Step::Pause {
            duration,
            reason: reason.into(),
        });
        self
    }

    /// Append the steps of another scenario, typically a setup sequence.
    pub fn extend(mut self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.scenario.steps.extend(steps);
        self
    }

    pub fn build(self) -> Scenario {
        self.scenario
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_order() {
        let scenario = Scenario::builder("smoke")
            .describe("init only")
            .send(Role::Dut1, "bt init")
            .expect(Role::Dut1, "bt_hci_core")
            .pause(Duration::from_millis(5), "settle")
            .build();

        assert_eq!(scenario.len(), 3);
        assert_eq!(scenario.steps[0].to_string(), "dut1 <- bt init");
        assert_eq!(scenario.steps[1].to_string(), "dut1 expect \"bt_hci_core\"");
        assert_eq!(scenario.steps[2].role(), None);
    }

    #[test]
    fn test_expect_within_display() {
        let scenario = Scenario::builder("x")
            .expect_within(Role::Dut2, "Advertiser", Duration::from_secs(2))
            .build();
        assert_eq!(scenario.steps[0].to_string(), "dut2 expect \"Advertiser\" within 2s");
    }
}
