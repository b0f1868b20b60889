//! Executes scenarios against an open session.

use super::report::{Outcome, ScenarioReport, StepRecord};
use super::{Scenario, Step};
use crate::error::{HarnessError, HarnessResult};
use crate::session::DutSession;
use chrono::Utc;
use std::time::Instant;
use tracing::{error, info, info_span};
use uuid::Uuid;

/// Runs steps in order and stops at the first failure. No retries.
pub struct ScenarioRunner<'a> {
    session: &'a mut DutSession,
}

impl<'a> ScenarioRunner<'a> {
    pub fn new(session: &'a mut DutSession) -> Self {
        Self { session }
    }

    /// Run `scenario` and report the outcome; failures are recorded, not returned.
    pub fn run(&mut self, scenario: &Scenario) -> ScenarioReport {
        self.execute(scenario).0
    }

    /// Like [`ScenarioRunner::run`], but a failed step becomes
    /// [`HarnessError::ScenarioFailed`].
    pub fn try_run(&mut self, scenario: &Scenario) -> HarnessResult<ScenarioReport> {
        match self.execute(scenario) {
            (report, None) => Ok(report),
            (_, Some((step, source))) => Err(HarnessError::ScenarioFailed {
                scenario: scenario.name.clone(),
                step,
                source: Box::new(source),
            }),
        }
    }

    /// Run the same scenario `times` times back to back.
    pub fn run_repeated(&mut self, scenario: &Scenario, times: usize) -> Vec<ScenarioReport> {
        (0..times).map(|_| self.run(scenario)).collect()
    }

    fn execute(&mut self, scenario: &Scenario) -> (ScenarioReport, Option<(usize, HarnessError)>) {
        let run_id = Uuid::new_v4();
        let span = info_span!("scenario", name = %scenario.name, %run_id);
        let _enter = span.enter();

        let started_at = Utc::now();
        let mut steps = Vec::with_capacity(scenario.steps.len());
        let mut failure = None;

        info!(steps = scenario.steps.len(), "scenario started");
        for (index, step) in scenario.steps.iter().enumerate() {
            let started = Instant::now();
            let result = self.step(step);
            let elapsed_ms = started.elapsed().as_millis() as u64;

            match result {
                Ok(matched) => steps.push(StepRecord {
                    index,
                    description: step.to_string(),
                    elapsed_ms,
                    matched,
                    error: None,
                }),
                Err(e) => {
                    error!(index, step = %step, error = %e, "step failed");
                    steps.push(StepRecord {
                        index,
                        description: step.to_string(),
                        elapsed_ms,
                        matched: None,
                        error: Some(e.to_string()),
                    });
                    failure = Some((index, e));
                    break;
                }
            }
        }

        let outcome = match &failure {
            None => Outcome::Passed,
            Some((step, e)) => Outcome::Failed {
                step: *step,
                reason: e.to_string(),
            },
        };
        let report = ScenarioReport {
            run_id,
            scenario: scenario.name.clone(),
            started_at,
            finished_at: Utc::now(),
            outcome,
            steps,
        };
        info!(summary = %report.summary(), "scenario finished");
        (report, failure)
    }

    fn step(&mut self, step: &Step) -> HarnessResult<Option<String>> {
        match step {
            Step::Send { role, command } => {
                self.session.dut(*role).write(command)?;
                Ok(None)
            }
            Step::Expect {
                role,
                pattern,
                timeout,
            } => {
                let dut = self.session.dut(*role);
                let window = timeout.unwrap_or_else(|| dut.default_timeout());
                let m = dut.expect(pattern.clone(), window)?;
                Ok(Some(m.matched))
            }
            Step::AwaitReady { role } => {
                self.session.dut(*role).wait_ready()?;
                Ok(None)
            }
            Step::Pause { duration, reason } => {
                info!(?duration, reason = %reason, "pause");
                std::thread::sleep(*duration);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExpectConfig;
    use crate::dut::Dut;
    use crate::port::MockSerialPort;
    use crate::session::Role;
    use std::time::Duration;

    fn session(dut1: &MockSerialPort, dut2: &MockSerialPort) -> DutSession {
        let expect = ExpectConfig {
            default_timeout_ms: 50,
            poll_interval_ms: 5,
            buffer_limit: 4096,
        };
        DutSession::new(
            Dut::new("dut1", Box::new(dut1.clone()), &expect),
            Dut::new("dut2", Box::new(dut2.clone()), &expect),
        )
    }

    #[test]
    fn test_run_records_matches() {
        let (p1, p2) = (MockSerialPort::new("A"), MockSerialPort::new("B"));
        p1.on_write("bt advertise on", ["Advertising started"]);
        p2.on_write_notify("bt connect-name", &p1, ["Connected"]);
        let mut session = session(&p1, &p2);

        let scenario = Scenario::builder("mini")
            .send(Role::Dut1, "bt advertise on")
            .expect(Role::Dut1, "Advertising started")
            .send(Role::Dut2, "bt connect-name 'x'")
            .expect(Role::Dut1, "Connected")
            .build();

        let report = ScenarioRunner::new(&mut session).run(&scenario);
        assert!(report.passed(), "{}", report.summary());
        assert_eq!(report.matches(), vec!["Advertising started", "Connected"]);
        assert_eq!(p2.commands(), vec!["bt connect-name 'x'".to_string()]);
    }

    #[test]
    fn test_run_stops_at_first_failure() {
        let (p1, p2) = (MockSerialPort::new("A"), MockSerialPort::new("B"));
        let mut session = session(&p1, &p2);

        let scenario = Scenario::builder("broken")
            .send(Role::Dut1, "bt init")
            .expect_within(Role::Dut1, "bt_hci_core", Duration::from_millis(20))
            .send(Role::Dut1, "bt advertise on")
            .build();

        let report = ScenarioRunner::new(&mut session).run(&scenario);
        assert_eq!(report.steps.len(), 2);
        assert!(matches!(report.outcome, Outcome::Failed { step: 1, .. }));
        assert_eq!(p1.commands(), vec!["bt init".to_string()]);
    }

    #[test]
    fn test_try_run_wraps_error() {
        let (p1, p2) = (MockSerialPort::new("A"), MockSerialPort::new("B"));
        let mut session = session(&p1, &p2);
        let scenario = Scenario::builder("broken").expect(Role::Dut2, "never").build();

        let err = ScenarioRunner::new(&mut session).try_run(&scenario).unwrap_err();
        assert!(err.is_expect_timeout());
        assert!(err.to_string().contains("'broken' failed at step 0"));
    }
}
