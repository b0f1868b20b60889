//! Results of a scenario run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed { step: usize, reason: String },
}

/// One executed step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub index: usize,
    pub description: String,
    pub elapsed_ms: u64,
    /// Text matched by an expectation, if the step was one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub run_id: Uuid,
    pub scenario: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: Outcome,
    pub steps: Vec<StepRecord>,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Passed
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    /// Expectation texts in the order they matched.
    pub fn matches(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|s| s.matched.as_deref())
            .collect()
    }

    /// One-line summary for terminal output.
    pub fn summary(&self) -> String {
        match &self.outcome {
            Outcome::Passed => format!(
                "PASS {} ({} steps, {} ms)",
                self.scenario,
                self.steps.len(),
                self.duration_ms()
            ),
            Outcome::Failed { step, reason } => {
                format!("FAIL {} at step {}: {}", self.scenario, step, reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_include;
    use serde_json::json;

    fn report(outcome: Outcome) -> ScenarioReport {
        let now = Utc::now();
        ScenarioReport {
            run_id: Uuid::new_v4(),
            scenario: "l2cap".into(),
            started_at: now,
            finished_at: now,
            outcome,
            steps: vec![StepRecord {
                index: 0,
                description: "dut1 <- bt init".into(),
                elapsed_ms: 1,
                matched: None,
                error: None,
            }],
        }
    }

    #[test]
    fn test_failed_outcome_json() {
        let r = report(Outcome::Failed {
            step: 4,
            reason: "timeout".into(),
        });
        let value = serde_json::to_value(&r).unwrap();
        assert_json_include!(
            actual: value,
            expected: json!({
                "scenario": "l2cap",
                "outcome": {"status": "failed", "step": 4, "reason": "timeout"},
                "steps": [{"index": 0, "description": "dut1 <- bt init"}]
            })
        );
        assert!(!r.passed());
        assert_eq!(r.summary(), "FAIL l2cap at step 4: timeout");
    }

    #[test]
    fn test_passed_summary() {
        let r = report(Outcome::Passed);
        assert!(r.passed());
        assert!(r.summary().starts_with("PASS l2cap (1 steps"));
        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(value["outcome"]["status"], "passed");
        assert!(value["steps"][0].get("matched").is_none());
    }
}
