//! Per-case outcomes and the suite summary

use serde::Serialize;

use crate::error::{ErrorClass, HarnessError};
use crate::scenario::{Scenario, ScenarioTest};

/// Result of one (scenario, test case) unit
#[derive(Debug)]
pub struct CaseOutcome {
    pub scenario: String,
    pub input: String,
    pub expected: String,
    /// Context value after application; `None` if the function never ran
    pub actual: Option<String>,
    pub result: Result<(), HarnessError>,
}

impl CaseOutcome {
    pub(crate) fn pending(scenario: &Scenario, test: &ScenarioTest) -> Self {
        Self {
            scenario: scenario.name.clone(),
            input: test.input.clone(),
            expected: test.expect.clone(),
            actual: None,
            result: Ok(()),
        }
    }

    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error(&self) -> Option<&HarnessError> {
        self.result.as_ref().err()
    }

    /// `Name/Expect`
    pub fn test_id(&self) -> String {
        format!("{}/{}", self.scenario, self.expected)
    }
}

/// Outcomes for a whole suite, in suite order
#[derive(Debug, Default)]
pub struct SuiteReport {
    pub outcomes: Vec<CaseOutcome>,
}

impl SuiteReport {
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(CaseOutcome::passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }

    pub fn pass_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn fail_count(&self) -> usize {
        self.outcomes.len() - self.pass_count()
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            total: self.outcomes.len(),
            passed: self.pass_count(),
            failed: self.fail_count(),
            failures: self
                .failures()
                .filter_map(|o| {
                    let error = o.error()?;
                    Some(FailureSummary {
                        test_id: o.test_id(),
                        scenario: o.scenario.clone(),
                        input: o.input.clone(),
                        expected: o.expected.clone(),
                        actual: o.actual.clone(),
                        class: error.class(),
                        message: error.to_string(),
                    })
                })
                .collect(),
        }
    }
}

/// Serialisable run summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub failures: Vec<FailureSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureSummary {
    pub test_id: String,
    pub scenario: String,
    pub input: String,
    pub expected: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    pub class: ErrorClass,
    pub message: String,
}
