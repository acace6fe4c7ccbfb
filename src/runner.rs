//! Scenario runner
//!
//! Drives every (scenario, test case) pair through
//! resolve -> configure -> build -> apply -> assert.
//!
//! ## Two phases
//! 1. Preflight: every scenario's function is looked up, its factory name
//!    checked, and its default arguments narrowed. Any failure here is fatal
//!    and returned before a single case executes.
//! 2. Execution: each case is an independent unit with its own argument
//!    object and context. Units share only the registry and settings, so
//!    they run in parallel by default.
//!
//! Build, apply and assertion failures are recorded per case; the run always
//! completes and the report lists every failure.

use std::str::FromStr;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::context::{LiteralGetter, StringContext, ValueTarget};
use crate::error::HarnessError;
use crate::functions::{
    ArgumentKind, ExecutableFunction, FunctionFactory, ReplacePatternArguments, Settings,
};
use crate::registry::FunctionRegistry;
use crate::report::{CaseOutcome, SuiteReport};
use crate::scenario::{Scenario, ScenarioSuite, ScenarioTest};

/// How test units are scheduled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    #[default]
    Parallel,
    Sequential,
}

impl FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parallel" => Ok(ExecutionMode::Parallel),
            "sequential" => Ok(ExecutionMode::Sequential),
            other => Err(format!(
                "Unknown execution mode '{}', expected 'parallel' or 'sequential'",
                other
            )),
        }
    }
}

/// A scenario whose factory has been resolved and checked
struct PreparedScenario<'s, 'r> {
    scenario: &'s Scenario,
    factory: &'r dyn FunctionFactory,
}

pub struct ScenarioRunner<'a> {
    registry: &'a FunctionRegistry,
    settings: &'a Settings,
    mode: ExecutionMode,
}

impl<'a> ScenarioRunner<'a> {
    pub fn new(registry: &'a FunctionRegistry, settings: &'a Settings) -> Self {
        Self {
            registry,
            settings,
            mode: ExecutionMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Run the whole suite
    ///
    /// Returns `Err` only for fatal errors (resolution, argument type), in
    /// which case no test case has executed.
    pub fn run(&self, suite: &ScenarioSuite) -> Result<SuiteReport, HarnessError> {
        let prepared = suite
            .scenarios
            .iter()
            .map(|scenario| self.prepare(scenario))
            .collect::<Result<Vec<_>, _>>()?;

        let units: Vec<(&PreparedScenario, &ScenarioTest)> = prepared
            .iter()
            .flat_map(|p| p.scenario.tests.iter().map(move |test| (p, test)))
            .collect();

        info!(
            scenarios = prepared.len(),
            cases = units.len(),
            mode = ?self.mode,
            "Running scenario suite"
        );

        let outcomes: Vec<CaseOutcome> = match self.mode {
            ExecutionMode::Parallel => units
                .par_iter()
                .map(|(p, test)| self.execute(p.factory, p.scenario, test))
                .collect(),
            ExecutionMode::Sequential => units
                .iter()
                .map(|(p, test)| self.execute(p.factory, p.scenario, test))
                .collect(),
        };

        let report = SuiteReport { outcomes };
        for failure in report.failures() {
            if let Some(error) = failure.error() {
                warn!(test = %failure.test_id(), class = %error.class(), "{}", error);
            }
        }
        info!(
            passed = report.pass_count(),
            failed = report.fail_count(),
            "Scenario suite finished"
        );
        Ok(report)
    }

    /// Run a single test case of a scenario
    pub fn run_case(
        &self,
        scenario: &Scenario,
        test: &ScenarioTest,
    ) -> Result<CaseOutcome, HarnessError> {
        let prepared = self.prepare(scenario)?;
        Ok(self.execute(prepared.factory, scenario, test))
    }

    fn prepare<'s>(
        &self,
        scenario: &'s Scenario,
    ) -> Result<PreparedScenario<'s, 'a>, HarnessError> {
        let factory = self.resolve(scenario)?;
        // Narrowing is checked once up front so a kind mismatch aborts the run.
        configure(factory, scenario)?;
        Ok(PreparedScenario { scenario, factory })
    }

    fn resolve(&self, scenario: &Scenario) -> Result<&'a dyn FunctionFactory, HarnessError> {
        let factory =
            self.registry
                .lookup(&scenario.function)
                .ok_or_else(|| HarnessError::UnknownFunction {
                    scenario: scenario.name.clone(),
                    function: scenario.function.clone(),
                })?;

        if factory.name() != scenario.function {
            return Err(HarnessError::FactoryNameMismatch {
                scenario: scenario.name.clone(),
                expected: scenario.function.clone(),
                actual: factory.name().to_string(),
            });
        }
        Ok(factory)
    }

    fn build(
        &self,
        factory: &dyn FunctionFactory,
        scenario: &Scenario,
    ) -> Result<ExecutableFunction, HarnessError> {
        let args = configure(factory, scenario)?;
        factory
            .build(self.settings, args.into())
            .map_err(|source| HarnessError::Compilation {
                scenario: scenario.name.clone(),
                source,
            })
    }

    fn execute(
        &self,
        factory: &dyn FunctionFactory,
        scenario: &Scenario,
        test: &ScenarioTest,
    ) -> CaseOutcome {
        let mut outcome = CaseOutcome::pending(scenario, test);

        let function = match self.build(factory, scenario) {
            Ok(function) => function,
            Err(e) => {
                outcome.result = Err(e);
                return outcome;
            }
        };

        let mut ctx = StringContext::new(test.input.as_str());
        let applied = function.apply(&mut ctx);
        let actual = ctx.into_inner();

        outcome.result = match applied {
            Err(source) => Err(HarnessError::Apply {
                scenario: scenario.name.clone(),
                source,
            }),
            Ok(Some(returned)) => Err(HarnessError::UnexpectedResult {
                scenario: scenario.name.clone(),
                returned,
            }),
            Ok(None) if actual != test.expect => Err(HarnessError::ValueMismatch {
                scenario: scenario.name.clone(),
                expected: test.expect.clone(),
                actual: actual.clone(),
            }),
            Ok(None) => Ok(()),
        };
        debug!(
            test = %scenario.test_id(test),
            passed = outcome.result.is_ok(),
            "Case finished"
        );
        outcome.actual = Some(actual);
        outcome
    }
}

/// Default arguments of `factory`, overridden from `scenario`
///
/// Fields the scenario does not set keep the factory's defaults.
pub fn configure(
    factory: &dyn FunctionFactory,
    scenario: &Scenario,
) -> Result<ReplacePatternArguments, HarnessError> {
    let mut args = factory
        .default_arguments()
        .into_replace_pattern()
        .map_err(|other| HarnessError::ArgumentType {
            scenario: scenario.name.clone(),
            function: scenario.function.clone(),
            expected: ArgumentKind::ReplacePattern,
            found: other.kind(),
        })?;

    args.target = Some(Arc::new(ValueTarget));
    args.regex_pattern = scenario.pattern.clone();
    args.replacement = Arc::new(LiteralGetter::new(scenario.replacement.as_str()));
    args.function = scenario.transform.into();
    if let Some(format) = &scenario.replacement_format {
        args.replacement_format = Some(format.clone());
    }
    Ok(args)
}
