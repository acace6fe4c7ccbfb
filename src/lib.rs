//! Transform Harness - table-driven conformance tests for replace functions
//!
//! A scenario suite names a registered function, a pattern, a replacement
//! and optionally a transform, plus (input, expected) pairs. The runner
//! resolves each function in a `FunctionRegistry`, configures its argument
//! object from the scenario, builds an `ExecutableFunction`, applies it to a
//! fresh `StringContext` per case, and compares the result.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use transform_harness::{FunctionRegistry, ScenarioRunner, ScenarioSuite, Settings};
//!
//! let registry = FunctionRegistry::standard();
//! let settings = Settings::nop();
//! let suite = ScenarioSuite::load("tests.json")?;
//! let report = ScenarioRunner::new(&registry, &settings).run(&suite)?;
//! assert!(report.passed());
//! # Ok::<(), transform_harness::HarnessError>(())
//! ```

// Core error handling
pub mod error;

// Context and accessor capabilities
pub mod context;

// Secondary transforms
pub mod transform;

// Function factories and executable functions
pub mod functions;
pub mod registry;

// Scenario loading, execution and reporting
pub mod config;
pub mod report;
pub mod runner;
pub mod scenario;

pub use config::HarnessConfig;
pub use context::{GetSetter, LiteralGetter, StringContext, StringGetter, ValueTarget};
pub use error::{ApplyError, ErrorClass, FunctionError, HarnessError, RegistryError};
pub use functions::{
    ArgumentKind, Arguments, ExecutableFunction, FunctionFactory, ReplaceMatchArguments,
    ReplaceMatchFactory, ReplacePatternArguments, ReplacePatternFactory, Settings,
};
pub use registry::FunctionRegistry;
pub use report::{CaseOutcome, FailureSummary, ReportSummary, SuiteReport};
pub use runner::{configure, ExecutionMode, ScenarioRunner};
pub use scenario::{Scenario, ScenarioSuite, ScenarioTest};
pub use transform::{FnTransform, OptionalTransform, StandardTransform, TransformCapability};
