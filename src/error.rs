//! Error types for the transformation harness
//!
//! Three layers, innermost first:
//! - `ApplyError`: an executable function failed while running against a context
//! - `FunctionError`: a factory refused to build a function from its arguments
//! - `HarnessError`: the scenario runner's view, one variant per failure class
//!
//! `RegistryError` covers registry construction only.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::functions::ArgumentKind;

/// Failure while applying a bound function to a context
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    #[error("Target access failed: {0}")]
    Target(String),

    #[error("Replacement could not be resolved: {0}")]
    Replacement(String),

    #[error("Transform '{transform}' failed: {reason}")]
    Transform { transform: String, reason: String },
}

/// Failure while building an executable function from arguments
#[derive(Error, Debug)]
pub enum FunctionError {
    #[error("Invalid regular expression '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Missing required argument '{argument}' for function '{function}'")]
    MissingArgument {
        function: &'static str,
        argument: &'static str,
    },

    #[error("Invalid argument '{argument}' for function '{function}': {reason}")]
    InvalidArgument {
        function: &'static str,
        argument: &'static str,
        reason: String,
    },

    #[error("Function '{function}' expects {expected} arguments, got {found}")]
    ArgumentKindMismatch {
        function: &'static str,
        expected: ArgumentKind,
        found: ArgumentKind,
    },
}

/// Registry construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Function '{0}' is already registered")]
    DuplicateFunction(String),
}

/// Coarse failure class, used for reporting and fatality decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    Load,
    Resolution,
    ArgumentType,
    Compilation,
    Apply,
    AssertionMismatch,
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ErrorClass::Load => "load",
            ErrorClass::Resolution => "resolution",
            ErrorClass::ArgumentType => "argument-type",
            ErrorClass::Compilation => "compilation",
            ErrorClass::Apply => "apply",
            ErrorClass::AssertionMismatch => "assertion-mismatch",
        };
        f.write_str(label)
    }
}

/// Main error type for the scenario runner
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Failed to load scenario suite {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    #[error("Scenario '{scenario}': function '{function}' is not registered")]
    UnknownFunction { scenario: String, function: String },

    #[error("Scenario '{scenario}': factory for '{expected}' reports name '{actual}'")]
    FactoryNameMismatch {
        scenario: String,
        expected: String,
        actual: String,
    },

    #[error("Scenario '{scenario}': default arguments for '{function}' are {found}, expected {expected}")]
    ArgumentType {
        scenario: String,
        function: String,
        expected: ArgumentKind,
        found: ArgumentKind,
    },

    #[error("Scenario '{scenario}': {source}")]
    Compilation {
        scenario: String,
        #[source]
        source: FunctionError,
    },

    #[error("Scenario '{scenario}': {source}")]
    Apply {
        scenario: String,
        #[source]
        source: ApplyError,
    },

    #[error("Scenario '{scenario}': returned value {returned:?}, expected none")]
    UnexpectedResult { scenario: String, returned: String },

    #[error("Scenario '{scenario}': expected {expected:?}, got {actual:?}")]
    ValueMismatch {
        scenario: String,
        expected: String,
        actual: String,
    },
}

impl HarnessError {
    pub fn class(&self) -> ErrorClass {
        match self {
            HarnessError::Load { .. } => ErrorClass::Load,
            HarnessError::UnknownFunction { .. } | HarnessError::FactoryNameMismatch { .. } => {
                ErrorClass::Resolution
            }
            HarnessError::ArgumentType { .. } => ErrorClass::ArgumentType,
            HarnessError::Compilation { .. } => ErrorClass::Compilation,
            HarnessError::Apply { .. } => ErrorClass::Apply,
            HarnessError::UnexpectedResult { .. } | HarnessError::ValueMismatch { .. } => {
                ErrorClass::AssertionMismatch
            }
        }
    }

    /// Fatal errors stop the run before any test case executes.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.class(),
            ErrorClass::Load | ErrorClass::Resolution | ErrorClass::ArgumentType
        )
    }
}
