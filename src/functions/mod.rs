//! Function factories and the executable functions they build
//!
//! A factory knows one function kind. It hands out a default (no-op)
//! argument object, and turns a populated argument object plus settings into
//! an `ExecutableFunction`. Argument objects are a closed tagged union so
//! callers narrow them by pattern matching instead of downcasting.
//!
//! ## Available functions:
//! - `replace_pattern`: regex replace over every match, optional transform
//! - `replace_match`: glob match over the whole value, optional transform

pub mod replace_match;
pub mod replace_pattern;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::context::{GetSetter, StringContext, StringGetter};
use crate::error::{ApplyError, FunctionError};
use crate::transform::{OptionalTransform, TransformCapability};

pub use replace_match::{ReplaceMatchArguments, ReplaceMatchFactory};
pub use replace_pattern::{ReplacePatternArguments, ReplacePatternFactory};

/// Construction-time settings handed to every factory
///
/// The harness passes this through untouched; factories may use it to label
/// their logs.
#[derive(Debug, Clone)]
pub struct Settings {
    component: String,
}

impl Settings {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }

    /// Settings for tests and the standalone runner
    pub fn nop() -> Self {
        Self::new("nop")
    }

    pub fn component(&self) -> &str {
        &self.component
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::nop()
    }
}

/// Argument shapes known to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentKind {
    ReplacePattern,
    ReplaceMatch,
}

impl fmt::Display for ArgumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentKind::ReplacePattern => f.write_str("replace_pattern"),
            ArgumentKind::ReplaceMatch => f.write_str("replace_match"),
        }
    }
}

/// Argument object for any registered function
#[derive(Clone)]
pub enum Arguments {
    ReplacePattern(ReplacePatternArguments),
    ReplaceMatch(ReplaceMatchArguments),
}

impl Arguments {
    pub fn kind(&self) -> ArgumentKind {
        match self {
            Arguments::ReplacePattern(_) => ArgumentKind::ReplacePattern,
            Arguments::ReplaceMatch(_) => ArgumentKind::ReplaceMatch,
        }
    }

    /// Narrow to `replace_pattern` arguments, handing the object back on mismatch
    pub fn into_replace_pattern(self) -> Result<ReplacePatternArguments, Arguments> {
        match self {
            Arguments::ReplacePattern(args) => Ok(args),
            other => Err(other),
        }
    }

    /// Narrow to `replace_match` arguments, handing the object back on mismatch
    pub fn into_replace_match(self) -> Result<ReplaceMatchArguments, Arguments> {
        match self {
            Arguments::ReplaceMatch(args) => Ok(args),
            other => Err(other),
        }
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arguments::ReplacePattern(args) => f.debug_tuple("ReplacePattern").field(args).finish(),
            Arguments::ReplaceMatch(args) => f.debug_tuple("ReplaceMatch").field(args).finish(),
        }
    }
}

impl From<ReplacePatternArguments> for Arguments {
    fn from(args: ReplacePatternArguments) -> Self {
        Arguments::ReplacePattern(args)
    }
}

impl From<ReplaceMatchArguments> for Arguments {
    fn from(args: ReplaceMatchArguments) -> Self {
        Arguments::ReplaceMatch(args)
    }
}

/// Builds executable functions of one kind
pub trait FunctionFactory: Send + Sync {
    fn name(&self) -> &str;

    fn default_arguments(&self) -> Arguments;

    fn build(
        &self,
        settings: &Settings,
        arguments: Arguments,
    ) -> Result<ExecutableFunction, FunctionError>;
}

type FunctionImpl = dyn Fn(&mut StringContext) -> Result<Option<String>, ApplyError> + Send + Sync;

/// A stateless callable bound to resolved arguments
///
/// `Ok(None)` is the "no result" sentinel returned by functions that only
/// mutate their target.
#[derive(Clone)]
pub struct ExecutableFunction {
    name: String,
    func: Arc<FunctionImpl>,
}

impl ExecutableFunction {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut StringContext) -> Result<Option<String>, ApplyError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, ctx: &mut StringContext) -> Result<Option<String>, ApplyError> {
        (self.func)(ctx)
    }
}

impl fmt::Debug for ExecutableFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutableFunction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Fields shared by the replace-shaped argument objects, validated once at build
pub(crate) struct BoundReplace {
    pub target: Arc<dyn GetSetter>,
    pub replacement: Arc<dyn StringGetter>,
    pub substitution: Substitution,
}

impl BoundReplace {
    pub fn bind(
        function: &'static str,
        target: Option<Arc<dyn GetSetter>>,
        replacement: Arc<dyn StringGetter>,
        transform: OptionalTransform,
        replacement_format: Option<String>,
    ) -> Result<Self, FunctionError> {
        let target = target.ok_or(FunctionError::MissingArgument {
            function,
            argument: "target",
        })?;
        let substitution = Substitution::new(function, transform, replacement_format)?;
        Ok(Self {
            target,
            replacement,
            substitution,
        })
    }
}

/// How a matched span becomes replacement text
#[derive(Clone)]
pub(crate) enum Substitution {
    /// Insert the replacement value
    Replacement,
    /// Run the matched text through a transform, optionally wrapped by a format
    Transformed {
        transform: Arc<dyn TransformCapability>,
        format: Option<String>,
    },
}

const FORMAT_PLACEHOLDER: &str = "%s";

impl Substitution {
    fn new(
        function: &'static str,
        transform: OptionalTransform,
        format: Option<String>,
    ) -> Result<Self, FunctionError> {
        if let Some(format) = &format {
            let placeholders = format.matches(FORMAT_PLACEHOLDER).count();
            if placeholders != 1 {
                return Err(FunctionError::InvalidArgument {
                    function,
                    argument: "replacement_format",
                    reason: format!(
                        "expected exactly one '{}' placeholder, found {}",
                        FORMAT_PLACEHOLDER, placeholders
                    ),
                });
            }
        }

        match transform {
            OptionalTransform::Present(transform) => {
                Ok(Substitution::Transformed { transform, format })
            }
            OptionalTransform::Absent if format.is_some() => Err(FunctionError::InvalidArgument {
                function,
                argument: "replacement_format",
                reason: "requires a transform function".to_string(),
            }),
            OptionalTransform::Absent => Ok(Substitution::Replacement),
        }
    }

    /// Transform `matched`, or `None` when the replacement value should be used
    pub fn transform(
        &self,
        matched: &str,
        ctx: &StringContext,
    ) -> Result<Option<String>, ApplyError> {
        match self {
            Substitution::Replacement => Ok(None),
            Substitution::Transformed { transform, format } => {
                let value = transform.apply(matched, ctx)?;
                Ok(Some(match format {
                    Some(format) => format.replacen(FORMAT_PLACEHOLDER, &value, 1),
                    None => value,
                }))
            }
        }
    }
}
