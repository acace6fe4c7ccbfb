//! `replace_match`: replace the whole target when it matches a glob
//!
//! Glob syntax follows the `glob` crate (`*`, `?`, `[...]`). A value that does
//! not match is written back unchanged.

use std::fmt;
use std::sync::Arc;

use glob::Pattern;
use tracing::debug;

use super::{ArgumentKind, Arguments, BoundReplace, ExecutableFunction, FunctionFactory, Settings};
use crate::context::{GetSetter, LiteralGetter, StringContext, StringGetter};
use crate::error::{ApplyError, FunctionError};
use crate::transform::OptionalTransform;

pub const NAME: &str = "replace_match";

/// Arguments for `replace_match`
#[derive(Clone)]
pub struct ReplaceMatchArguments {
    pub target: Option<Arc<dyn GetSetter>>,
    pub pattern: String,
    pub replacement: Arc<dyn StringGetter>,
    pub function: OptionalTransform,
    pub replacement_format: Option<String>,
}

impl Default for ReplaceMatchArguments {
    fn default() -> Self {
        Self {
            target: None,
            pattern: String::new(),
            replacement: Arc::new(LiteralGetter::default()),
            function: OptionalTransform::Absent,
            replacement_format: None,
        }
    }
}

impl fmt::Debug for ReplaceMatchArguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplaceMatchArguments")
            .field("target", &self.target.as_ref().map(|_| "GetSetter"))
            .field("pattern", &self.pattern)
            .field("function", &self.function)
            .field("replacement_format", &self.replacement_format)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReplaceMatchFactory;

impl FunctionFactory for ReplaceMatchFactory {
    fn name(&self) -> &str {
        NAME
    }

    fn default_arguments(&self) -> Arguments {
        Arguments::ReplaceMatch(ReplaceMatchArguments::default())
    }

    fn build(
        &self,
        settings: &Settings,
        arguments: Arguments,
    ) -> Result<ExecutableFunction, FunctionError> {
        let args = arguments
            .into_replace_match()
            .map_err(|other| FunctionError::ArgumentKindMismatch {
                function: NAME,
                expected: ArgumentKind::ReplaceMatch,
                found: other.kind(),
            })?;

        let glob = Pattern::new(&args.pattern).map_err(|source| FunctionError::InvalidGlob {
            pattern: args.pattern.clone(),
            source,
        })?;

        let bound = BoundReplace::bind(
            NAME,
            args.target,
            args.replacement,
            args.function,
            args.replacement_format,
        )?;

        debug!(component = settings.component(), pattern = %glob, "Built {}", NAME);

        Ok(ExecutableFunction::new(NAME, move |ctx| {
            replace_whole(&glob, &bound, ctx)
        }))
    }
}

fn replace_whole(
    glob: &Pattern,
    bound: &BoundReplace,
    ctx: &mut StringContext,
) -> Result<Option<String>, ApplyError> {
    let original = bound.target.get(ctx)?;
    let updated = if glob.matches(&original) {
        match bound.substitution.transform(&original, ctx)? {
            Some(value) => value,
            None => bound.replacement.get(ctx)?,
        }
    } else {
        original
    };
    bound.target.set(ctx, updated)?;
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ValueTarget;
    use crate::transform::StandardTransform;

    fn args(pattern: &str, replacement: &str) -> ReplaceMatchArguments {
        ReplaceMatchArguments {
            target: Some(Arc::new(ValueTarget)),
            pattern: pattern.to_string(),
            replacement: Arc::new(LiteralGetter::new(replacement)),
            ..Default::default()
        }
    }

    fn run(args: ReplaceMatchArguments, input: &str) -> String {
        let func = ReplaceMatchFactory
            .build(&Settings::nop(), args.into())
            .expect("build replace_match");
        let mut ctx = StringContext::new(input);
        assert_eq!(func.apply(&mut ctx).unwrap(), None);
        ctx.into_inner()
    }

    #[test]
    fn test_whole_value_glob() {
        assert_eq!(run(args("/user/*/list", "/user/{id}/list"), "/user/123/list"), "/user/{id}/list");
        assert_eq!(run(args("/user/*/list", "x"), "/user/123/detail"), "/user/123/detail");
        assert_eq!(run(args("a?c", "hit"), "abc"), "hit");
    }

    #[test]
    fn test_transform_sees_whole_value() {
        let mut a = args("secret-*", "");
        a.function = OptionalTransform::present(StandardTransform::Sha256);
        a.replacement_format = Some("sha256:%s".to_string());
        let out = run(a, "secret-abc");
        assert!(out.starts_with("sha256:"));
        assert_eq!(out.len(), "sha256:".len() + 64);
    }

    #[test]
    fn test_invalid_glob() {
        let err = ReplaceMatchFactory
            .build(&Settings::nop(), args("[", "x").into())
            .unwrap_err();
        assert!(matches!(err, FunctionError::InvalidGlob { ref pattern, .. } if pattern == "["));
    }

    #[test]
    fn test_rejects_replace_pattern_arguments() {
        let err = ReplaceMatchFactory
            .build(&Settings::nop(), Arguments::ReplacePattern(Default::default()))
            .unwrap_err();
        assert!(matches!(
            err,
            FunctionError::ArgumentKindMismatch {
                expected: ArgumentKind::ReplaceMatch,
                found: ArgumentKind::ReplacePattern,
                ..
            }
        ));
    }
}
