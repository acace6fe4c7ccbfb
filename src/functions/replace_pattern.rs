//! `replace_pattern`: replace every regex match in the target
//!
//! Without a transform, each match is replaced by the replacement value,
//! with capture references (`$1`, `${name}`, `$$`) expanded per match. With
//! a transform, the matched text is passed through it and the result
//! (optionally wrapped by `replacement_format`) is substituted instead.
//!
//! The target is written exactly once, after every substitution succeeded.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use tracing::{debug, trace};

use super::{ArgumentKind, Arguments, BoundReplace, ExecutableFunction, FunctionFactory, Settings};
use crate::context::{GetSetter, LiteralGetter, StringContext, StringGetter};
use crate::error::{ApplyError, FunctionError};
use crate::transform::OptionalTransform;

pub const NAME: &str = "replace_pattern";

/// Arguments for `replace_pattern`
#[derive(Clone)]
pub struct ReplacePatternArguments {
    pub target: Option<Arc<dyn GetSetter>>,
    pub regex_pattern: String,
    pub replacement: Arc<dyn StringGetter>,
    pub function: OptionalTransform,
    pub replacement_format: Option<String>,
}

impl Default for ReplacePatternArguments {
    fn default() -> Self {
        Self {
            target: None,
            regex_pattern: String::new(),
            replacement: Arc::new(LiteralGetter::default()),
            function: OptionalTransform::Absent,
            replacement_format: None,
        }
    }
}

impl fmt::Debug for ReplacePatternArguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplacePatternArguments")
            .field("target", &self.target.as_ref().map(|_| "GetSetter"))
            .field("regex_pattern", &self.regex_pattern)
            .field("function", &self.function)
            .field("replacement_format", &self.replacement_format)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReplacePatternFactory;

impl FunctionFactory for ReplacePatternFactory {
    fn name(&self) -> &str {
        NAME
    }

    fn default_arguments(&self) -> Arguments {
        Arguments::ReplacePattern(ReplacePatternArguments::default())
    }

    fn build(
        &self,
        settings: &Settings,
        arguments: Arguments,
    ) -> Result<ExecutableFunction, FunctionError> {
        let args = arguments
            .into_replace_pattern()
            .map_err(|other| FunctionError::ArgumentKindMismatch {
                function: NAME,
                expected: ArgumentKind::ReplacePattern,
                found: other.kind(),
            })?;

        let regex =
            Regex::new(&args.regex_pattern).map_err(|source| FunctionError::InvalidPattern {
                pattern: args.regex_pattern.clone(),
                source,
            })?;

        let transform = args.function.name().map(str::to_string);
        let bound = BoundReplace::bind(
            NAME,
            args.target,
            args.replacement,
            args.function,
            args.replacement_format,
        )?;

        debug!(
            component = settings.component(),
            pattern = %regex,
            transform = ?transform,
            "Built {}",
            NAME
        );

        Ok(ExecutableFunction::new(NAME, move |ctx| {
            replace_all(&regex, &bound, ctx)
        }))
    }
}

fn replace_all(
    regex: &Regex,
    bound: &BoundReplace,
    ctx: &mut StringContext,
) -> Result<Option<String>, ApplyError> {
    let original = bound.target.get(ctx)?;
    let replacement = bound.replacement.get(ctx)?;

    let mut output = String::with_capacity(original.len());
    let mut last = 0;
    let mut matches = 0usize;

    for caps in regex.captures_iter(&original) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        output.push_str(&original[last..whole.start()]);
        match bound.substitution.transform(whole.as_str(), ctx)? {
            Some(value) => output.push_str(&value),
            None => caps.expand(&replacement, &mut output),
        }
        last = whole.end();
        matches += 1;
    }
    output.push_str(&original[last..]);

    trace!(matches, "{} substituted", NAME);
    bound.target.set(ctx, output)?;
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ValueTarget;
    use crate::transform::{FnTransform, StandardTransform};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn args(pattern: &str, replacement: &str) -> ReplacePatternArguments {
        ReplacePatternArguments {
            target: Some(Arc::new(ValueTarget)),
            regex_pattern: pattern.to_string(),
            replacement: Arc::new(LiteralGetter::new(replacement)),
            ..Default::default()
        }
    }

    fn run(args: ReplacePatternArguments, input: &str) -> Result<String, ApplyError> {
        let func = ReplacePatternFactory
            .build(&Settings::nop(), args.into())
            .expect("build replace_pattern");
        let mut ctx = StringContext::new(input);
        let result = func.apply(&mut ctx)?;
        assert_eq!(result, None);
        Ok(ctx.into_inner())
    }

    #[test]
    fn test_literal_replacement() {
        assert_eq!(run(args("world", "earth"), "hello world").unwrap(), "hello earth");
    }

    #[test]
    fn test_every_match_replaced_in_order() {
        assert_eq!(run(args("o", "0"), "foo boo").unwrap(), "f00 b00");
        assert_eq!(run(args("a+", "-"), "baaac aad").unwrap(), "b-c -d");
    }

    #[test]
    fn test_capture_references_expand() {
        assert_eq!(
            run(args(r"(\w+)@(\w+)", "$2 at $1"), "user@host").unwrap(),
            "host at user"
        );
        assert_eq!(
            run(args(r"(?P<digits>\d+)", "#${digits}"), "a1b22").unwrap(),
            "a#1b#22"
        );
        assert_eq!(run(args("x", "$$"), "axb").unwrap(), "a$b");
    }

    #[test]
    fn test_zero_matches_leaves_value() {
        assert_eq!(run(args("zzz", "y"), "hello world").unwrap(), "hello world");
    }

    #[test]
    fn test_transform_applies_to_matched_text() {
        let mut a = args("[a-z]+", "ignored");
        a.function = OptionalTransform::present(StandardTransform::ToUpperCase);
        assert_eq!(run(a, "id-42-done").unwrap(), "ID-42-DONE");

        let mut a = args("[0-9]+", "ignored");
        a.function = OptionalTransform::present(StandardTransform::ToUpperCase);
        assert_eq!(run(a, "id-42-done").unwrap(), "id-42-done");
    }

    #[test]
    fn test_transform_with_format() {
        let mut a = args("[0-9]+", "");
        a.function = OptionalTransform::present(StandardTransform::Identity);
        a.replacement_format = Some("<%s>".to_string());
        assert_eq!(run(a, "id-42-done-7").unwrap(), "id-<42>-done-<7>");
    }

    #[test]
    fn test_invalid_pattern_is_compile_error() {
        let err = ReplacePatternFactory
            .build(&Settings::nop(), args("(", "x").into())
            .unwrap_err();
        assert!(matches!(err, FunctionError::InvalidPattern { ref pattern, .. } if pattern == "("));
    }

    #[test]
    fn test_missing_target_is_argument_error() {
        let mut a = args("x", "y");
        a.target = None;
        let err = ReplacePatternFactory
            .build(&Settings::nop(), a.into())
            .unwrap_err();
        assert!(matches!(
            err,
            FunctionError::MissingArgument {
                argument: "target",
                ..
            }
        ));
    }

    #[test]
    fn test_wrong_argument_kind_rejected() {
        let err = ReplacePatternFactory
            .build(&Settings::nop(), Arguments::ReplaceMatch(Default::default()))
            .unwrap_err();
        assert!(matches!(
            err,
            FunctionError::ArgumentKindMismatch {
                found: ArgumentKind::ReplaceMatch,
                ..
            }
        ));
    }

    #[test]
    fn test_transform_failure_leaves_context_untouched() {
        let mut a = args("o", "0");
        a.function = OptionalTransform::present(FnTransform::new("fail", |_: &str, _| {
            Err(ApplyError::Transform {
                transform: "fail".to_string(),
                reason: "boom".to_string(),
            })
        }));
        let func = ReplacePatternFactory
            .build(&Settings::nop(), a.into())
            .unwrap();

        let mut ctx = StringContext::new("foo");
        let err = func.apply(&mut ctx).unwrap_err();
        assert!(matches!(err, ApplyError::Transform { .. }));
        assert_eq!(ctx.get(), "foo");
    }

    struct CountingTarget {
        sets: AtomicUsize,
    }

    impl GetSetter for CountingTarget {
        fn get(&self, ctx: &StringContext) -> Result<String, ApplyError> {
            Ok(ctx.get().to_string())
        }

        fn set(&self, ctx: &mut StringContext, value: String) -> Result<(), ApplyError> {
            self.sets.fetch_add(1, Ordering::SeqCst);
            ctx.set(value);
            Ok(())
        }
    }

    #[test]
    fn test_single_write_even_without_matches() {
        let target = Arc::new(CountingTarget {
            sets: AtomicUsize::new(0),
        });
        let mut a = args("zzz", "y");
        a.target = Some(target.clone() as Arc<dyn GetSetter>);
        let func = ReplacePatternFactory
            .build(&Settings::nop(), a.into())
            .unwrap();

        let mut ctx = StringContext::new("abc");
        func.apply(&mut ctx).unwrap();
        assert_eq!(target.sets.load(Ordering::SeqCst), 1);
        assert_eq!(ctx.get(), "abc");

        let mut ctx = StringContext::new("zzz zzz");
        func.apply(&mut ctx).unwrap();
        assert_eq!(target.sets.load(Ordering::SeqCst), 2);
        assert_eq!(ctx.get(), "y y");
    }

    struct ReadOnlyTarget;

    impl GetSetter for ReadOnlyTarget {
        fn get(&self, ctx: &StringContext) -> Result<String, ApplyError> {
            Ok(ctx.get().to_string())
        }

        fn set(&self, _ctx: &mut StringContext, _value: String) -> Result<(), ApplyError> {
            Err(ApplyError::Target("read-only".to_string()))
        }
    }

    struct UnresolvedReplacement;

    impl StringGetter for UnresolvedReplacement {
        fn get(&self, _ctx: &StringContext) -> Result<String, ApplyError> {
            Err(ApplyError::Replacement("unbound".to_string()))
        }
    }

    #[test]
    fn test_target_set_failure_propagates() {
        let mut a = args("a", "b");
        a.target = Some(Arc::new(ReadOnlyTarget));
        let func = ReplacePatternFactory
            .build(&Settings::nop(), a.into())
            .unwrap();

        let mut ctx = StringContext::new("a");
        let err = func.apply(&mut ctx).unwrap_err();
        assert_eq!(err, ApplyError::Target("read-only".to_string()));
        assert_eq!(ctx.get(), "a");
    }

    #[test]
    fn test_replacement_get_failure_propagates() {
        let mut a = args("a", "unused");
        a.replacement = Arc::new(UnresolvedReplacement);
        let func = ReplacePatternFactory
            .build(&Settings::nop(), a.into())
            .unwrap();

        let mut ctx = StringContext::new("a");
        let err = func.apply(&mut ctx).unwrap_err();
        assert_eq!(err, ApplyError::Replacement("unbound".to_string()));
        assert_eq!(ctx.get(), "a");
    }

    #[test]
    fn test_empty_matches() {
        assert_eq!(run(args("a*", "-"), "baaac").unwrap(), "-b-c-");
        assert_eq!(run(args("", "-"), "h\u{e9}llo").unwrap(), "-h-\u{e9}-l-l-o-");
    }
}
