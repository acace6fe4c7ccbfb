//! Property tests for the replace_pattern function

use std::sync::Arc;

use proptest::prelude::*;
use transform_harness::{
    Arguments, ExecutableFunction, FunctionFactory, FunctionRegistry, LiteralGetter,
    OptionalTransform, ReplacePatternArguments, Settings, StandardTransform, StringContext,
    ValueTarget,
};

fn build(pattern: &str, replacement: &str, transform: OptionalTransform) -> ExecutableFunction {
    let registry = FunctionRegistry::standard();
    let factory = registry.lookup("replace_pattern").expect("replace_pattern registered");
    let args = ReplacePatternArguments {
        target: Some(Arc::new(ValueTarget)),
        regex_pattern: pattern.to_string(),
        replacement: Arc::new(LiteralGetter::new(replacement)),
        function: transform,
        replacement_format: None,
    };
    factory
        .build(&Settings::nop(), Arguments::ReplacePattern(args))
        .expect("valid arguments")
}

fn apply(function: &ExecutableFunction, input: &str) -> String {
    let mut ctx = StringContext::new(input);
    let result = function.apply(&mut ctx).expect("apply succeeds");
    assert_eq!(result, None);
    ctx.into_inner()
}

proptest! {
    /// Two fresh contexts built from the same input end up identical.
    #[test]
    fn same_input_same_output(input in "[a-z0-9 -]{0,40}") {
        let function = build("[0-9]+", "#", OptionalTransform::Absent);
        prop_assert_eq!(apply(&function, &input), apply(&function, &input));

        let upper = build("[a-z]+", "", OptionalTransform::present(StandardTransform::ToUpperCase));
        prop_assert_eq!(apply(&upper, &input), input.to_uppercase());
    }

    /// A pattern that cannot match leaves the value untouched.
    #[test]
    fn zero_matches_round_trip(input in "[a-z ]{0,40}") {
        let function = build("[0-9]+", "digits", OptionalTransform::Absent);
        prop_assert_eq!(apply(&function, &input), input);
    }

    /// With the identity transform every match is substituted by itself.
    #[test]
    fn identity_transform_is_noop(input in "\\PC{0,30}") {
        let function = build(".", "ignored", OptionalTransform::present(StandardTransform::Identity));
        prop_assert_eq!(apply(&function, &input), input);
    }

    /// Literal replacement matches the regex crate's own replace_all.
    #[test]
    fn literal_replacement_matches_replace_all(input in "[ab ]{0,30}") {
        let function = build("a+", "x", OptionalTransform::Absent);
        let expected = regex::Regex::new("a+").unwrap().replace_all(&input, "x").into_owned();
        prop_assert_eq!(apply(&function, &input), expected);
    }
}
