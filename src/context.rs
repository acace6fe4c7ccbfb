//! Scalar string context and the accessor capabilities bound to it.

use std::fmt;

use crate::error::ApplyError;

/// Mutable holder of one string value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringContext {
    value: String,
}

impl StringContext {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn get(&self) -> &str {
        &self.value
    }

    pub fn set(&mut self, value: String) {
        self.value = value;
    }

    pub fn into_inner(self) -> String {
        self.value
    }
}

impl fmt::Display for StringContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Read/write access to the value a function targets
pub trait GetSetter: Send + Sync {
    fn get(&self, ctx: &StringContext) -> Result<String, ApplyError>;
    fn set(&self, ctx: &mut StringContext, value: String) -> Result<(), ApplyError>;
}

/// Targets the context's scalar value directly
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueTarget;

impl GetSetter for ValueTarget {
    fn get(&self, ctx: &StringContext) -> Result<String, ApplyError> {
        Ok(ctx.get().to_string())
    }

    fn set(&self, ctx: &mut StringContext, value: String) -> Result<(), ApplyError> {
        ctx.set(value);
        Ok(())
    }
}

/// Source of a string argument
pub trait StringGetter: Send + Sync {
    fn get(&self, ctx: &StringContext) -> Result<String, ApplyError>;
}

/// A fixed string, independent of the context
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiteralGetter(pub String);

impl LiteralGetter {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl StringGetter for LiteralGetter {
    fn get(&self, _ctx: &StringContext) -> Result<String, ApplyError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_target_round_trip() {
        let mut ctx = StringContext::new("hello");
        let target = ValueTarget;
        assert_eq!(target.get(&ctx).unwrap(), "hello");

        target.set(&mut ctx, "bye".to_string()).unwrap();
        assert_eq!(ctx.get(), "bye");
        assert_eq!(ctx.into_inner(), "bye");
    }

    #[test]
    fn test_literal_getter_ignores_context() {
        let getter = LiteralGetter::new("earth");
        assert_eq!(getter.get(&StringContext::new("a")).unwrap(), "earth");
        assert_eq!(getter.get(&StringContext::default()).unwrap(), "earth");
        assert_eq!(LiteralGetter::default().0, "");
    }
}
