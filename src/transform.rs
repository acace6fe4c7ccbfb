//! Secondary transforms applied to each match before substitution
//!
//! A replace function may carry an optional transform. The transform sees the
//! matched text (and the context it came from) and returns the text to
//! substitute. `OptionalTransform` is the argument slot; `StandardTransform`
//! is the closed set scenario files can name; `FnTransform` wraps ad-hoc
//! closures supplied by callers.

use std::fmt;
use std::sync::Arc;

use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};

use crate::context::StringContext;
use crate::error::ApplyError;

/// A function applied to matched text
pub trait TransformCapability: Send + Sync {
    fn name(&self) -> &str;
    fn apply(&self, input: &str, ctx: &StringContext) -> Result<String, ApplyError>;
}

/// Optional transform argument
#[derive(Clone, Default)]
pub enum OptionalTransform {
    #[default]
    Absent,
    Present(Arc<dyn TransformCapability>),
}

impl OptionalTransform {
    pub fn present(transform: impl TransformCapability + 'static) -> Self {
        OptionalTransform::Present(Arc::new(transform))
    }

    pub fn is_present(&self) -> bool {
        matches!(self, OptionalTransform::Present(_))
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            OptionalTransform::Absent => None,
            OptionalTransform::Present(t) => Some(t.name()),
        }
    }
}

impl fmt::Debug for OptionalTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionalTransform::Absent => f.write_str("Absent"),
            OptionalTransform::Present(t) => f.debug_tuple("Present").field(&t.name()).finish(),
        }
    }
}

impl From<Option<StandardTransform>> for OptionalTransform {
    fn from(value: Option<StandardTransform>) -> Self {
        match value {
            Some(t) => OptionalTransform::present(t),
            None => OptionalTransform::Absent,
        }
    }
}

/// Transforms selectable by name from a scenario file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardTransform {
    Identity,
    ToUpperCase,
    ToLowerCase,
    #[serde(rename = "SHA256")]
    Sha256,
    #[serde(rename = "SHA512")]
    Sha512,
    Base64Decode,
}

impl StandardTransform {
    pub const ALL: [StandardTransform; 6] = [
        StandardTransform::Identity,
        StandardTransform::ToUpperCase,
        StandardTransform::ToLowerCase,
        StandardTransform::Sha256,
        StandardTransform::Sha512,
        StandardTransform::Base64Decode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StandardTransform::Identity => "Identity",
            StandardTransform::ToUpperCase => "ToUpperCase",
            StandardTransform::ToLowerCase => "ToLowerCase",
            StandardTransform::Sha256 => "SHA256",
            StandardTransform::Sha512 => "SHA512",
            StandardTransform::Base64Decode => "Base64Decode",
        }
    }
}

impl TransformCapability for StandardTransform {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn apply(&self, input: &str, _ctx: &StringContext) -> Result<String, ApplyError> {
        match self {
            StandardTransform::Identity => Ok(input.to_string()),
            StandardTransform::ToUpperCase => Ok(input.to_uppercase()),
            StandardTransform::ToLowerCase => Ok(input.to_lowercase()),
            StandardTransform::Sha256 => Ok(hex::encode(Sha256::digest(input.as_bytes()))),
            StandardTransform::Sha512 => Ok(hex::encode(Sha512::digest(input.as_bytes()))),
            StandardTransform::Base64Decode => {
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(input)
                    .map_err(|e| ApplyError::Transform {
                        transform: self.as_str().to_string(),
                        reason: e.to_string(),
                    })?;
                String::from_utf8(bytes).map_err(|e| ApplyError::Transform {
                    transform: self.as_str().to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }
}

type TransformFn = dyn Fn(&str, &StringContext) -> Result<String, ApplyError> + Send + Sync;

/// Named closure usable as a transform
#[derive(Clone)]
pub struct FnTransform {
    name: String,
    func: Arc<TransformFn>,
}

impl FnTransform {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str, &StringContext) -> Result<String, ApplyError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }
}

impl TransformCapability for FnTransform {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, input: &str, ctx: &StringContext) -> Result<String, ApplyError> {
        (self.func)(input, ctx)
    }
}
