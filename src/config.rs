//! Harness configuration
//!
//! Resolved from the environment, then optionally overridden by the CLI.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::runner::ExecutionMode;

pub const SUITE_ENV: &str = "TRANSFORM_HARNESS_SUITE";
pub const MODE_ENV: &str = "TRANSFORM_HARNESS_MODE";
pub const COMPONENT_ENV: &str = "TRANSFORM_HARNESS_COMPONENT";

const DEFAULT_SUITE_FILE: &str = "tests.json";
const BUNDLED_SUITE: &str = "tests/scenarios/replace_pattern.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub suite_path: PathBuf,
    pub mode: ExecutionMode,
    pub component: String,
}

impl HarnessConfig {
    pub fn new(suite_path: impl Into<PathBuf>) -> Self {
        Self {
            suite_path: suite_path.into(),
            mode: ExecutionMode::default(),
            component: "scenario_harness".to_string(),
        }
    }

    /// Build configuration from environment variables
    ///
    /// Suite path resolution order:
    /// 1. TRANSFORM_HARNESS_SUITE environment variable (explicit override)
    /// 2. `tests.json` in the working directory
    /// 3. The suite bundled with this crate
    ///
    /// An unparseable TRANSFORM_HARNESS_MODE falls back to parallel.
    pub fn from_env() -> Self {
        let mut config = Self::new(Self::resolve_suite_path());

        if let Ok(mode) = std::env::var(MODE_ENV) {
            match mode.parse() {
                Ok(mode) => config.mode = mode,
                Err(e) => warn!("{}: {}", MODE_ENV, e),
            }
        }
        if let Ok(component) = std::env::var(COMPONENT_ENV) {
            config.component = component;
        }

        debug!(?config, "Resolved harness configuration");
        config
    }

    fn resolve_suite_path() -> PathBuf {
        if let Ok(path) = std::env::var(SUITE_ENV) {
            return PathBuf::from(path);
        }

        if Path::new(DEFAULT_SUITE_FILE).exists() {
            return PathBuf::from(DEFAULT_SUITE_FILE);
        }

        Path::new(env!("CARGO_MANIFEST_DIR")).join(BUNDLED_SUITE)
    }

    /// Fail early with a readable message if the suite file is missing
    pub fn validate(&self) -> Result<()> {
        std::fs::metadata(&self.suite_path)
            .with_context(|| format!("Scenario suite {} is not readable", self.suite_path.display()))?;
        Ok(())
    }
}
