//! Scenario suite files
//!
//! A suite is a JSON (or YAML) array of scenarios:
//!
//! ```json
//! [
//!   {
//!     "Name": "simple",
//!     "Function": "replace_pattern",
//!     "Pattern": "world",
//!     "Replacement": "earth",
//!     "Tests": [{ "Input": "hello world", "Expect": "hello earth" }]
//!   }
//! ]
//! ```
//!
//! `Transform` (a standard transform name) and `ReplacementFormat` are
//! optional and only present in scenarios that exercise them.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::HarnessError;
use crate::transform::StandardTransform;

/// One (input, expected) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScenarioTest {
    pub input: String,
    pub expect: String,
}

/// A named group of test cases sharing one function configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Scenario {
    pub name: String,
    pub function: String,
    pub tests: Vec<ScenarioTest>,
    pub pattern: String,
    pub replacement: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<StandardTransform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement_format: Option<String>,
}

impl Scenario {
    /// Test id in `Name/Expect` form
    pub fn test_id(&self, test: &ScenarioTest) -> String {
        format!("{}/{}", self.name, test.expect)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioSuite {
    pub scenarios: Vec<Scenario>,
}

impl ScenarioSuite {
    pub fn new(scenarios: Vec<Scenario>) -> Self {
        Self { scenarios }
    }

    /// Load a suite file; `.yaml`/`.yml` are read as YAML, anything else as JSON
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HarnessError> {
        let path = path.as_ref();
        info!("Loading scenario suite from {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| HarnessError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let parsed = if is_yaml {
            serde_yaml::from_str::<ScenarioSuite>(&content).map_err(|e| e.to_string())
        } else {
            serde_json::from_str::<ScenarioSuite>(&content).map_err(|e| e.to_string())
        };
        let suite = parsed.map_err(|reason| HarnessError::Load {
            path: path.to_path_buf(),
            reason,
        })?;

        for scenario in &suite.scenarios {
            if scenario.tests.is_empty() {
                warn!(scenario = %scenario.name, "Scenario has no test cases");
            }
        }
        info!(
            "Loaded {} scenarios with {} test cases",
            suite.scenarios.len(),
            suite.case_count()
        );

        Ok(suite)
    }

    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn case_count(&self) -> usize {
        self.scenarios.iter().map(|s| s.tests.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}
