//! Deploy target value object - which environment a deployment is for.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Environment a deployment is built for.
///
/// - `Preview`: the editor/development environment. The production filter is
///   evaluated but nothing is dropped.
/// - `Production`: the customer-facing site. Excluded files never ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeployTarget {
    #[default]
    Preview,
    Production,
}

impl DeployTarget {
    /// Whether filter exclusions are applied (not just reported).
    pub fn applies_exclusions(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preview => "preview",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for DeployTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeployTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preview" | "dev" | "development" => Ok(Self::Preview),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!(
                "unknown deploy target '{}' (expected 'preview' or 'production')",
                other
            )),
        }
    }
}
