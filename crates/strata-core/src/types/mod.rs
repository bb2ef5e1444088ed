//! Shared core types used across the settings layers and proxy sync.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Settings precedence tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsTier {
    /// Per-user overrides, highest precedence.
    User,
    /// Site-wide overrides, lowest precedence.
    Site,
}

impl SettingsTier {
    /// All tiers, highest precedence first.
    pub fn precedence_order() -> &'static [SettingsTier] {
        &[Self::User, Self::Site]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Site => "site",
        }
    }
}

impl fmt::Display for SettingsTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingsTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "site" => Ok(Self::Site),
            _ => Err(format!("unknown settings tier: {s}")),
        }
    }
}
