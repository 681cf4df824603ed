use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Deployment variant. Selects which configuration file is loaded; the shape
/// of the resulting [`Environment`](super::Environment) never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    #[default]
    Development,
    Production,
}

impl Profile {
    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Development => "development",
            Profile::Production => "production",
        }
    }

    /// Config file name looked up in the config directory.
    pub fn file_name(self) -> String {
        format!("{}.toml", self.as_str())
    }

    /// Value the record's `production` flag is expected to carry.
    pub fn expects_production_flag(self) -> bool {
        matches!(self, Profile::Production)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Profile::Development),
            "production" | "prod" => Ok(Profile::Production),
            other => Err(AppError::Config(format!(
                "unknown profile '{other}' (expected development or production)"
            ))),
        }
    }
}
