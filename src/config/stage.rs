use std::{fmt::Display, str::FromStr};

/// Deployment stage, read from `STAGE`. Unset or unknown values fall back to
/// `Local`.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Local,
    Development,
    Production,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Local => "local",
            Stage::Development => "development",
            Stage::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Stage::Production)
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "local" => Ok(Stage::Local),
            "development" | "dev" => Ok(Stage::Development),
            "production" | "prod" => Ok(Stage::Production),
            other => anyhow::bail!("unknown stage: {}", other),
        }
    }
}
