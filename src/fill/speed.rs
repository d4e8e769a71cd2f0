use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Pause between consecutive field writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationSpeed {
    #[default]
    None,
    Fast,
    Slow,
}

impl AnimationSpeed {
    pub fn delay(&self) -> Duration {
        match self {
            AnimationSpeed::None => Duration::ZERO,
            AnimationSpeed::Fast => Duration::from_millis(200),
            AnimationSpeed::Slow => Duration::from_millis(500),
        }
    }
}

impl fmt::Display for AnimationSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AnimationSpeed::None => "none",
            AnimationSpeed::Fast => "fast",
            AnimationSpeed::Slow => "slow",
        };
        f.write_str(s)
    }
}

impl FromStr for AnimationSpeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(AnimationSpeed::None),
            "fast" => Ok(AnimationSpeed::Fast),
            "slow" => Ok(AnimationSpeed::Slow),
            other => Err(format!("unknown animation speed '{}'", other)),
        }
    }
}
