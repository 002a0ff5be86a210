//! Display scale factors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Display pixel density relative to the baseline, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ScaleFactor {
    /// Baseline density (100%).
    Baseline,
    /// 150%.
    OneAndHalf,
    /// 200%.
    Double,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported scale factor {0}%, expected one of 100, 150, 200")]
pub struct InvalidScale(pub u32);

impl ScaleFactor {
    /// All supported scales, baseline first.
    pub const ALL: [Self; 3] = [Self::Baseline, Self::OneAndHalf, Self::Double];

    /// Scale as an integer percentage.
    pub const fn percent(self) -> u32 {
        match self {
            Self::Baseline => 100,
            Self::OneAndHalf => 150,
            Self::Double => 200,
        }
    }

    /// Build from an integer percentage.
    pub const fn from_percent(percent: u32) -> Result<Self, InvalidScale> {
        match percent {
            100 => Ok(Self::Baseline),
            150 => Ok(Self::OneAndHalf),
            200 => Ok(Self::Double),
            other => Err(InvalidScale(other)),
        }
    }

    /// Density suffix inserted before the file extension.
    ///
    /// The baseline has no suffix.
    pub const fn suffix(self) -> Option<&'static str> {
        match self {
            Self::Baseline => None,
            Self::OneAndHalf => Some("@1.5x"),
            Self::Double => Some("@2x"),
        }
    }

    #[inline]
    pub const fn is_baseline(self) -> bool {
        matches!(self, Self::Baseline)
    }
}

impl TryFrom<u32> for ScaleFactor {
    type Error = InvalidScale;

    fn try_from(percent: u32) -> Result<Self, Self::Error> {
        Self::from_percent(percent)
    }
}

impl From<ScaleFactor> for u32 {
    fn from(scale: ScaleFactor) -> Self {
        scale.percent()
    }
}

impl FromStr for ScaleFactor {
    type Err = InvalidScale;

    /// Accepts `150`, `150%` and `1.5x` style inputs.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "1x" | "1.0x" => return Ok(Self::Baseline),
            "1.5x" => return Ok(Self::OneAndHalf),
            "2x" | "2.0x" => return Ok(Self::Double),
            _ => {}
        }
        let digits = s.strip_suffix('%').unwrap_or(s);
        let percent = digits.parse::<u32>().map_err(|_| InvalidScale(0))?;
        Self::from_percent(percent)
    }
}

impl fmt::Display for ScaleFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}
