// =============================================================================
// Shared types used across the fxtrend analyzer
// =============================================================================

use serde::{Deserialize, Serialize};

/// Sampling granularity of a price series.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interval {
    Daily,
    Hourly,
}

impl Interval {
    /// Interval code expected by the market-data vendor.
    pub fn api_code(self) -> &'static str {
        match self {
            Self::Daily => "1day",
            Self::Hourly => "1h",
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::Daily
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.api_code())
    }
}

impl std::str::FromStr for Interval {
    type Err = anyhow::Error;

    /// Accepts both the human spelling ("daily", "hourly") and the vendor
    /// code ("1day", "1h").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "1day" => Ok(Self::Daily),
            "hourly" | "1h" => Ok(Self::Hourly),
            other => anyhow::bail!("unsupported interval '{other}' (expected Daily or Hourly)"),
        }
    }
}

/// Coarse direction of recent price action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Bullish,
    Bearish,
    Sideways,
    Unknown,
}

impl Default for TrendDirection {
    fn default() -> Self {
        Self::Unknown
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "Bullish"),
            Self::Bearish => write!(f, "Bearish"),
            Self::Sideways => write!(f, "Sideways"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Qualitative strength of the detected move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendStrength {
    Strong,
    Moderate,
    Weak,
    Unknown,
}

impl Default for TrendStrength {
    fn default() -> Self {
        Self::Unknown
    }
}

impl std::fmt::Display for TrendStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strong => write!(f, "Strong"),
            Self::Moderate => write!(f, "Moderate"),
            Self::Weak => write!(f, "Weak"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Interpretation zone for an RSI reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsiZone {
    Overbought,
    Oversold,
    Neutral,
}

impl RsiZone {
    /// Classify an RSI value: above 70 is overbought, below 30 is oversold.
    /// Both comparisons are strict, so readings of exactly 70 or 30 stay neutral.
    pub fn from_value(rsi: f64) -> Self {
        if rsi > 70.0 {
            Self::Overbought
        } else if rsi < 30.0 {
            Self::Oversold
        } else {
            Self::Neutral
        }
    }
}

impl std::fmt::Display for RsiZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overbought => write!(f, "Overbought"),
            Self::Oversold => write!(f, "Oversold"),
            Self::Neutral => write!(f, "Neutral"),
        }
    }
}
