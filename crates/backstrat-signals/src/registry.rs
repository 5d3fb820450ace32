//! Strategy registry for the recognized strategy selectors.
//!
//! This module maps the selector strings accepted at the engine boundary to
//! strategy metadata, including the reserved-but-unimplemented value
//! strategy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use backstrat_traits::BackstratError;

/// Recognized strategy selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Winner-minus-loser momentum over the return panel.
    Momentum,
    /// Small-minus-big long/short over the size-factor panel.
    SizeFactor,
    /// High-minus-low value factor. Reserved: recognized but not implemented.
    ValueFactor,
}

impl StrategyKind {
    /// The selector string accepted on the command line.
    #[must_use]
    pub const fn selector(&self) -> &'static str {
        match self {
            Self::Momentum => "momentum",
            Self::SizeFactor => "smb",
            Self::ValueFactor => "hml",
        }
    }

    /// Get a human-readable description of the strategy.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Momentum => "Long prior-period winners, short prior-period losers",
            Self::SizeFactor => "Long the small-size tail, short the large-size tail",
            Self::ValueFactor => "Long high book-to-market, short low (not yet implemented)",
        }
    }

    /// Whether a builder exists for this selector.
    #[must_use]
    pub const fn implemented(&self) -> bool {
        !matches!(self, Self::ValueFactor)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

impl FromStr for StrategyKind {
    type Err = BackstratError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "momentum" | "mom" => Ok(Self::Momentum),
            "smb" | "size" => Ok(Self::SizeFactor),
            "hml" | "value" => Ok(Self::ValueFactor),
            other => Err(BackstratError::InvalidParameter(format!(
                "unknown strategy selector: {other}"
            ))),
        }
    }
}

/// Metadata about a strategy selector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInfo {
    /// The selector accepted at the engine boundary.
    pub kind: StrategyKind,
    /// The selector string.
    pub selector: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Whether a builder exists for this selector.
    pub implemented: bool,
}

/// Get information about all recognized strategy selectors.
#[must_use]
pub fn available_strategies() -> Vec<StrategyInfo> {
    [
        StrategyKind::Momentum,
        StrategyKind::SizeFactor,
        StrategyKind::ValueFactor,
    ]
    .into_iter()
    .map(|kind| StrategyInfo {
        kind,
        selector: kind.selector(),
        description: kind.description(),
        implemented: kind.implemented(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_round_trip() {
        for info in available_strategies() {
            let parsed: StrategyKind = info.selector.parse().unwrap();
            assert_eq!(parsed, info.kind);
        }
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("mom".parse::<StrategyKind>().unwrap(), StrategyKind::Momentum);
        assert_eq!("size".parse::<StrategyKind>().unwrap(), StrategyKind::SizeFactor);
        assert_eq!("value".parse::<StrategyKind>().unwrap(), StrategyKind::ValueFactor);
        assert_eq!("MOMENTUM".parse::<StrategyKind>().unwrap(), StrategyKind::Momentum);
    }

    #[test]
    fn test_unknown_selector_is_invalid_parameter() {
        let result = "carry".parse::<StrategyKind>();
        assert!(matches!(result, Err(BackstratError::InvalidParameter(_))));
    }

    #[test]
    fn test_value_factor_is_reserved() {
        assert!(!StrategyKind::ValueFactor.implemented());
        assert!(StrategyKind::Momentum.implemented());
        assert!(StrategyKind::SizeFactor.implemented());
    }

    #[test]
    fn test_available_strategies_listing() {
        let strategies = available_strategies();
        assert_eq!(strategies.len(), 3);
        assert!(strategies.iter().all(|s| !s.description.is_empty()));
    }
}
