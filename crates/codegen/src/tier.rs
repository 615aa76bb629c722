// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Optimization tier a function was compiled at
///
/// Tiers follow the usual `-O` levels, so the same function may be captured
/// several times with different machine code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    /// `-O0`
    Unoptimized,
    /// `-O1`
    Less,
    /// `-O2`
    Default,
    /// `-O3`
    Aggressive,
}

impl Tier {
    pub const ALL: [Tier; 4] = [
        Tier::Unoptimized,
        Tier::Less,
        Tier::Default,
        Tier::Aggressive,
    ];

    /// Numeric optimization level (0-3)
    pub fn level(self) -> u8 {
        match self {
            Tier::Unoptimized => 0,
            Tier::Less => 1,
            Tier::Default => 2,
            Tier::Aggressive => 3,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "O{}", self.level())
    }
}

#[derive(Debug, Clone, Error)]
#[error("unknown optimization tier: {0}")]
pub struct ParseTierError(String);

impl FromStr for Tier {
    type Err = ParseTierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "o0" | "0" | "unoptimized" => Ok(Tier::Unoptimized),
            "o1" | "1" | "less" => Ok(Tier::Less),
            "o2" | "2" | "default" => Ok(Tier::Default),
            "o3" | "3" | "aggressive" => Ok(Tier::Aggressive),
            _ => Err(ParseTierError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_roundtrips_through_from_str() {
        for tier in Tier::ALL {
            assert_eq!(tier.to_string().parse::<Tier>().unwrap(), tier);
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Aggressive".parse::<Tier>().unwrap(), Tier::Aggressive);
        assert_eq!(" default ".parse::<Tier>().unwrap(), Tier::Default);
        assert!("O4".parse::<Tier>().is_err());
    }
}
