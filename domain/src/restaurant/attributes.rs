//! Restaurant attribute value objects
//!
//! Each attribute parses leniently from the shapes catalog feeds actually
//! deliver (`"$$"` or `"2"` for price, `"1~4"` or `"5+"` for party size).

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ordinal price tier, 1 (cheap) to 3 (expensive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PriceTier(u8);

impl PriceTier {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 3;

    pub fn new(tier: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&tier).then_some(Self(tier))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for PriceTier {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        PriceTier::new(value).ok_or_else(|| DomainError::InvalidPriceTier(value.to_string()))
    }
}

impl From<PriceTier> for u8 {
    fn from(tier: PriceTier) -> Self {
        tier.0
    }
}

impl FromStr for PriceTier {
    type Err = DomainError;

    /// Accepts `"1"`..`"3"` or `"$"`..`"$$$"` (also `"₩"` runs).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let tier = if !trimmed.is_empty() && trimmed.chars().all(|c| c == '$' || c == '₩') {
            trimmed.chars().count()
        } else {
            trimmed
                .parse::<usize>()
                .map_err(|_| DomainError::InvalidPriceTier(s.to_string()))?
        };
        u8::try_from(tier)
            .ok()
            .and_then(PriceTier::new)
            .ok_or_else(|| DomainError::InvalidPriceTier(s.to_string()))
    }
}

impl std::fmt::Display for PriceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", "$".repeat(self.0 as usize))
    }
}

/// Whether a restaurant serves spicy food
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spiciness {
    No,
    Yes,
    Both,
}

impl FromStr for Spiciness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "no" | "false" | "mild" => Ok(Spiciness::No),
            "yes" | "true" | "spicy" => Ok(Spiciness::Yes),
            "both" => Ok(Spiciness::Both),
            other => Err(format!("Unknown spiciness: {}", other)),
        }
    }
}

/// Typical serving size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Portion {
    Light,
    Hearty,
    Both,
}

impl FromStr for Portion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" | "small" => Ok(Portion::Light),
            "hearty" | "large" | "big" => Ok(Portion::Hearty),
            "both" => Ok(Portion::Both),
            other => Err(format!("Unknown portion: {}", other)),
        }
    }
}

/// Whether a venue is a place to eat, to drink, or both
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VenueKind {
    Eat,
    Drink,
    Both,
}

/// Inclusive party-size range; `max == None` means open-ended (`"5+"`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartyRange {
    pub min: u32,
    pub max: Option<u32>,
}

impl PartyRange {
    pub fn new(min: u32, max: Option<u32>) -> Self {
        match max {
            Some(max) if max < min => Self {
                min: max,
                max: Some(min),
            },
            _ => Self { min, max },
        }
    }

    pub fn exactly(size: u32) -> Self {
        Self::new(size, Some(size))
    }

    pub fn contains(&self, size: u32) -> bool {
        size >= self.min && self.max.is_none_or(|max| size <= max)
    }

    /// Whether two ranges share at least one party size
    pub fn overlaps(&self, other: &PartyRange) -> bool {
        let lower = self.min.max(other.min);
        match (self.max, other.max) {
            (Some(a), Some(b)) => lower <= a.min(b),
            (Some(a), None) => lower <= a,
            (None, Some(b)) => lower <= b,
            (None, None) => true,
        }
    }
}

impl FromStr for PartyRange {
    type Err = DomainError;

    /// Accepts `"1~4"`, `"1-4"`, `"5+"`, `"3"`; surrounding words such as
    /// `"2~4 people"` are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidPartySize(s.to_string());
        let cleaned: String = s
            .chars()
            .filter(|c| c.is_ascii_digit() || matches!(c, '~' | '-' | '+'))
            .collect();
        if cleaned.is_empty() {
            return Err(invalid());
        }

        if let Some(min) = cleaned.strip_suffix('+') {
            let min = min.parse().map_err(|_| invalid())?;
            return Ok(PartyRange::new(min, None));
        }

        match cleaned.split_once(['~', '-']) {
            Some((lo, hi)) => {
                let lo = lo.parse().map_err(|_| invalid())?;
                let hi = hi.parse().map_err(|_| invalid())?;
                Ok(PartyRange::new(lo, Some(hi)))
            }
            None => {
                let size = cleaned.parse().map_err(|_| invalid())?;
                Ok(PartyRange::exactly(size))
            }
        }
    }
}

impl std::fmt::Display for PartyRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{}", self.min),
            Some(max) => write!(f, "{}~{}", self.min, max),
            None => write!(f, "{}+", self.min),
        }
    }
}
