//! Date generation rules.

use std::fmt;
use std::str::FromStr;

/// Direction in which unadjusted schedule dates are rolled.
///
/// - `Forward`: from the start date, short stub at the end
/// - `Backward`: from the end date, short stub at the start
/// - `Cds`: from the end date; the first accrual starts on the last
///   rolled date on or before the start date instead of the start itself
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DateGenerationRule {
    /// Roll forward from the start date.
    #[default]
    Forward,
    /// Roll backward from the end date.
    Backward,
    /// Standard CDS backward generation.
    Cds,
}

impl DateGenerationRule {
    /// Returns the rule name.
    pub fn name(&self) -> &'static str {
        match self {
            DateGenerationRule::Forward => "Forward",
            DateGenerationRule::Backward => "Backward",
            DateGenerationRule::Cds => "CDS",
        }
    }
}

impl fmt::Display for DateGenerationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DateGenerationRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "forward" => Ok(DateGenerationRule::Forward),
            "backward" => Ok(DateGenerationRule::Backward),
            "cds" => Ok(DateGenerationRule::Cds),
            _ => Err(format!("Unknown date generation rule: {}", s)),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for DateGenerationRule {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for DateGenerationRule {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
