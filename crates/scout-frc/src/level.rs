//! Tournament level as the single source of truth for level strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Competition phase a schedule is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TournamentLevel {
    #[default]
    Practice,
    Qualification,
    Playoff,
}

impl TournamentLevel {
    /// Spelling used in the `tournamentLevel` query parameter.
    pub const fn query_value(self) -> &'static str {
        match self {
            Self::Practice => "practice",
            Self::Qualification => "qualification",
            Self::Playoff => "playoff",
        }
    }

    /// Spelling used in the `tournamentLevel` field of returned matches.
    pub const fn api_name(self) -> &'static str {
        match self {
            Self::Practice => "Practice",
            Self::Qualification => "Qualification",
            Self::Playoff => "Playoff",
        }
    }
}

impl fmt::Display for TournamentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.query_value())
    }
}

impl FromStr for TournamentLevel {
    type Err = UnknownTournamentLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "practice" => Ok(Self::Practice),
            "qualification" | "qual" => Ok(Self::Qualification),
            "playoff" | "playoffs" => Ok(Self::Playoff),
            _ => Err(UnknownTournamentLevel(s.to_string())),
        }
    }
}

impl Serialize for TournamentLevel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.query_value())
    }
}

impl<'de> Deserialize<'de> for TournamentLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown tournament level strings.
#[derive(Debug, Clone)]
pub struct UnknownTournamentLevel(String);

impl fmt::Display for UnknownTournamentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tournament level: {}", self.0)
    }
}

impl std::error::Error for UnknownTournamentLevel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_all_variants() {
        for variant in [
            TournamentLevel::Practice,
            TournamentLevel::Qualification,
            TournamentLevel::Playoff,
        ] {
            let parsed: TournamentLevel = variant.to_string().parse().expect("should parse");
            assert_eq!(parsed, variant);
            let from_api: TournamentLevel = variant.api_name().parse().expect("should parse");
            assert_eq!(from_api, variant);
        }
    }

    #[test]
    fn unknown_level_errors() {
        let err = "finals".parse::<TournamentLevel>().unwrap_err();
        assert_eq!(err.to_string(), "unknown tournament level: finals");
    }

    #[test]
    fn deserializes_from_config_string() {
        let level: TournamentLevel = serde_json::from_str("\"qualification\"").unwrap();
        assert_eq!(level, TournamentLevel::Qualification);
    }
}
