//! Match schedule ingestion and validation.
//!
//! A [`Schedule`] is built once from the raw matches an event source hands
//! over and is read-only afterwards. Validation is all-or-nothing: gap
//! classification depends on a total, correctly ordered sequence, so a
//! single malformed match rejects the whole schedule.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{MatchNumber, TeamNumber};

/// Errors raised while ingesting a schedule.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The start time could not be parsed as an ISO 8601 local timestamp.
    #[error("match {number}: invalid start time {value:?}")]
    InvalidStartTime { number: MatchNumber, value: String },

    /// The match lists no teams.
    #[error("match {number} has no teams")]
    NoTeams { number: MatchNumber },

    /// The same match number appears twice.
    #[error("duplicate match number {number}")]
    DuplicateMatch { number: MatchNumber },
}

/// A match as delivered by an event source, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMatch {
    pub number: u32,
    /// Local start time, e.g. `2024-03-01T09:00:00`.
    pub start_time: String,
    pub teams: Vec<u32>,
}

/// A validated match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub number: MatchNumber,
    pub start: NaiveDateTime,
    /// Participating teams in station order.
    pub teams: Vec<TeamNumber>,
}

impl Match {
    /// Validates a raw match.
    pub fn from_raw(raw: &RawMatch) -> Result<Self, ScheduleError> {
        let number = MatchNumber(raw.number);
        let start = parse_start_time(&raw.start_time).ok_or_else(|| {
            ScheduleError::InvalidStartTime {
                number,
                value: raw.start_time.clone(),
            }
        })?;
        if raw.teams.is_empty() {
            return Err(ScheduleError::NoTeams { number });
        }

        Ok(Self {
            number,
            start,
            teams: raw.teams.iter().copied().map(TeamNumber).collect(),
        })
    }
}

/// Parses a local ISO 8601 timestamp with optional fractional seconds.
pub fn parse_start_time(value: &str) -> Option<NaiveDateTime> {
    value.trim().parse::<NaiveDateTime>().ok()
}

/// An ordered, validated collection of matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schedule {
    matches: Vec<Match>,
}

impl Schedule {
    /// Validates raw matches, keeping their input order.
    pub fn from_raw(raw: &[RawMatch]) -> Result<Self, ScheduleError> {
        let matches = raw
            .iter()
            .map(Match::from_raw)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(matches)
    }

    /// Builds a schedule from already-parsed matches.
    pub fn new(matches: Vec<Match>) -> Result<Self, ScheduleError> {
        let mut seen = HashSet::with_capacity(matches.len());
        for m in &matches {
            if m.teams.is_empty() {
                return Err(ScheduleError::NoTeams { number: m.number });
            }
            if !seen.insert(m.number) {
                return Err(ScheduleError::DuplicateMatch { number: m.number });
            }
        }
        Ok(Self { matches })
    }

    /// Matches in input order.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Matches sorted ascending by start time. Ties keep input order.
    pub fn chronological(&self) -> Vec<&Match> {
        let mut sorted: Vec<&Match> = self.matches.iter().collect();
        sorted.sort_by_key(|m| m.start);
        sorted
    }

    /// Every team that appears in any match, in first-seen order.
    pub fn teams(&self) -> Vec<TeamNumber> {
        let mut seen = HashSet::new();
        self.matches
            .iter()
            .flat_map(|m| m.teams.iter().copied())
            .filter(|team| seen.insert(*team))
            .collect()
    }
}
