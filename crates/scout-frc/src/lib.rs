//! FRC Events API integration for the scouting planner.
//!
//! Fetches an event's match schedule and converts it into
//! [`scout_core::RawMatch`] values. The response body is returned verbatim
//! as JSON so callers can cache it and parse it again later.

mod level;

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use scout_core::RawMatch;

pub use level::{TournamentLevel, UnknownTournamentLevel};

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const FRC_API_URL: &str = "https://frc-api.firstinspires.org/v3.0";

/// Event source errors.
#[derive(Debug, Error)]
pub enum FrcError {
    /// The provided credentials were invalid.
    #[error("invalid credentials: {reason}")]
    InvalidCredentials { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned an error response.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
    /// Failed to parse the schedule payload.
    #[error("invalid schedule payload: {0}")]
    InvalidResponse(String),
}

/// FRC Events API client.
///
/// The client is safe to clone and share across threads. Each clone shares
/// the underlying HTTP connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    username: String,
    token: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new client with the given API credentials.
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Result<Self, FrcError> {
        Self::with_base_url(username, token, FRC_API_URL)
    }

    /// Creates a client against a different API root.
    pub fn with_base_url(
        username: impl Into<String>,
        token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, FrcError> {
        let username = username.into();
        let token = token.into();

        if username.trim().is_empty() {
            return Err(FrcError::InvalidCredentials {
                reason: "username cannot be empty",
            });
        }
        if token.trim().is_empty() {
            return Err(FrcError::InvalidCredentials {
                reason: "API token cannot be empty",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(FrcError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username,
            token,
        })
    }

    /// Fetches the raw schedule payload for one tournament level.
    pub async fn fetch_schedule(
        &self,
        season: u16,
        event_code: &str,
        level: TournamentLevel,
    ) -> Result<serde_json::Value, FrcError> {
        let url = schedule_url(&self.base_url, season, event_code, level);
        tracing::debug!(%url, "fetching schedule");

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.username, Some(&self.token))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FrcError::Api {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .map_or_else(|| body.clone(), str::to_string),
            });
        }

        serde_json::from_str(&body).map_err(|err| FrcError::InvalidResponse(err.to_string()))
    }
}

fn schedule_url(base_url: &str, season: u16, event_code: &str, level: TournamentLevel) -> String {
    format!(
        "{base_url}/{season}/schedule/{event_code}?tournamentLevel={}",
        level.query_value()
    )
}

/// Top-level schedule payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleResponse {
    #[serde(rename = "Schedule")]
    pub schedule: Vec<ScheduledMatch>,
}

/// One match as listed by the API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledMatch {
    pub match_number: u32,
    pub start_time: String,
    pub tournament_level: String,
    #[serde(default)]
    pub description: Option<String>,
    pub teams: Vec<ScheduledTeam>,
}

/// A team slot within a match.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTeam {
    pub team_number: u32,
    #[serde(default)]
    pub station: Option<String>,
}

impl ScheduleResponse {
    /// Parses a raw payload as returned by [`Client::fetch_schedule`].
    pub fn from_value(value: serde_json::Value) -> Result<Self, FrcError> {
        serde_json::from_value(value).map_err(|err| FrcError::InvalidResponse(err.to_string()))
    }

    /// Matches of the requested level, in payload order.
    pub fn matches_for_level(&self, level: TournamentLevel) -> Vec<RawMatch> {
        self.schedule
            .iter()
            .filter(|m| m.tournament_level == level.api_name())
            .map(|m| RawMatch {
                number: m.match_number,
                start_time: m.start_time.clone(),
                teams: m.teams.iter().map(|t| t.team_number).collect(),
            })
            .collect()
    }
}
