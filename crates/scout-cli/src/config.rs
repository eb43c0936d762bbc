//! Configuration loading and management.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use scout_core::{CoverageConfig, MemberName, PlanConfig, TeamNumber, TimelineConfig};
use scout_frc::TournamentLevel;

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// FRC Events API username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_username: Option<String>,

    /// FRC Events API authorization token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Competition season (year).
    pub season: u16,

    /// Event code, e.g. `BCVI`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_code: Option<String>,

    /// Which part of the event to plan for.
    pub tournament_level: TournamentLevel,

    /// Where the raw API payload is cached.
    pub cache_path: PathBuf,

    /// Default directory for generated reports.
    pub output_dir: PathBuf,

    /// Scouting roster. Order seeds the assignment.
    #[serde(default)]
    pub members: Vec<MemberName>,

    /// Teams that are never assigned.
    #[serde(default)]
    pub excluded_teams: BTreeSet<TeamNumber>,

    pub min_teams_per_member: usize,
    pub min_members_per_team: usize,
    pub lunch_break_minutes: i64,
    pub gap_emphasis_minutes: i64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_username", &self.api_username)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("season", &self.season)
            .field("event_code", &self.event_code)
            .field("tournament_level", &self.tournament_level)
            .field("cache_path", &self.cache_path)
            .field("output_dir", &self.output_dir)
            .field("members", &self.members)
            .field("excluded_teams", &self.excluded_teams)
            .field("min_teams_per_member", &self.min_teams_per_member)
            .field("min_members_per_team", &self.min_members_per_team)
            .field("lunch_break_minutes", &self.lunch_break_minutes)
            .field("gap_emphasis_minutes", &self.gap_emphasis_minutes)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        let coverage = CoverageConfig::default();
        let timeline = TimelineConfig::default();
        Self {
            api_username: None,
            api_token: None,
            season: 2024,
            event_code: None,
            tournament_level: TournamentLevel::default(),
            cache_path: data_dir.join("schedule_cache.json"),
            output_dir: PathBuf::from("."),
            members: Vec::new(),
            excluded_teams: BTreeSet::new(),
            min_teams_per_member: coverage.min_teams_per_member,
            min_members_per_team: coverage.min_members_per_team,
            lunch_break_minutes: timeline.lunch_break_minutes,
            gap_emphasis_minutes: timeline.gap_emphasis_minutes,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (SCOUT_*)
        figment = figment.merge(Env::prefixed("SCOUT_"));

        figment.extract()
    }

    /// Core planning parameters.
    pub fn plan_config(&self) -> PlanConfig {
        PlanConfig {
            coverage: CoverageConfig {
                min_teams_per_member: self.min_teams_per_member,
                min_members_per_team: self.min_members_per_team,
            },
            timeline: TimelineConfig {
                lunch_break_minutes: self.lunch_break_minutes,
                gap_emphasis_minutes: self.gap_emphasis_minutes,
            },
            excluded: self.excluded_teams.clone(),
        }
    }

    /// API credentials, if both are set and non-blank.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let username = non_blank(self.api_username.as_deref())?;
        let token = non_blank(self.api_token.as_deref())?;
        Some((username, token))
    }

    /// Event code, if set and non-blank.
    pub fn event_code(&self) -> Option<&str> {
        non_blank(self.event_code.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Returns the platform-specific config directory for scout.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("scout"))
}

/// Returns the platform-specific data directory for scout.
///
/// On Linux: `~/.local/share/scout`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("scout"))
}
