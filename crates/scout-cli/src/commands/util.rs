//! Shared schedule loading for CLI commands.

use anyhow::{Context, Result, anyhow, bail};
use serde_json::Value;

use scout_core::Schedule;
use scout_frc::{Client, ScheduleResponse};

use crate::{Config, cache};

/// Fetches the schedule payload from the API and writes it to the cache.
pub fn fetch_and_cache(config: &Config) -> Result<Value> {
    let (username, token) = config.credentials().ok_or_else(|| {
        anyhow!("missing FRC API credentials (set SCOUT_API_USERNAME and SCOUT_API_TOKEN or config.toml)")
    })?;
    let event_code = config
        .event_code()
        .ok_or_else(|| anyhow!("missing event code (set SCOUT_EVENT_CODE or config.toml)"))?;

    let client = Client::new(username, token).context("failed to create FRC API client")?;
    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    let payload = runtime
        .block_on(client.fetch_schedule(config.season, event_code, config.tournament_level))
        .with_context(|| format!("failed to fetch schedule for {event_code}"))?;

    cache::save(&config.cache_path, &payload)?;
    Ok(payload)
}

/// Loads the schedule, preferring the cache when `use_cache` is set.
///
/// A missing cache falls back to fetching.
pub fn load_schedule(config: &Config, use_cache: bool) -> Result<Schedule> {
    let cached = if use_cache {
        cache::load(&config.cache_path)?
    } else {
        None
    };

    let payload = if let Some(payload) = cached {
        tracing::debug!(path = %config.cache_path.display(), "using cached schedule");
        payload
    } else {
        if use_cache {
            tracing::warn!(
                path = %config.cache_path.display(),
                "no cached schedule found, fetching from the API"
            );
        }
        fetch_and_cache(config)?
    };

    parse_schedule(config, payload)
}

fn parse_schedule(config: &Config, payload: Value) -> Result<Schedule> {
    let response = ScheduleResponse::from_value(payload).context("failed to parse schedule")?;
    let raw = response.matches_for_level(config.tournament_level);
    let schedule = Schedule::from_raw(&raw).context("schedule contains a malformed match")?;
    if schedule.is_empty() {
        bail!("schedule has no {} matches", config.tournament_level);
    }
    tracing::debug!(matches = schedule.len(), "loaded schedule");
    Ok(schedule)
}
