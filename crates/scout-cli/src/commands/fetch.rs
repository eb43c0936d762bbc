//! Fetch command: download the event schedule and refresh the cache.

use std::io::Write;

use anyhow::{Context, Result};

use scout_frc::ScheduleResponse;

use super::util::fetch_and_cache;
use crate::Config;

pub fn run<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let payload = fetch_and_cache(config)?;
    let response = ScheduleResponse::from_value(payload).context("failed to parse schedule")?;
    let count = response.matches_for_level(config.tournament_level).len();

    writeln!(
        writer,
        "Fetched {count} {} matches for {} ({})",
        config.tournament_level,
        config.event_code().unwrap_or_default(),
        config.season
    )?;
    writeln!(writer, "Cache: {}", config.cache_path.display())?;
    Ok(())
}
