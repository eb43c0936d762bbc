//! Plan command: write the overall and per-member HTML schedules.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use scout_core::{Plan, build_plan};

use super::util::load_schedule;
use crate::Config;
use crate::render::{OVERALL_FILE_NAME, member_file_name, render_member, render_overall};

pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    cached: bool,
    out: Option<&Path>,
) -> Result<()> {
    let schedule = load_schedule(config, cached)?;
    let plan = build_plan(&schedule, &config.members, &config.plan_config())
        .context("failed to build scouting plan")?;

    let dir = out.unwrap_or(config.output_dir.as_path());
    for path in write_reports(&plan, dir)? {
        writeln!(writer, "Wrote {}", path.display())?;
    }
    Ok(())
}

/// Writes every report into `dir`. Returns the written paths, overall first.
///
/// Fails before writing anything if two reports would share a file name.
pub fn write_reports(plan: &Plan, dir: &Path) -> Result<Vec<PathBuf>> {
    let file_names = member_file_names(plan)?;

    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let mut written = Vec::with_capacity(plan.members.len() + 1);

    let overall = render_overall(plan).context("failed to render overall schedule")?;
    written.push(write_file(&dir.join(OVERALL_FILE_NAME), &overall)?);

    for (timeline, file_name) in plan.members.iter().zip(file_names) {
        let html = render_member(timeline)
            .with_context(|| format!("failed to render schedule for {}", timeline.member))?;
        written.push(write_file(&dir.join(file_name), &html)?);
    }

    tracing::info!(files = written.len(), dir = %dir.display(), "wrote schedules");
    Ok(written)
}

/// Report file names in roster order, rejecting collisions.
fn member_file_names(plan: &Plan) -> Result<Vec<String>> {
    let mut owners: HashMap<String, &str> = HashMap::new();
    owners.insert(OVERALL_FILE_NAME.to_string(), "the overall schedule");

    let mut names = Vec::with_capacity(plan.members.len());
    for timeline in &plan.members {
        let file_name = member_file_name(&timeline.member);
        if let Some(owner) = owners.get(&file_name) {
            bail!(
                "schedule for {} would overwrite {owner} ({file_name}); rename one of them",
                timeline.member
            );
        }
        owners.insert(file_name.clone(), timeline.member.as_str());
        names.push(file_name);
    }
    Ok(names)
}

fn write_file(path: &Path, contents: &str) -> Result<PathBuf> {
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path.to_path_buf())
}
