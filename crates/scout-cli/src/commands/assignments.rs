//! Assignments command: show who scouts which team.

use std::io::Write;

use anyhow::{Context, Result};
use serde_json::json;

use scout_core::{Assignment, assign_coverage};

use super::util::load_schedule;
use crate::Config;

pub fn run<W: Write>(writer: &mut W, config: &Config, cached: bool, json: bool) -> Result<()> {
    let schedule = load_schedule(config, cached)?;
    let plan_config = config.plan_config();
    let assignment = assign_coverage(
        &schedule,
        &config.members,
        &plan_config.coverage,
        &plan_config.excluded,
    )
    .context("failed to assign members to teams")?;

    if json {
        let output = assignment_json(&assignment);
        writeln!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
    } else {
        write_assignments(writer, &assignment)?;
    }
    Ok(())
}

fn assignment_json(assignment: &Assignment) -> serde_json::Value {
    let members: Vec<_> = assignment
        .by_member()
        .map(|(member, teams)| json!({ "member": member, "teams": teams }))
        .collect();
    let teams: Vec<_> = assignment
        .by_team()
        .map(|(team, members)| json!({ "team": team, "members": members }))
        .collect();
    json!({
        "members": members,
        "teams": teams,
        "excluded": assignment.excluded(),
    })
}

fn write_assignments<W: Write>(writer: &mut W, assignment: &Assignment) -> Result<()> {
    let name_width = assignment
        .members()
        .iter()
        .map(|m| m.as_str().chars().count())
        .max()
        .unwrap_or(0);

    writeln!(writer, "MEMBER ASSIGNMENTS")?;
    writeln!(writer, "──────────────────")?;
    for (member, teams) in assignment.by_member() {
        writeln!(
            writer,
            "{:<name_width$}  {}",
            member.as_str(),
            join(teams.iter())
        )?;
    }

    let team_labels: Vec<(String, String)> = assignment
        .by_team()
        .map(|(team, members)| {
            let names = if members.is_empty() {
                "(unassigned)".to_string()
            } else {
                join(members.iter())
            };
            (format!("Team {team}"), names)
        })
        .collect();
    let label_width = team_labels
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);

    writeln!(writer)?;
    writeln!(writer, "TEAM COVERAGE")?;
    writeln!(writer, "─────────────")?;
    for (label, names) in &team_labels {
        writeln!(writer, "{label:<label_width$}  {names}")?;
    }

    if !assignment.excluded().is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Excluded: {}", join(assignment.excluded().iter()))?;
    }
    Ok(())
}

fn join<T: std::fmt::Display>(items: impl Iterator<Item = T>) -> String {
    items.map(|item| item.to_string()).collect::<Vec<_>>().join(", ")
}
