//! HTML rendering for the overall and per-member schedules.
//!
//! Reports are plain self-contained HTML meant for printing. Every piece of
//! user-provided text goes through [`escape_html`].

use std::fmt::{self, Write};

use scout_core::{
    Assignment, EventRow, Gap, Marker, MemberName, MemberTimeline, Plan, TeamNumber, TeamStyle,
    TimelineRow,
};

/// File name of the overall report.
pub const OVERALL_FILE_NAME: &str = "overall_schedule.html";

const TIME_FORMAT: &str = "%a %H:%M";

const BASE_STYLE: &str = "\
        body { font-family: Arial, sans-serif; margin: 0.5in; }
        table { width: 100%; border-collapse: collapse; margin-bottom: 20px; }
        th, td { border: 1px solid black; padding: 6px; text-align: center; }
        th { background-color: #f2f2f2; }
        .break { font-weight: bold; background-color: #ffd966; }
        .milestone { font-weight: bold; background-color: #b6d7a8; }
        .excluded { font-style: italic; }
        .gap-emphasized { text-decoration: underline; font-weight: bold; }
";

/// Escapes text for use in HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// File name of a member's report: lowercase, non-alphanumerics as `_`.
pub fn member_file_name(member: &MemberName) -> String {
    let stem: String = member
        .as_str()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                '_'
            }
        })
        .collect();
    format!("{stem}_schedule.html")
}

/// Renders the overall schedule with every match and the full assignment.
pub fn render_overall(plan: &Plan) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_head(&mut out, "Overall Scouting Schedule", "")?;
    writeln!(out, "    <h1>Overall Scouting Schedule</h1>")?;
    writeln!(out, "    <table>")?;
    writeln!(
        out,
        "        <tr><th>Match</th><th>Time</th><th>Gap</th><th>Teams</th><th>Assigned Members</th></tr>"
    )?;

    for row in &plan.overall {
        match row {
            TimelineRow::Marker { marker } => write_marker_row(&mut out, *marker, 5)?,
            TimelineRow::Event(event) => {
                writeln!(
                    out,
                    "        <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    event.number,
                    event.start.format(TIME_FORMAT),
                    gap_cell(event.gap),
                    overall_teams(event),
                    assigned_members(event, &plan.assignment),
                )?;
            }
        }
    }
    writeln!(out, "    </table>")?;

    writeln!(out, "    <h1>Team Assignments</h1>")?;
    writeln!(out, "    <table>")?;
    writeln!(out, "        <tr><th>Member</th><th>Assigned Teams</th></tr>")?;
    for (member, teams) in plan.assignment.by_member() {
        writeln!(
            out,
            "        <tr><td>{}</td><td>{}</td></tr>",
            escape_html(member.as_str()),
            team_list(teams),
        )?;
    }
    writeln!(out, "    </table>")?;
    write_tail(&mut out)?;
    Ok(out)
}

/// Renders one member's schedule.
///
/// Each assigned team gets its own background colour; the focus team of a
/// row is underlined.
pub fn render_member(timeline: &MemberTimeline) -> Result<String, fmt::Error> {
    let name = escape_html(timeline.member.as_str());
    let title = format!("{name}&#39;s Scouting Schedule");

    let mut team_styles = String::new();
    writeln!(team_styles, "        .focus {{ text-decoration: underline; }}")?;
    for (idx, team) in timeline.teams.iter().enumerate() {
        writeln!(
            team_styles,
            "        .team-{team} {{ background-color: hsl({}, 70%, 90%); }}",
            (idx * 60) % 360
        )?;
    }

    let mut out = String::new();
    write_head(&mut out, &title, &team_styles)?;
    writeln!(out, "    <h1>{title}</h1>")?;
    let legend = timeline
        .teams
        .iter()
        .map(|team| format!("<span class=\"team-{team}\">{team}</span>"))
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(out, "    <p>Assigned teams: {legend}</p>")?;
    writeln!(out, "    <table>")?;
    writeln!(
        out,
        "        <tr><th>Match</th><th>Time</th><th>Gap</th><th>Teams</th></tr>"
    )?;

    for row in &timeline.rows {
        match row {
            TimelineRow::Marker { marker } => write_marker_row(&mut out, *marker, 4)?,
            TimelineRow::Event(event) => {
                writeln!(
                    out,
                    "        <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    event.number,
                    event.start.format(TIME_FORMAT),
                    gap_cell(event.gap),
                    member_teams(event),
                )?;
            }
        }
    }
    writeln!(out, "    </table>")?;
    write_tail(&mut out)?;
    Ok(out)
}

fn write_head(out: &mut String, title: &str, extra_style: &str) -> fmt::Result {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "    <meta charset=\"UTF-8\">")?;
    writeln!(out, "    <title>{title}</title>")?;
    writeln!(out, "    <style>")?;
    write!(out, "{BASE_STYLE}{extra_style}")?;
    writeln!(out, "    </style>")?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")
}

fn write_tail(out: &mut String) -> fmt::Result {
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")
}

fn write_marker_row(out: &mut String, marker: Marker, columns: usize) -> fmt::Result {
    let class = match marker {
        Marker::LunchBreak | Marker::Overnight => "break",
        Marker::AllTeamsObserved => "milestone",
    };
    writeln!(
        out,
        "        <tr class=\"{class}\"><td colspan=\"{columns}\">{marker}</td></tr>"
    )
}

fn gap_cell(gap: Gap) -> String {
    if gap.is_emphasized() {
        format!("<span class=\"gap-emphasized\">{gap}</span>")
    } else {
        gap.to_string()
    }
}

fn team_list(teams: &[TeamNumber]) -> String {
    teams
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn overall_teams(event: &EventRow) -> String {
    event
        .teams
        .iter()
        .map(|styled| match styled.style {
            TeamStyle::Excluded => format!("<span class=\"excluded\">{}</span>", styled.team),
            TeamStyle::Focus | TeamStyle::Assigned => styled.team.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn assigned_members(event: &EventRow, assignment: &Assignment) -> String {
    event
        .teams
        .iter()
        .map(|styled| {
            if assignment.is_excluded(styled.team) {
                return format!("Team {}: <span class=\"excluded\">excluded</span>", styled.team);
            }
            let members = assignment.members_for(styled.team);
            if members.is_empty() {
                format!("Team {}: unassigned", styled.team)
            } else {
                let names = members
                    .iter()
                    .map(|m| escape_html(m.as_str()))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Team {}: {names}", styled.team)
            }
        })
        .collect::<Vec<_>>()
        .join("<br>")
}

fn member_teams(event: &EventRow) -> String {
    event
        .teams
        .iter()
        .map(|styled| {
            let team = styled.team;
            match styled.style {
                TeamStyle::Focus => format!("<span class=\"team-{team} focus\">{team}</span>"),
                TeamStyle::Excluded => format!("<span class=\"excluded\">{team}</span>"),
                TeamStyle::Assigned => format!("<span class=\"team-{team}\">{team}</span>"),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
