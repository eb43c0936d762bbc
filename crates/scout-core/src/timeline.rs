//! Timeline annotation: gap classification and break markers.
//!
//! A timeline walks matches in chronological order and compares every real
//! event with the previous real event of the same timeline. Globally every
//! match is real; in a member's timeline only matches with one of the
//! member's (non-excluded) teams are.
//!
//! Breaks are classified with strict priority:
//!
//! 1. Calendar date changed: `Overnight` marker row, gap `Overnight`.
//! 2. Elapsed time reached the lunch threshold: `LunchBreak` marker row,
//!    gap `LunchBreak`.
//! 3. Match number is the previous one plus one: `Contiguous`.
//! 4. Otherwise the elapsed minutes, emphasized above the emphasis
//!    threshold.
//!
//! Elapsed time runs from the first skipped match (or the previous real
//! start when nothing was skipped) to this match, for both the lunch test and
//! the minute count.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use thiserror::Error;

use crate::assignment::Assignment;
use crate::milestone::MilestoneTracker;
use crate::schedule::{Match, Schedule};
use crate::types::{MatchNumber, MemberName, TeamNumber};

/// Largest accepted threshold, one week in minutes.
pub const MAX_THRESHOLD_MINUTES: i64 = 7 * 24 * 60;

/// Thresholds for break detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineConfig {
    /// Gaps of at least this many minutes are lunch breaks.
    /// Default: 60.
    pub lunch_break_minutes: i64,

    /// Gaps longer than this many minutes are emphasized.
    /// Default: 15.
    pub gap_emphasis_minutes: i64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            lunch_break_minutes: 60,
            gap_emphasis_minutes: 15,
        }
    }
}

/// Invalid timeline thresholds.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimelineConfigError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: i64 },
    #[error("{field} must be at most {max}, got {value}")]
    TooLarge {
        field: &'static str,
        value: i64,
        max: i64,
    },
}

impl TimelineConfig {
    /// Checks that both thresholds are positive and at most
    /// [`MAX_THRESHOLD_MINUTES`].
    pub fn validate(&self) -> Result<(), TimelineConfigError> {
        check_threshold("lunch_break_minutes", self.lunch_break_minutes)?;
        check_threshold("gap_emphasis_minutes", self.gap_emphasis_minutes)
    }
}

const fn check_threshold(field: &'static str, value: i64) -> Result<(), TimelineConfigError> {
    if value <= 0 {
        return Err(TimelineConfigError::NotPositive { field, value });
    }
    if value > MAX_THRESHOLD_MINUTES {
        return Err(TimelineConfigError::TooLarge {
            field,
            value,
            max: MAX_THRESHOLD_MINUTES,
        });
    }
    Ok(())
}

/// Gap between a real event and the previous real event of its timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Gap {
    /// No gap to show: first event, consecutive match, or zero minutes.
    Contiguous,
    /// Measured gap in whole minutes.
    Minutes { minutes: i64, emphasized: bool },
    LunchBreak,
    Overnight,
}

impl Gap {
    /// The marker row that precedes an event with this gap, if any.
    pub const fn marker(self) -> Option<Marker> {
        match self {
            Self::LunchBreak => Some(Marker::LunchBreak),
            Self::Overnight => Some(Marker::Overnight),
            Self::Contiguous | Self::Minutes { .. } => None,
        }
    }

    /// Whether the gap should be visually emphasized.
    pub const fn is_emphasized(self) -> bool {
        match self {
            Self::Minutes { emphasized, .. } => emphasized,
            Self::LunchBreak | Self::Overnight => true,
            Self::Contiguous => false,
        }
    }
}

impl fmt::Display for Gap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contiguous => write!(f, "N/A"),
            Self::Minutes { minutes, .. } => write!(f, "{minutes} minutes"),
            Self::LunchBreak => write!(f, "Lunch Break"),
            Self::Overnight => write!(f, "Overnight"),
        }
    }
}

/// Synthetic rows inserted between events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    LunchBreak,
    Overnight,
    AllTeamsObserved,
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::LunchBreak => "Lunch Break",
            Self::Overnight => "Overnight",
            Self::AllTeamsObserved => "All Teams Observed",
        };
        write!(f, "{s}")
    }
}

/// How a team is presented within an event row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamStyle {
    /// The member's primary team for this row.
    Focus,
    /// Excluded from assignment.
    Excluded,
    /// Any other team.
    Assigned,
}

/// A team with its presentation tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyledTeam {
    pub team: TeamNumber,
    pub style: TeamStyle,
}

/// A real match in a timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRow {
    pub number: MatchNumber,
    pub start: NaiveDateTime,
    pub gap: Gap,
    /// The member's focus team. Always `None` in the global timeline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_team: Option<TeamNumber>,
    /// Teams in station order.
    pub teams: Vec<StyledTeam>,
}

/// One row of an annotated timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "row", rename_all = "snake_case")]
pub enum TimelineRow {
    Event(EventRow),
    Marker { marker: Marker },
}

impl TimelineRow {
    pub const fn as_event(&self) -> Option<&EventRow> {
        match self {
            Self::Event(row) => Some(row),
            Self::Marker { .. } => None,
        }
    }

    pub const fn as_marker(&self) -> Option<Marker> {
        match self {
            Self::Event(_) => None,
            Self::Marker { marker } => Some(*marker),
        }
    }
}

/// Builds the timeline over every match, including the milestone marker.
pub fn global_timeline(
    schedule: &Schedule,
    assignment: &Assignment,
    config: &TimelineConfig,
) -> Vec<TimelineRow> {
    let tracker = MilestoneTracker::new(schedule.teams());
    annotate(
        &schedule.chronological(),
        assignment.excluded(),
        None,
        config,
        Some(tracker),
    )
}

/// Builds the timeline of matches involving `member`'s teams.
pub fn member_timeline(
    schedule: &Schedule,
    assignment: &Assignment,
    member: &MemberName,
    config: &TimelineConfig,
) -> Vec<TimelineRow> {
    annotate(
        &schedule.chronological(),
        assignment.excluded(),
        Some(assignment.teams_for(member)),
        config,
        None,
    )
}

/// Core scan. `matches` must be chronological.
fn annotate(
    matches: &[&Match],
    excluded: &BTreeSet<TeamNumber>,
    assigned: Option<&[TeamNumber]>,
    config: &TimelineConfig,
    mut milestone: Option<MilestoneTracker>,
) -> Vec<TimelineRow> {
    let mut rows = Vec::new();
    let mut previous: Option<(usize, &Match)> = None;

    for (idx, &current) in matches.iter().enumerate() {
        let primary_team = match assigned {
            None => None,
            Some(assigned) => {
                let primary = current
                    .teams
                    .iter()
                    .copied()
                    .find(|team| assigned.contains(team) && !excluded.contains(team));
                if primary.is_none() {
                    continue;
                }
                primary
            }
        };

        let gap = previous.map_or(Gap::Contiguous, |(prev_idx, prev)| {
            let first_skipped = matches[prev_idx + 1..idx].first().copied();
            classify(prev, current, first_skipped, config)
        });
        if let Some(marker) = gap.marker() {
            rows.push(TimelineRow::Marker { marker });
        }

        rows.push(TimelineRow::Event(EventRow {
            number: current.number,
            start: current.start,
            gap,
            primary_team,
            teams: style_teams(current, primary_team, excluded),
        }));

        if milestone
            .as_mut()
            .is_some_and(|tracker| tracker.observe(current))
        {
            rows.push(TimelineRow::Marker {
                marker: Marker::AllTeamsObserved,
            });
        }

        previous = Some((idx, current));
    }

    rows
}

/// Classifies the break between two real events.
fn classify(
    previous: &Match,
    current: &Match,
    first_skipped: Option<&Match>,
    config: &TimelineConfig,
) -> Gap {
    if current.start.date() != previous.start.date() {
        return Gap::Overnight;
    }
    let gap_start = first_skipped.map_or(previous.start, |m| m.start);
    let elapsed = current.start - gap_start;
    if elapsed >= Duration::minutes(config.lunch_break_minutes) {
        return Gap::LunchBreak;
    }
    if current.number.follows(previous.number) {
        return Gap::Contiguous;
    }

    let seconds = elapsed.num_seconds();
    if seconds == 0 {
        return Gap::Contiguous;
    }
    Gap::Minutes {
        minutes: round_minutes(seconds),
        emphasized: seconds > config.gap_emphasis_minutes * 60,
    }
}

/// Whole minutes, ties to even.
const fn round_minutes(seconds: i64) -> i64 {
    let whole = seconds.div_euclid(60);
    let rest = seconds.rem_euclid(60);
    if rest > 30 || (rest == 30 && whole % 2 != 0) {
        whole + 1
    } else {
        whole
    }
}

fn style_teams(
    current: &Match,
    primary_team: Option<TeamNumber>,
    excluded: &BTreeSet<TeamNumber>,
) -> Vec<StyledTeam> {
    // A team listed twice is the focus only once.
    let focus_at =
        primary_team.and_then(|primary| current.teams.iter().position(|&t| t == primary));
    current
        .teams
        .iter()
        .enumerate()
        .map(|(idx, &team)| {
            let style = if excluded.contains(&team) {
                TeamStyle::Excluded
            } else if primary_team == Some(team) && focus_at == Some(idx) {
                TeamStyle::Focus
            } else {
                TeamStyle::Assigned
            };
            StyledTeam { team, style }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn m(number: u32, start: NaiveDateTime, teams: &[u32]) -> Match {
        Match {
            number: MatchNumber(number),
            start,
            teams: teams.iter().copied().map(TeamNumber).collect(),
        }
    }

    fn teams(numbers: &[u32]) -> Vec<TeamNumber> {
        numbers.iter().copied().map(TeamNumber).collect()
    }

    fn run(matches: &[Match], assigned: Option<&[TeamNumber]>, excluded: &[u32]) -> Vec<TimelineRow> {
        let refs: Vec<&Match> = matches.iter().collect();
        let excluded: BTreeSet<TeamNumber> = excluded.iter().copied().map(TeamNumber).collect();
        annotate(&refs, &excluded, assigned, &TimelineConfig::default(), None)
    }

    fn gaps(rows: &[TimelineRow]) -> Vec<(u32, Gap)> {
        rows.iter()
            .filter_map(TimelineRow::as_event)
            .map(|row| (row.number.get(), row.gap))
            .collect()
    }

    fn markers(rows: &[TimelineRow]) -> Vec<Marker> {
        rows.iter().filter_map(TimelineRow::as_marker).collect()
    }

    #[test]
    fn first_event_is_contiguous() {
        let rows = run(&[m(1, at(1, 9, 0), &[1, 2])], None, &[]);
        assert_eq!(gaps(&rows), vec![(1, Gap::Contiguous)]);
        assert!(markers(&rows).is_empty());
    }

    #[test]
    fn overnight_wins_over_short_clock_gap() {
        let rows = run(
            &[m(20, at(1, 23, 58), &[1]), m(21, at(2, 0, 3), &[1])],
            None,
            &[],
        );
        assert_eq!(gaps(&rows)[1], (21, Gap::Overnight));
        assert_eq!(markers(&rows), vec![Marker::Overnight]);
    }

    #[test]
    fn overnight_same_clock_time_next_day() {
        let assigned = teams(&[5]);
        let rows = run(
            &[m(30, at(1, 9, 0), &[5, 6]), m(31, at(2, 9, 0), &[5, 7])],
            Some(&assigned),
            &[],
        );

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], TimelineRow::Marker { marker: Marker::Overnight });
        assert_eq!(rows[2].as_event().unwrap().gap, Gap::Overnight);
    }

    #[test]
    fn lunch_break_inserts_marker() {
        let rows = run(
            &[m(10, at(1, 11, 50), &[1]), m(11, at(1, 12, 50), &[1])],
            None,
            &[],
        );
        assert_eq!(gaps(&rows)[1], (11, Gap::LunchBreak));
        assert_eq!(
            rows[1],
            TimelineRow::Marker {
                marker: Marker::LunchBreak
            }
        );
    }

    #[test]
    fn consecutive_numbers_are_contiguous_despite_clock_gap() {
        let assigned = teams(&[3]);
        let rows = run(
            &[m(12, at(1, 10, 0), &[3, 4]), m(13, at(1, 10, 40), &[3, 9])],
            Some(&assigned),
            &[],
        );
        assert_eq!(gaps(&rows), vec![(12, Gap::Contiguous), (13, Gap::Contiguous)]);
    }

    #[test]
    fn gap_measured_from_first_skipped_match() {
        let assigned = teams(&[1]);
        let rows = run(
            &[
                m(1, at(1, 9, 0), &[1, 2]),
                m(2, at(1, 9, 7), &[3, 4]),
                m(3, at(1, 9, 14), &[5, 6]),
                m(4, at(1, 9, 21), &[1, 7]),
                m(5, at(1, 9, 28), &[8, 9]),
                m(6, at(1, 9, 35), &[10, 11]),
                m(7, at(1, 9, 42), &[12, 13]),
                m(8, at(1, 9, 49), &[1, 14]),
            ],
            Some(&assigned),
            &[],
        );

        assert_eq!(
            gaps(&rows),
            vec![
                (1, Gap::Contiguous),
                (
                    4,
                    Gap::Minutes {
                        minutes: 14,
                        emphasized: false
                    }
                ),
                (
                    8,
                    Gap::Minutes {
                        minutes: 21,
                        emphasized: true
                    }
                ),
            ]
        );
    }

    #[test]
    fn gap_without_skipped_match_uses_previous_start() {
        let rows = run(
            &[m(1, at(1, 9, 0), &[1]), m(5, at(1, 9, 20), &[2])],
            None,
            &[],
        );
        assert_eq!(
            gaps(&rows)[1],
            (
                5,
                Gap::Minutes {
                    minutes: 20,
                    emphasized: true
                }
            )
        );
    }

    #[test]
    fn emphasis_threshold_is_exclusive() {
        let rows = run(
            &[m(1, at(1, 9, 0), &[1]), m(3, at(1, 9, 15), &[2])],
            None,
            &[],
        );
        assert_eq!(
            gaps(&rows)[1].1,
            Gap::Minutes {
                minutes: 15,
                emphasized: false
            }
        );
    }

    #[test]
    fn zero_minute_gap_is_contiguous() {
        let rows = run(
            &[m(1, at(1, 9, 0), &[1]), m(7, at(1, 9, 0), &[2])],
            None,
            &[],
        );
        assert_eq!(gaps(&rows)[1].1, Gap::Contiguous);
    }

    #[test]
    fn minutes_round_to_nearest() {
        let start = at(1, 9, 0);
        let rows = run(
            &[
                m(1, start, &[1]),
                m(3, start + Duration::seconds(7 * 60 + 31), &[2]),
            ],
            None,
            &[],
        );
        assert_eq!(
            gaps(&rows)[1].1,
            Gap::Minutes {
                minutes: 8,
                emphasized: false
            }
        );
    }

    #[test]
    fn member_timeline_skips_unassigned_and_excluded_matches() {
        let assigned = teams(&[1, 6]);
        let rows = run(
            &[
                m(1, at(1, 9, 0), &[2, 3]),
                m(2, at(1, 9, 7), &[6, 4]),
                m(3, at(1, 9, 14), &[1, 5]),
            ],
            Some(&assigned),
            &[6],
        );
        let numbers: Vec<u32> = gaps(&rows).iter().map(|(n, _)| *n).collect();
        assert_eq!(numbers, vec![3]);
    }

    #[test]
    fn styles_mark_single_focus_and_excluded() {
        let assigned = teams(&[4, 2]);
        let rows = run(&[m(1, at(1, 9, 0), &[9, 2, 4, 7])], Some(&assigned), &[9]);
        let row = rows[0].as_event().unwrap();

        assert_eq!(row.primary_team, Some(TeamNumber(2)));
        let styles: Vec<TeamStyle> = row.teams.iter().map(|t| t.style).collect();
        assert_eq!(
            styles,
            vec![
                TeamStyle::Excluded,
                TeamStyle::Focus,
                TeamStyle::Assigned,
                TeamStyle::Assigned,
            ]
        );
    }

    #[test]
    fn global_rows_have_no_focus() {
        let rows = run(&[m(1, at(1, 9, 0), &[1, 2, 3])], None, &[3]);
        let row = rows[0].as_event().unwrap();
        assert_eq!(row.primary_team, None);
        assert!(row.teams.iter().all(|t| t.style != TeamStyle::Focus));
        assert_eq!(row.teams[2].style, TeamStyle::Excluded);
    }

    #[test]
    fn milestone_emitted_once_after_completing_match() {
        let all = [1, 2, 3, 4, 5, 6, 7];
        let matches: Vec<Match> = (1..=10)
            .map(|n| {
                let minute = (n - 1) * 5;
                let teams: Vec<u32> = if n == 10 { all.to_vec() } else { vec![n.min(7)] };
                m(n, at(1, 9, minute), &teams)
            })
            .collect();
        let refs: Vec<&Match> = matches.iter().collect();
        let tracker = MilestoneTracker::new(teams(&all));

        let rows = annotate(
            &refs,
            &BTreeSet::new(),
            None,
            &TimelineConfig::default(),
            Some(tracker),
        );

        let positions: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.as_marker() == Some(Marker::AllTeamsObserved))
            .map(|(idx, _)| idx)
            .collect();
        assert_eq!(positions.len(), 1);
        let before = rows[positions[0] - 1].as_event().unwrap();
        assert_eq!(before.number, MatchNumber(7));
    }

    #[test]
    fn config_rejects_non_positive_thresholds() {
        let config = TimelineConfig {
            lunch_break_minutes: 0,
            gap_emphasis_minutes: 15,
        };
        assert_eq!(
            config.validate(),
            Err(TimelineConfigError::NotPositive {
                field: "lunch_break_minutes",
                value: 0
            })
        );

        let config = TimelineConfig {
            lunch_break_minutes: 60,
            gap_emphasis_minutes: -1,
        };
        assert!(config.validate().is_err());
        assert!(TimelineConfig::default().validate().is_ok());
    }

    #[test]
    fn config_rejects_thresholds_above_one_week() {
        let config = TimelineConfig {
            lunch_break_minutes: 200_000_000_000_000,
            gap_emphasis_minutes: 15,
        };
        assert_eq!(
            config.validate(),
            Err(TimelineConfigError::TooLarge {
                field: "lunch_break_minutes",
                value: 200_000_000_000_000,
                max: MAX_THRESHOLD_MINUTES,
            })
        );

        let config = TimelineConfig {
            lunch_break_minutes: 60,
            gap_emphasis_minutes: i64::MAX,
        };
        assert!(matches!(
            config.validate(),
            Err(TimelineConfigError::TooLarge {
                field: "gap_emphasis_minutes",
                ..
            })
        ));
    }

    #[test]
    fn largest_thresholds_annotate_without_overflow() {
        let config = TimelineConfig {
            lunch_break_minutes: MAX_THRESHOLD_MINUTES,
            gap_emphasis_minutes: MAX_THRESHOLD_MINUTES,
        };
        assert!(config.validate().is_ok());

        let matches = [m(1, at(1, 9, 0), &[1]), m(3, at(1, 11, 0), &[2])];
        let refs: Vec<&Match> = matches.iter().collect();
        let rows = annotate(&refs, &BTreeSet::new(), None, &config, None);
        assert_eq!(
            gaps(&rows)[1].1,
            Gap::Minutes {
                minutes: 120,
                emphasized: false
            }
        );
    }

    #[test]
    fn lunch_measured_from_first_skipped_match() {
        let assigned = teams(&[1]);
        let rows = run(
            &[
                m(1, at(1, 11, 0), &[1]),
                m(2, at(1, 11, 7), &[2]),
                m(3, at(1, 12, 2), &[1]),
            ],
            Some(&assigned),
            &[],
        );
        assert_eq!(
            gaps(&rows),
            vec![
                (1, Gap::Contiguous),
                (
                    3,
                    Gap::Minutes {
                        minutes: 55,
                        emphasized: true
                    }
                ),
            ]
        );
        assert!(markers(&rows).is_empty());

        let rows = run(
            &[
                m(1, at(1, 11, 0), &[1]),
                m(2, at(1, 11, 5), &[2]),
                m(3, at(1, 12, 5), &[1]),
            ],
            Some(&assigned),
            &[],
        );
        assert_eq!(gaps(&rows)[1], (3, Gap::LunchBreak));
        assert_eq!(markers(&rows), vec![Marker::LunchBreak]);
    }

    #[test]
    fn minutes_round_half_to_even() {
        assert_eq!(round_minutes(450), 8);
        assert_eq!(round_minutes(510), 8);
        assert_eq!(round_minutes(511), 9);
        assert_eq!(round_minutes(570), 10);
        assert_eq!(round_minutes(29), 0);

        let start = at(1, 9, 0);
        let rows = run(
            &[m(1, start, &[1]), m(3, start + Duration::seconds(510), &[2])],
            None,
            &[],
        );
        assert_eq!(
            gaps(&rows)[1].1,
            Gap::Minutes {
                minutes: 8,
                emphasized: false
            }
        );
    }

    #[test]
    fn repeated_primary_team_is_focus_once() {
        let assigned = teams(&[2]);
        let rows = run(&[m(1, at(1, 9, 0), &[2, 3, 2])], Some(&assigned), &[]);
        let styles: Vec<TeamStyle> = rows[0]
            .as_event()
            .unwrap()
            .teams
            .iter()
            .map(|t| t.style)
            .collect();
        assert_eq!(
            styles,
            vec![TeamStyle::Focus, TeamStyle::Assigned, TeamStyle::Assigned]
        );
    }

    #[test]
    fn gap_display_labels() {
        assert_eq!(Gap::Contiguous.to_string(), "N/A");
        assert_eq!(
            Gap::Minutes {
                minutes: 7,
                emphasized: false
            }
            .to_string(),
            "7 minutes"
        );
        assert_eq!(Gap::LunchBreak.to_string(), "Lunch Break");
        assert_eq!(Gap::Overnight.to_string(), "Overnight");
        assert_eq!(Marker::AllTeamsObserved.to_string(), "All Teams Observed");
    }
}
