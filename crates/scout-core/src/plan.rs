//! Full scouting plan: assignment plus every timeline.

use std::collections::BTreeSet;

use rayon::prelude::*;
use thiserror::Error;

use crate::assignment::{Assignment, AssignmentError, CoverageConfig, assign_coverage};
use crate::schedule::Schedule;
use crate::timeline::{
    TimelineConfig, TimelineConfigError, TimelineRow, global_timeline, member_timeline,
};
use crate::types::{MemberName, TeamNumber};

/// Static configuration for one planning run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanConfig {
    pub coverage: CoverageConfig,
    pub timeline: TimelineConfig,
    /// Teams that never receive an assignment.
    pub excluded: BTreeSet<TeamNumber>,
}

/// Configuration errors that abort a run before any timeline is built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error(transparent)]
    Timeline(#[from] TimelineConfigError),

    #[error(transparent)]
    Assignment(#[from] AssignmentError),
}

/// One member's annotated schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberTimeline {
    pub member: MemberName,
    pub teams: Vec<TeamNumber>,
    pub rows: Vec<TimelineRow>,
}

/// Everything a report needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub assignment: Assignment,
    pub overall: Vec<TimelineRow>,
    /// Per-member timelines in roster order.
    pub members: Vec<MemberTimeline>,
}

/// Builds the assignment, the global timeline and one timeline per member.
///
/// Member timelines are independent and built in parallel; output order
/// follows the roster.
pub fn build_plan(
    schedule: &Schedule,
    roster: &[MemberName],
    config: &PlanConfig,
) -> Result<Plan, PlanError> {
    config.timeline.validate()?;
    let assignment = assign_coverage(schedule, roster, &config.coverage, &config.excluded)?;

    let overall = global_timeline(schedule, &assignment, &config.timeline);
    let members: Vec<MemberTimeline> = assignment
        .members()
        .par_iter()
        .map(|member| MemberTimeline {
            member: member.clone(),
            teams: assignment.teams_for(member).to_vec(),
            rows: member_timeline(schedule, &assignment, member, &config.timeline),
        })
        .collect();

    tracing::info!(
        matches = schedule.len(),
        members = members.len(),
        teams = assignment.teams().len(),
        "built scouting plan"
    );

    Ok(Plan {
        assignment,
        overall,
        members,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::RawMatch;
    use crate::timeline::{Gap, Marker};

    fn schedule() -> Schedule {
        let raw = [
            (1, "2024-03-01T09:00:00", vec![1, 2, 3]),
            (2, "2024-03-01T09:07:00", vec![4, 5, 6]),
            (3, "2024-03-01T13:00:00", vec![1, 4, 6]),
            (4, "2024-03-02T09:00:00", vec![2, 3, 5]),
        ]
        .into_iter()
        .map(|(number, start_time, teams)| RawMatch {
            number,
            start_time: start_time.to_string(),
            teams,
        })
        .collect::<Vec<_>>();
        Schedule::from_raw(&raw).unwrap()
    }

    fn roster() -> Vec<MemberName> {
        ["Alex Carter", "Jordan Smith", "Taylor Johnson"]
            .into_iter()
            .map(|n| MemberName::new(n).unwrap())
            .collect()
    }

    fn config() -> PlanConfig {
        PlanConfig {
            coverage: CoverageConfig {
                min_teams_per_member: 2,
                min_members_per_team: 2,
            },
            timeline: TimelineConfig::default(),
            excluded: [TeamNumber(6)].into_iter().collect(),
        }
    }

    #[test]
    fn builds_every_timeline() {
        let plan = build_plan(&schedule(), &roster(), &config()).unwrap();

        assert_eq!(plan.members.len(), 3);
        for (timeline, member) in plan.members.iter().zip(roster()) {
            assert_eq!(timeline.member, member);
            assert!(timeline.teams.len() >= 2);
            assert!(!timeline.teams.contains(&TeamNumber(6)));
        }

        let markers: Vec<Marker> = plan
            .overall
            .iter()
            .filter_map(TimelineRow::as_marker)
            .collect();
        assert_eq!(
            markers,
            vec![Marker::AllTeamsObserved, Marker::LunchBreak, Marker::Overnight]
        );
    }

    #[test]
    fn member_rows_only_cover_assigned_teams() {
        let plan = build_plan(&schedule(), &roster(), &config()).unwrap();

        for timeline in &plan.members {
            for row in timeline.rows.iter().filter_map(TimelineRow::as_event) {
                let primary = row.primary_team.unwrap();
                assert!(timeline.teams.contains(&primary));
            }
        }
    }

    #[test]
    fn overnight_gap_in_overall_timeline() {
        let plan = build_plan(&schedule(), &roster(), &config()).unwrap();
        let last = plan.overall.last().and_then(TimelineRow::as_event).unwrap();
        assert_eq!(last.gap, Gap::Overnight);
    }

    #[test]
    fn is_deterministic() {
        let first = build_plan(&schedule(), &roster(), &config()).unwrap();
        let second = build_plan(&schedule(), &roster(), &config()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_thresholds_abort_before_assignment() {
        let mut config = config();
        config.timeline.gap_emphasis_minutes = 0;
        let err = build_plan(&schedule(), &[], &config).unwrap_err();
        assert!(matches!(err, PlanError::Timeline(_)));
    }

    #[test]
    fn empty_roster_is_a_configuration_error() {
        let err = build_plan(&schedule(), &[], &config()).unwrap_err();
        assert_eq!(
            err,
            PlanError::Assignment(AssignmentError::EmptyRoster { teams: 5 })
        );
    }
}
