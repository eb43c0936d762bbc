//! Coverage assignment of scouting members to teams.
//!
//! # Algorithm Summary
//!
//! 1. Discover assignable teams: every non-excluded team in match input
//!    order, first-seen wins.
//! 2. Team coverage: each team draws members from a cyclic roster cursor
//!    until it has `min_members_per_team` distinct members. The cursor is
//!    shared by all teams and never reset.
//! 3. Member coverage: each member draws teams from a cyclic team cursor
//!    until it has `min_teams_per_member` distinct teams. Again one cursor
//!    for all members.
//! 4. Purge: excluded teams are stripped from every member. Members that
//!    drop below the minimum are topped up again from the team cursor.
//!
//! The engine has no randomness; identical inputs give identical mappings.

use std::collections::{BTreeSet, HashMap, HashSet};

use thiserror::Error;

use crate::schedule::Schedule;
use crate::types::{MemberName, TeamNumber};

/// Minimum coverage requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageConfig {
    /// Every member scouts at least this many teams.
    /// Default: 4.
    pub min_teams_per_member: usize,

    /// Every assignable team is scouted by at least this many members.
    /// Default: 2.
    pub min_members_per_team: usize,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            min_teams_per_member: 4,
            min_members_per_team: 2,
        }
    }
}

/// Configuration errors detected before any assignment is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    /// Teams need members but the roster is empty.
    #[error("member roster is empty but {teams} teams need coverage")]
    EmptyRoster { teams: usize },

    /// Members need teams but every team is excluded or the schedule is empty.
    #[error("no assignable teams but each member needs {required}")]
    NoAssignableTeams { required: usize },

    /// Each team needs more distinct members than the roster has.
    #[error("each team needs {required} members but the roster only has {available}")]
    NotEnoughMembers { required: usize, available: usize },

    /// Each member needs more distinct teams than are assignable.
    #[error("each member needs {required} teams but only {available} are assignable")]
    NotEnoughTeams { required: usize, available: usize },

    /// The same name appears twice in the roster.
    #[error("duplicate member {name} in roster")]
    DuplicateMember { name: MemberName },
}

/// A discrete step reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentEvent<'a> {
    /// A team reached its member quota.
    TeamCovered {
        team: TeamNumber,
        members: &'a [MemberName],
    },
    /// A member reached its team quota.
    MemberCovered {
        member: &'a MemberName,
        teams: &'a [TeamNumber],
    },
    /// An excluded team was removed from a member.
    ExcludedPurged {
        member: &'a MemberName,
        team: TeamNumber,
    },
}

impl AssignmentEvent<'_> {
    /// Stable event name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TeamCovered { .. } => "team_covered",
            Self::MemberCovered { .. } => "member_covered",
            Self::ExcludedPurged { .. } => "excluded_purged",
        }
    }
}

/// Receives engine events as they happen.
pub trait AssignmentSink {
    fn record(&mut self, event: &AssignmentEvent<'_>);
}

/// Discards every event.
impl AssignmentSink for () {
    fn record(&mut self, _event: &AssignmentEvent<'_>) {}
}

/// Forwards engine events to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl AssignmentSink for TracingSink {
    fn record(&mut self, event: &AssignmentEvent<'_>) {
        match event {
            AssignmentEvent::TeamCovered { team, members } => {
                tracing::debug!(event = event.name(), %team, ?members);
            }
            AssignmentEvent::MemberCovered { member, teams } => {
                tracing::debug!(event = event.name(), %member, ?teams);
            }
            AssignmentEvent::ExcludedPurged { member, team } => {
                tracing::debug!(event = event.name(), %member, %team);
            }
        }
    }
}

/// Bidirectional member/team mapping.
///
/// Both views preserve insertion order and stay symmetric: a team is in a
/// member's list exactly when the member is in that team's list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    members: Vec<MemberName>,
    member_index: HashMap<MemberName, usize>,
    member_teams: Vec<Vec<TeamNumber>>,
    teams: Vec<TeamNumber>,
    team_members: HashMap<TeamNumber, Vec<MemberName>>,
    excluded: BTreeSet<TeamNumber>,
}

impl Assignment {
    fn empty(
        roster: &[MemberName],
        teams: Vec<TeamNumber>,
        excluded: BTreeSet<TeamNumber>,
    ) -> Self {
        let member_index = roster
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();
        let team_members = teams.iter().map(|team| (*team, Vec::new())).collect();
        Self {
            members: roster.to_vec(),
            member_index,
            member_teams: vec![Vec::new(); roster.len()],
            teams,
            team_members,
            excluded,
        }
    }

    /// Links a member and a team in both views. Returns false if already linked.
    fn link(&mut self, member_idx: usize, team: TeamNumber) -> bool {
        let teams = &mut self.member_teams[member_idx];
        if teams.contains(&team) {
            return false;
        }
        teams.push(team);
        self.team_members
            .entry(team)
            .or_default()
            .push(self.members[member_idx].clone());
        true
    }

    /// Members in roster order.
    pub fn members(&self) -> &[MemberName] {
        &self.members
    }

    /// Assignable teams in discovery order.
    pub fn teams(&self) -> &[TeamNumber] {
        &self.teams
    }

    /// Teams excluded from assignment.
    pub const fn excluded(&self) -> &BTreeSet<TeamNumber> {
        &self.excluded
    }

    pub fn is_excluded(&self, team: TeamNumber) -> bool {
        self.excluded.contains(&team)
    }

    /// Teams assigned to `member`, in assignment order. Empty for unknown members.
    pub fn teams_for(&self, member: &MemberName) -> &[TeamNumber] {
        self.member_index
            .get(member)
            .map_or(&[], |idx| self.member_teams[*idx].as_slice())
    }

    /// Members covering `team`, in assignment order. Empty for unknown teams.
    pub fn members_for(&self, team: TeamNumber) -> &[MemberName] {
        self.team_members.get(&team).map_or(&[], Vec::as_slice)
    }

    /// The member→teams view in roster order.
    pub fn by_member(&self) -> impl Iterator<Item = (&MemberName, &[TeamNumber])> {
        self.members
            .iter()
            .zip(self.member_teams.iter().map(Vec::as_slice))
    }

    /// The team→members view in discovery order.
    pub fn by_team(&self) -> impl Iterator<Item = (TeamNumber, &[MemberName])> {
        self.teams.iter().map(|team| (*team, self.members_for(*team)))
    }
}

/// Assigns members to teams, reporting progress to `TracingSink`.
pub fn assign_coverage(
    schedule: &Schedule,
    roster: &[MemberName],
    config: &CoverageConfig,
    excluded: &BTreeSet<TeamNumber>,
) -> Result<Assignment, AssignmentError> {
    assign_coverage_with(schedule, roster, config, excluded, &mut TracingSink)
}

/// Assigns members to teams, reporting progress to `sink`.
pub fn assign_coverage_with<S: AssignmentSink + ?Sized>(
    schedule: &Schedule,
    roster: &[MemberName],
    config: &CoverageConfig,
    excluded: &BTreeSet<TeamNumber>,
    sink: &mut S,
) -> Result<Assignment, AssignmentError> {
    let teams = discover_teams(schedule, excluded);
    validate(roster, &teams, config)?;

    let mut assignment = Assignment::empty(roster, teams, excluded.clone());

    cover_teams(&mut assignment, config.min_members_per_team, sink);

    let mut team_cursor = 0;
    for idx in 0..assignment.members.len() {
        fill_member(
            &mut assignment,
            idx,
            config.min_teams_per_member,
            &mut team_cursor,
            sink,
        );
    }

    let purged = purge_excluded(&mut assignment, sink);
    for idx in purged {
        fill_member(
            &mut assignment,
            idx,
            config.min_teams_per_member,
            &mut team_cursor,
            sink,
        );
    }

    Ok(assignment)
}

/// Non-excluded teams in first-seen match order.
fn discover_teams(schedule: &Schedule, excluded: &BTreeSet<TeamNumber>) -> Vec<TeamNumber> {
    schedule
        .teams()
        .into_iter()
        .filter(|team| !excluded.contains(team))
        .collect()
}

fn validate(
    roster: &[MemberName],
    teams: &[TeamNumber],
    config: &CoverageConfig,
) -> Result<(), AssignmentError> {
    let mut seen = HashSet::with_capacity(roster.len());
    if let Some(dup) = roster.iter().find(|name| !seen.insert(*name)) {
        return Err(AssignmentError::DuplicateMember { name: dup.clone() });
    }

    if !teams.is_empty() && config.min_members_per_team > 0 {
        if roster.is_empty() {
            return Err(AssignmentError::EmptyRoster { teams: teams.len() });
        }
        if config.min_members_per_team > roster.len() {
            return Err(AssignmentError::NotEnoughMembers {
                required: config.min_members_per_team,
                available: roster.len(),
            });
        }
    }

    if !roster.is_empty() && config.min_teams_per_member > 0 {
        if teams.is_empty() {
            return Err(AssignmentError::NoAssignableTeams {
                required: config.min_teams_per_member,
            });
        }
        if config.min_teams_per_member > teams.len() {
            return Err(AssignmentError::NotEnoughTeams {
                required: config.min_teams_per_member,
                available: teams.len(),
            });
        }
    }

    Ok(())
}

/// Phase A: give every team its member quota from the shared roster cursor.
fn cover_teams<S: AssignmentSink + ?Sized>(
    assignment: &mut Assignment,
    min_members: usize,
    sink: &mut S,
) {
    let roster_len = assignment.members.len();
    let mut member_cursor = 0;

    for team_idx in 0..assignment.teams.len() {
        let team = assignment.teams[team_idx];
        while assignment.members_for(team).len() < min_members {
            let member_idx = member_cursor;
            member_cursor = (member_cursor + 1) % roster_len;
            assignment.link(member_idx, team);
        }
        sink.record(&AssignmentEvent::TeamCovered {
            team,
            members: assignment.members_for(team),
        });
    }
}

/// Phase B step: top up one member from the shared team cursor.
fn fill_member<S: AssignmentSink + ?Sized>(
    assignment: &mut Assignment,
    member_idx: usize,
    min_teams: usize,
    team_cursor: &mut usize,
    sink: &mut S,
) {
    let team_count = assignment.teams.len();
    while assignment.member_teams[member_idx].len() < min_teams {
        let team = assignment.teams[*team_cursor];
        *team_cursor = (*team_cursor + 1) % team_count;
        assignment.link(member_idx, team);
    }
    sink.record(&AssignmentEvent::MemberCovered {
        member: &assignment.members[member_idx],
        teams: &assignment.member_teams[member_idx],
    });
}

/// Strips excluded teams from both views. Returns the affected member indices.
fn purge_excluded<S: AssignmentSink + ?Sized>(
    assignment: &mut Assignment,
    sink: &mut S,
) -> Vec<usize> {
    let mut affected = Vec::new();

    for idx in 0..assignment.members.len() {
        let (kept, removed): (Vec<_>, Vec<_>) = assignment.member_teams[idx]
            .iter()
            .copied()
            .partition(|team| !assignment.excluded.contains(team));
        if removed.is_empty() {
            continue;
        }
        assignment.member_teams[idx] = kept;
        for team in removed {
            sink.record(&AssignmentEvent::ExcludedPurged {
                member: &assignment.members[idx],
                team,
            });
        }
        affected.push(idx);
    }

    let excluded = &assignment.excluded;
    assignment
        .team_members
        .retain(|team, _| !excluded.contains(team));
    assignment.teams.retain(|team| !excluded.contains(team));

    affected
}
