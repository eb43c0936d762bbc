//! One-time "every team has been seen" detection.

use std::collections::HashSet;

use crate::schedule::Match;
use crate::types::TeamNumber;

/// Tracks cumulative team appearances over a chronological scan.
///
/// Fires at most once: on the first match after which every team in the
/// full set has appeared at least once.
#[derive(Debug, Clone)]
pub struct MilestoneTracker {
    all_teams: HashSet<TeamNumber>,
    encountered: HashSet<TeamNumber>,
    emitted: bool,
}

impl MilestoneTracker {
    /// Creates a tracker for the given full team set.
    pub fn new(all_teams: impl IntoIterator<Item = TeamNumber>) -> Self {
        Self {
            all_teams: all_teams.into_iter().collect(),
            encountered: HashSet::new(),
            emitted: false,
        }
    }

    /// Records a match. Returns true if the milestone fires right after it.
    pub fn observe(&mut self, m: &Match) -> bool {
        if self.emitted {
            return false;
        }
        self.encountered.extend(m.teams.iter().copied());
        if self.all_teams.is_subset(&self.encountered) {
            self.emitted = true;
            return true;
        }
        false
    }

    /// Whether the milestone has already fired.
    pub const fn emitted(&self) -> bool {
        self.emitted
    }
}
