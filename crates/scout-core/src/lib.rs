//! Core domain logic for the scouting planner.
//!
//! This crate contains the fundamental types and logic for:
//! - Schedule: validating matches delivered by an event source
//! - Assignment: distributing teams to scouting members under minimum coverage
//! - Timeline: classifying gaps and inserting break and milestone markers

mod assignment;
mod milestone;
mod plan;
pub mod schedule;
mod timeline;
pub mod types;

pub use assignment::{
    Assignment, AssignmentError, AssignmentEvent, AssignmentSink, CoverageConfig, TracingSink,
    assign_coverage, assign_coverage_with,
};
pub use milestone::MilestoneTracker;
pub use plan::{MemberTimeline, Plan, PlanConfig, PlanError, build_plan};
pub use schedule::{Match, RawMatch, Schedule, ScheduleError};
pub use timeline::{
    EventRow, Gap, MAX_THRESHOLD_MINUTES, Marker, StyledTeam, TeamStyle, TimelineConfig,
    TimelineConfigError, TimelineRow, global_timeline, member_timeline,
};
pub use types::{MatchNumber, MemberName, TeamNumber, ValidationError};
