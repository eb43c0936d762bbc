//! CLI subcommand implementations.

pub mod assignments;
pub mod fetch;
pub mod plan;
pub mod util;
