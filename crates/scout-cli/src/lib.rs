//! Scouting planner CLI library.
//!
//! This crate provides the CLI interface for the scouting planner.

pub mod cache;
mod cli;
pub mod commands;
mod config;
pub mod render;

pub use cli::{Cli, Commands};
pub use config::Config;
