//! CLI library components for tabex.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod source;
