//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing, enums, and subcommand handlers.

mod args;
mod commands;
mod enums;

pub use args::{Args, Command, ConfigAction, GenerateArgs, RenderArgs, RevealArgs};
pub use commands::{
    ctrlc_received, handle_config_action, run, run_generate, run_render, run_reveal,
    setup_ctrlc_handler, CommandError,
};
pub use enums::{ColorArg, RampArg, RevealMode};
