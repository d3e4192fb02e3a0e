// CLI module for tagsweep
//
// Argument parsing, command implementations and terminal output for the
// tagsweep binary. The library itself never touches the terminal.

pub mod commands;
pub mod config;
pub mod output;

pub use config::{Commands, Config};
pub use output::OutputFormatter;
