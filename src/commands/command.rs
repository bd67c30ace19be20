//! Command trait definition for CLI commands.
//!
//! Subcommands implement [`Command`]; `enum_dispatch` routes the parsed subcommand to it.

use anyhow::Result;
use enum_dispatch::enum_dispatch;

/// Trait implemented by all bam2fq CLI commands.
///
/// `command_line` is the full invocation as typed by the user.
#[enum_dispatch]
pub trait Command {
    #[allow(clippy::missing_errors_doc)]
    fn execute(&self, command_line: &str) -> Result<()>;
}
