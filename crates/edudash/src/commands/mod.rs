//! Command handlers, one module per top-level command.

pub mod config_cmd;
pub mod login;
pub mod records;
pub mod stats;
pub mod util;

use edudash_core::RecordKind;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a backend command to its handler. `config` and `completions`
/// are handled in `main` since they never touch the network.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Login => login::handle(global).await,
        Command::Stats(args) => stats::handle(args, global).await,
        Command::Courses(args) => records::handle(RecordKind::Course, args, global).await,
        Command::Programs(args) => records::handle(RecordKind::Program, args, global).await,
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
