//! Command dispatch: bridges CLI args -> dashboard operations -> output.

pub mod config_cmd;
pub mod dashboard;
pub mod domains;
pub mod notify;
pub mod scan;
pub mod stats;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    resolved: Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Domains(args) => domains::handle(args, &resolved, global).await,
        Command::Stats(args) => stats::handle(&args, &resolved, global).await,
        Command::Dashboard(args) => dashboard::handle(args, &resolved, global).await,
        Command::Scan(args) => scan::handle(args, &resolved, global).await,
        Command::Notify(args) => notify::handle(args, &resolved, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
