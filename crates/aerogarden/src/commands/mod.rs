//! Command dispatch: bridges CLI args -> core Controller -> output formatting.

pub mod config_cmd;
pub mod gardens;
pub mod light;
pub mod login;
pub mod sensors;
pub mod util;
pub mod watch;

use aerogarden_core::Controller;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Gardens(args) => gardens::handle(controller, args, global).await,
        Command::Sensors(args) => sensors::handle(controller, args, global).await,
        Command::Light(args) => light::handle(controller, args, global).await,
        // Handled before dispatch
        Command::Login
        | Command::Watch(_)
        | Command::Config(_)
        | Command::Completions(_) => unreachable!(),
    }
}
