//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`], [`validate`], or [`health`]. Each
//! handler lives in its own submodule.

pub mod health;
pub mod run;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::GhostError;

pub async fn dispatch(cli: Cli) -> Result<(), GhostError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(args).await,
        Some(Commands::Validate(ref args)) => validate::execute(args),
        Some(Commands::Health(args)) => health::execute(args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  ghost v{version} \u{2014} programmable HTTP stand-in server\n\n  \
         No command provided. To get started:\n\n    \
         ghost run                         Start on port 9999 with an empty registry\n    \
         ghost run -m mocks.json           Preload mocks from a file\n    \
         ghost validate mocks.json         Check a mock file\n    \
         ghost --help                      See all commands and options\n"
    );
}
