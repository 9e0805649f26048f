//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`] or [`health`]. Each handler lives in its
//! own submodule.

pub mod health;
pub mod run;

use crate::cli::{Cli, Commands};
use crate::error::RelayError;

pub async fn dispatch(cli: Cli) -> Result<(), RelayError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(*args).await,
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
        "\n  backend-relay v{version} \u{2014} HTTP relay to a backend origin\n\n  \
         No command provided. To get started:\n\n    \
         backend-relay run                            Relay /api/proxy/* to http://localhost:4000\n    \
         backend-relay run -b https://api.example.com Relay to a specific backend\n    \
         backend-relay --help                         See all commands and options\n"
    );
}
