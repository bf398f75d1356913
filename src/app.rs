use anyhow::Result;

use crate::cli::{parse_cli_args, usage_text, version_text, CliCommand};
use crate::command_handlers::{handle_interfaces, handle_watch};

/// Run the app by parsing CLI-style args and dispatching the command.
pub async fn run<I, S>(args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let command = parse_cli_args(args)?;
    execute_command(command).await
}

/// Execute a pre-parsed command.
pub(crate) async fn execute_command(command: CliCommand) -> Result<()> {
    match command {
        CliCommand::Help => {
            println!("{}", usage_text());
            Ok(())
        }
        CliCommand::Version => {
            println!("{}", version_text());
            Ok(())
        }
        CliCommand::Interfaces => handle_interfaces().await,
        CliCommand::Watch { interval, json } => handle_watch(interval, json).await,
    }
}
