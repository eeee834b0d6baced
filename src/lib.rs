pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod models;
pub mod sensor;

use cli::output::print_error;
use config::{OutputMode, RuntimeConfig};
use error::AppError;

pub async fn run(cli_args: cli::Cli) -> i32 {
    let config = RuntimeConfig {
        output_mode: if cli_args.table {
            OutputMode::Table
        } else {
            OutputMode::Json
        },
        verbose: cli_args.verbose,
    };

    let result = dispatch(cli_args.command, &config).await;

    match result {
        Ok(()) => 0,
        Err(err) => {
            print_error(&err);
            err.exit_code()
        }
    }
}

async fn dispatch(command: cli::Commands, config: &RuntimeConfig) -> Result<(), AppError> {
    match command {
        cli::Commands::Setup => cli::setup::handle_setup(config).await,
        cli::Commands::Status => cli::setup::handle_status(config).await,
        cli::Commands::Clear => cli::setup::handle_clear(config).await,
        cli::Commands::Test => cli::setup::handle_test(config).await,
        cli::Commands::Balance => cli::query::handle_balance(config).await,
        cli::Commands::Bill => cli::query::handle_bill(config).await,
        cli::Commands::Sensors => cli::sensors::handle(config).await,
        cli::Commands::Watch { interval_hours } => cli::watch::handle(interval_hours, config).await,
    }
}
