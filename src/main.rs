//! voice-notes CLI entry point

use std::process::ExitCode;

use clap::Parser;

use voice_notes::cli::{
    app::{cli_config, init_tracing, load_merged_config, run_list, run_screen, EXIT_ERROR},
    args::{Cli, Commands, ConfigAction},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use voice_notes::infrastructure::XdgConfigStore;

async fn run_config(action: ConfigAction) -> ExitCode {
    let presenter = Presenter::new();
    let store = XdgConfigStore::new();
    if let Err(e) = handle_config_command(action, &store, &presenter).await {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }
    ExitCode::SUCCESS
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config { action }) => run_config(action).await,
        Some(Commands::List { query }) => {
            let config = load_merged_config(cli_config(cli.data_dir)).await;
            run_list(config, query).await
        }
        None => {
            let config = load_merged_config(cli_config(cli.data_dir)).await;
            run_screen(config).await
        }
    }
}
