mod cli;
mod context;
mod handlers;
mod output;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use context::CliContext;

fn init_tracing() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("PLANNER_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::WARN)
            .init();
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "planner", &mut std::io::stdout());
        return Ok(());
    }

    let ctx = CliContext::load(&cli)?;

    match cli.command {
        Commands::Config(cmd) => handlers::config::handle(&ctx, cmd.action).await?,
        Commands::Route(cmd) => handlers::route::handle(&ctx, cmd.action).await?,
        Commands::Nav(cmd) => handlers::nav::handle(&ctx, cmd.action).await?,
        Commands::Show { completed, reveal } => {
            handlers::view::handle_show(&ctx, completed, reveal).await?
        }
        Commands::Edit => handlers::view::handle_edit(&ctx).await?,
        Commands::ServerInfo => handlers::server::handle_server_info(&ctx).await?,
        Commands::Version(cmd) => handlers::server::handle_version(&ctx, cmd.action).await?,
        Commands::Pomodoro(cmd) => handlers::server::handle_pomodoro(&ctx, cmd.action).await?,
        Commands::Statistics { kind, detailed } => {
            handlers::server::handle_statistics(&ctx, kind, detailed).await?
        }
        Commands::Completions { .. } => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        output::output_error(&format!("{:#}", e));
    }
    Ok(())
}
