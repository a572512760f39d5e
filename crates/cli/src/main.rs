use clap::Parser;

mod commands;
mod execute;

use commands::Commands;

#[derive(Parser)]
#[command(name = "reclaim")]
#[command(about = "Deterministic vs. deferred release of a file handle", long_about = None)]
#[command(version)]
struct Cli {
    /// Sweep interval of the cleaner thread in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    sweep_interval: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    if let Err(e) = reclaim_utils::tracing::init() {
        eprintln!("Failed to initialize tracing: {e}");
    }

    let cli = Cli::parse();
    execute::execute_command(cli.command, cli.sweep_interval)
}
