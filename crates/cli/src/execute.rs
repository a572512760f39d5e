use crate::commands::Commands;
use reclaim_utils::cleanup::{Cleaner, CleanerConfig};
use std::time::Duration;

pub fn execute_command(command: Commands, sweep_interval: Option<u64>) -> eyre::Result<()> {
    match command {
        Commands::Managed {
            path,
            message,
            release_mode,
            abandon,
            wait_ms,
        } => {
            let mut config = CleanerConfig::from_env()?;
            if let Some(ms) = sweep_interval {
                config = config.with_sweep_interval(Duration::from_millis(ms));
            }
            let cleaner = Cleaner::start(config)?;

            let result = crate::commands::managed::execute(
                &cleaner,
                &path,
                &message,
                release_mode,
                abandon,
                Duration::from_millis(wait_ms),
            );

            cleaner.shutdown();
            result
        }
        Commands::Unmanaged {
            path,
            message,
            leak,
        } => crate::commands::unmanaged::execute(&path, &message, leak),
    }
}
