use clap::Subcommand;
use reclaim_core::{DEFAULT_MANAGED_PATH, DEFAULT_UNMANAGED_PATH};
use reclaim_resource::ReleaseMode;
use std::path::PathBuf;

pub mod managed;
pub mod unmanaged;

#[derive(Subcommand)]
pub enum Commands {
    /// Write through a resource whose release is backed by the cleaner
    #[command(visible_alias = "m")]
    Managed {
        /// File to write
        #[arg(short, long, default_value = DEFAULT_MANAGED_PATH)]
        path: PathBuf,

        /// Text to write
        #[arg(short, long, default_value = "Hello, Cleaner!\n")]
        message: String,

        /// Release at scope exit (on-drop) or leave it to the cleaner (deferred)
        #[arg(long, value_name = "MODE")]
        release_mode: Option<ReleaseMode>,

        /// Drop the resource without releasing it
        #[arg(long)]
        abandon: bool,

        /// How long to wait for the cleaner after abandoning, in milliseconds
        #[arg(long, value_name = "MS", default_value_t = 1000)]
        wait_ms: u64,
    },

    /// Write through a resource that must be closed by hand
    #[command(visible_alias = "u")]
    Unmanaged {
        /// File to write
        #[arg(short, long, default_value = DEFAULT_UNMANAGED_PATH)]
        path: PathBuf,

        /// Text to write
        #[arg(short, long, default_value = "Hello, manual close!\n")]
        message: String,

        /// Skip the close and leak the handle
        #[arg(long)]
        leak: bool,
    },
}
