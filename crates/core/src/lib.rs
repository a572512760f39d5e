//! Core error type and constants for the `reclaim` workspace.
//!
//! ## Key Components
//!
//! - **`errors`**: the `Error` enum and `Result` alias shared by every crate.
//!   `Error::FileSystem` and `Error::Closed` together form the IOFailure kind
//!   surfaced by explicit resource operations; `Error::Cleanup` is only ever
//!   logged from the automatic cleanup path.
//! - **`constants`**: environment variable names and defaults.

pub mod constants;
pub mod errors;

pub use self::{
    constants::*,
    errors::{Error, Result, ResultExt},
};
