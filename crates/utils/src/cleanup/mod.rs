//! Deferred cleanup of resources whose owners have gone away
//!
//! A [`Cleaner`] associates an owner (any `Arc<T>`) with a cleanup action.
//! The registry only holds a `Weak` to the owner, so registering never keeps
//! it alive. Once the last strong reference is dropped the entry becomes
//! eligible and the next sweep runs the action, either on the sweeper thread
//! started by [`Cleaner::start`] or on whoever calls [`Cleaner::run_pending`].
//!
//! The [`Cleanable`] returned by registration runs the action early on the
//! calling thread and removes it from the registry, so each action runs at
//! most once no matter which path gets to it first.
//!
//! ## Sub-modules
//!
//! - [`config`] - sweep interval and thread naming
//! - [`metrics`] - counters exposed through [`Cleaner::stats`]
//! - `registry` - the id-keyed table of pending actions
//!
//! ## Example
//!
//! ```rust
//! use reclaim_utils::cleanup::{Cleaner, CleanerConfig};
//! use std::sync::Arc;
//!
//! let cleaner = Cleaner::new(CleanerConfig::default());
//! let owner = Arc::new("buffer");
//! let cleanable = cleaner.register(&owner, "buffer", || Ok(()));
//!
//! drop(owner);
//! assert_eq!(cleaner.run_pending(), 1);
//! assert!(cleanable.is_cleaned());
//! ```

mod cleaner;
pub mod config;
pub mod metrics;
mod registry;

pub use cleaner::{Cleanable, Cleaner};
pub use config::CleanerConfig;
pub use metrics::CleanerStats;
