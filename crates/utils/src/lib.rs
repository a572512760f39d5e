//! Shared utilities for reclaim
//!
//! The centrepiece is [`cleanup::Cleaner`], the deferred-cleanup facility
//! that runs a registered action once its owner has become unreachable.
//! [`tracing`] holds the subscriber setup used by the binary.

pub mod cleanup;
pub mod tracing;

pub use cleanup::*;
