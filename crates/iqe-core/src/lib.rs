//! iqe core: transport-agnostic submission record, credit validation, and
//! the shared error type.
//!
//! This crate carries no HTTP or runtime dependencies. The exporter crate
//! owns the counters and the server; everything it needs to know about an
//! inbound record lives here.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `IqeError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{IqeError, Result};
