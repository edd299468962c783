// SPDX-License-Identifier: MIT

//! In-memory model of the mount table consumed by fsckmux.
//!
//! One [`FsEntry`] per fstab line; the orchestrator owns the entries for
//! the duration of a run and flips `done` as checks are dispatched or
//! deliberately skipped.

mod error;
mod table;

pub use error::TabError;
pub use table::{FsEntry, Table, Warning};
