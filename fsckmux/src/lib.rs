// SPDX-License-Identifier: MIT

//! Parallel fsck front-end: runs the per-type checker program against every
//! eligible filesystem, as concurrently as is safe. Two checks never run at
//! the same time against the same physical spindle, pass N fully drains
//! before pass N+1 starts, and root is checked alone and first.

pub mod device;
pub mod filter;
pub mod launch;
pub mod locate;
pub mod registry;
pub mod scheduler;
pub mod status;
pub mod utils;
