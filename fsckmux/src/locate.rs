// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};

/// Directories searched before the inherited `PATH`.
const SEARCH_PREFIX: &str = "/sbin:/sbin/fs.d:/sbin/fs:/etc/fs:/etc";

/// Finds the executable that knows how to check a given filesystem type.
///
/// The search path is built once at construction; lookups read the
/// filesystem but never touch program state.
#[derive(Debug, Clone)]
pub struct Locator {
    path_list: String,
}

impl Locator {
    /// Fixed prefix plus whatever `PATH` the process inherited.
    pub fn new() -> Self {
        let path_list = match std::env::var("PATH") {
            Ok(p) if !p.is_empty() => format!("{SEARCH_PREFIX}:{p}"),
            _ => SEARCH_PREFIX.to_string(),
        };
        Self { path_list }
    }

    /// Search only the given colon-separated list.
    pub fn with_path(path_list: impl Into<String>) -> Self {
        Self {
            path_list: path_list.into(),
        }
    }

    /// The program name for a filesystem type: `fsck.<type>`, unless the
    /// type already carries the prefix.
    pub fn checker_name(fstype: &str) -> String {
        if fstype.starts_with("fsck.") {
            fstype.to_string()
        } else {
            format!("fsck.{fstype}")
        }
    }

    /// First executable named `fsck.<type>` in path order, if any.
    pub fn find(&self, fstype: &str) -> Option<PathBuf> {
        which::which_in(Self::checker_name(fstype), Some(&self.path_list), Path::new("/")).ok()
    }
}

impl Default for Locator {
    fn default() -> Self {
        Self::new()
    }
}
