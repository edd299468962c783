// SPDX-License-Identifier: MIT

use fscktab::FsEntry;

use crate::locate::Locator;

/// Types that are never checked, whatever the table says.
const IGNORED_TYPES: &[&str] = &[
    "ignore", "iso9660", "nfs", "proc", "sw", "swap", "tmpfs", "devpts", "sysfs",
];

/// Types whose missing checker is worth a warning rather than silence.
const REALLY_WANTED: &[&str] = &["minix", "ext2", "ext3", "ext4", "xiafs"];

/// A `-t` expression: a comma-separated positive list of types, or a
/// negative one when the expression starts with `no` (e.g. `noext2,vfat`
/// excludes both).
#[derive(Debug, Clone)]
pub struct TypeFilter {
    types: Vec<String>,
    negate: bool,
}

impl TypeFilter {
    pub fn parse(expr: &str) -> Self {
        let negate = expr.starts_with("no");
        let types = expr
            .split(',')
            .filter(|t| !t.is_empty())
            .map(|t| t.strip_prefix("no").unwrap_or(t).to_string())
            .collect();
        Self { types, negate }
    }

    pub fn matches(&self, fstype: &str) -> bool {
        let listed = self.types.iter().any(|t| t == fstype);
        listed != self.negate
    }
}

/// Outcome of the eligibility decision for one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Check,
    /// Not eligible; mark done, fold nothing.
    Skip,
    /// Eligible but no checker program exists; mark done and fold an
    /// operational-error bit.
    NoChecker,
}

#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    pub type_filter: Option<TypeFilter>,
}

impl FilterConfig {
    pub fn new(type_filter: Option<TypeFilter>) -> Self {
        Self { type_filter }
    }

    /// Decision order, first match wins: explicit pass 0, type filter,
    /// `noauto` option, fixed deny-list, missing checker.
    pub fn verdict(&self, entry: &FsEntry, locator: &Locator) -> Verdict {
        if entry.passno == 0 {
            return Verdict::Skip;
        }
        if let Some(filter) = &self.type_filter
            && !filter.matches(&entry.fstype)
        {
            return Verdict::Skip;
        }
        if entry.has_option("noauto") {
            return Verdict::Skip;
        }
        if IGNORED_TYPES.contains(&entry.fstype.as_str()) {
            return Verdict::Skip;
        }
        if locator.find(&entry.fstype).is_none() {
            let prog = Locator::checker_name(&entry.fstype);
            if REALLY_WANTED.contains(&entry.fstype.as_str()) {
                crate::log_warn!("cannot check {}: {} not found", entry.device, prog);
            } else {
                crate::log_info!("cannot check {}: {} not found", entry.device, prog);
            }
            return Verdict::NoChecker;
        }
        Verdict::Check
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(fstype: &str, options: &str, passno: u32) -> FsEntry {
        FsEntry::new("/dev/sda1", "/", fstype, options, passno)
    }

    #[cfg(unix)]
    fn locator_with(types: &[&str]) -> (tempfile::TempDir, Locator) {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        for t in types {
            let path = dir.path().join(format!("fsck.{t}"));
            std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
        let loc = Locator::with_path(dir.path().to_str().unwrap());
        (dir, loc)
    }

    #[test]
    fn type_filter_positive() {
        let f = TypeFilter::parse("ext2,vfat");
        assert!(f.matches("ext2"));
        assert!(f.matches("vfat"));
        assert!(!f.matches("xfs"));
    }

    #[test]
    fn type_filter_negative() {
        let f = TypeFilter::parse("noext2,vfat");
        assert!(!f.matches("ext2"));
        assert!(!f.matches("vfat"));
        assert!(f.matches("xfs"));
    }

    #[cfg(unix)]
    #[test]
    fn pass_zero_always_skips() {
        let (_dir, loc) = locator_with(&["ext2"]);
        let cfg = FilterConfig::default();
        assert_eq!(cfg.verdict(&entry("ext2", "defaults", 0), &loc), Verdict::Skip);
    }

    #[cfg(unix)]
    #[test]
    fn type_filter_applies() {
        let (_dir, loc) = locator_with(&["ext2", "vfat"]);
        let cfg = FilterConfig::new(Some(TypeFilter::parse("vfat")));
        assert_eq!(cfg.verdict(&entry("ext2", "defaults", 1), &loc), Verdict::Skip);
        assert_eq!(cfg.verdict(&entry("vfat", "defaults", 1), &loc), Verdict::Check);
    }

    #[cfg(unix)]
    #[test]
    fn noauto_skips() {
        let (_dir, loc) = locator_with(&["ext2"]);
        let cfg = FilterConfig::default();
        assert_eq!(
            cfg.verdict(&entry("ext2", "rw,noauto", 1), &loc),
            Verdict::Skip
        );
    }

    #[cfg(unix)]
    #[test]
    fn deny_list_skips_even_with_checker() {
        let (_dir, loc) = locator_with(&["swap"]);
        let cfg = FilterConfig::default();
        assert_eq!(cfg.verdict(&entry("swap", "sw", 1), &loc), Verdict::Skip);
    }

    #[test]
    fn missing_checker_is_flagged() {
        let dir = tempfile::tempdir().unwrap();
        let loc = Locator::with_path(dir.path().to_str().unwrap());
        let cfg = FilterConfig::default();
        assert_eq!(
            cfg.verdict(&entry("xfs", "defaults", 1), &loc),
            Verdict::NoChecker
        );
    }

    #[cfg(unix)]
    #[test]
    fn eligible_entry_checks() {
        let (_dir, loc) = locator_with(&["ext2"]);
        let cfg = FilterConfig::default();
        assert_eq!(cfg.verdict(&entry("ext2", "defaults", 2), &loc), Verdict::Check);
    }
}
