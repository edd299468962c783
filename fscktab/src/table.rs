// SPDX-License-Identifier: MIT

use core::fmt;
use std::fs;
use std::path::Path;

use crate::error::TabError;

/// One line of mount-table information.
///
/// All fields except `done` are read-only after load; the scheduler is the
/// only writer of `done`, and flips it exactly once per entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEntry {
    pub device: String,
    pub mountpoint: String,
    pub fstype: String,
    /// Option tokens, split once at load time.
    pub options: Vec<String>,
    /// Check ordering; 0 means "never check".
    pub passno: u32,
    pub done: bool,
}

impl FsEntry {
    pub fn new(
        device: impl Into<String>,
        mountpoint: impl Into<String>,
        fstype: impl Into<String>,
        options: &str,
        passno: u32,
    ) -> Self {
        Self {
            device: device.into(),
            mountpoint: mountpoint.into(),
            fstype: fstype.into(),
            options: split_options(options),
            passno,
            done: false,
        }
    }

    pub fn is_root(&self) -> bool {
        self.mountpoint == "/"
    }

    pub fn has_option(&self, name: &str) -> bool {
        self.options.iter().any(|o| o == name)
    }
}

fn split_options(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Non-fatal anomalies surfaced while loading the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// No line in the source carried a pass-number field; every entry was
    /// defaulted to pass 1.
    NoPassNumbers,
    MalformedLine(usize),
    BadPassNumber(usize),
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::NoPassNumbers => {
                write!(f, "no pass numbers in mount table, assuming pass 1 for all")
            }
            Warning::MalformedLine(n) => write!(f, "ignoring malformed line {n}"),
            Warning::BadPassNumber(n) => write!(f, "bad pass number on line {n}, assuming 0"),
        }
    }
}

#[derive(Debug, Default)]
pub struct Table {
    entries: Vec<FsEntry>,
    pub warnings: Vec<Warning>,
}

impl Table {
    pub fn load(path: &Path) -> Result<Self, TabError> {
        let content = fs::read_to_string(path).map_err(|source| TabError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&content))
    }

    /// Parses fstab-format content: whitespace-separated fields, `#`
    /// comments, blank lines. Fields: device, mountpoint, type, options,
    /// dump frequency (ignored), pass number. Short lines are tolerated.
    pub fn parse(content: &str) -> Self {
        let mut entries = Vec::new();
        let mut warnings = Vec::new();
        let mut saw_passno = false;

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 3 {
                warnings.push(Warning::MalformedLine(idx + 1));
                continue;
            }
            let options = fields.get(3).copied().unwrap_or("");
            let passno = match fields.get(5) {
                Some(s) => {
                    saw_passno = true;
                    match s.parse() {
                        Ok(n) => n,
                        Err(_) => {
                            warnings.push(Warning::BadPassNumber(idx + 1));
                            0
                        }
                    }
                }
                None => 0,
            };
            entries.push(FsEntry::new(fields[0], fields[1], fields[2], options, passno));
        }

        if !saw_passno && !entries.is_empty() {
            for e in &mut entries {
                e.passno = 1;
            }
            warnings.push(Warning::NoPassNumbers);
        }

        Table { entries, warnings }
    }

    pub fn entries(&self) -> &[FsEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<FsEntry> {
        self.entries
    }

    /// Exact match against device or mountpoint, first hit in load order.
    pub fn lookup(&self, name: &str) -> Option<&FsEntry> {
        self.entries
            .iter()
            .find(|e| e.device == name || e.mountpoint == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
# /etc/fstab
/dev/sda1  /      ext2  defaults        1 1
/dev/sda2  /home  ext2  defaults,noauto 1 2
/dev/sdb1  /data  xfs   defaults        0 0
proc       /proc  proc  defaults        0 0
";

    #[test]
    fn parses_fields() {
        let tab = Table::parse(SAMPLE);
        assert_eq!(tab.entries().len(), 4);
        let e = &tab.entries()[0];
        assert_eq!(e.device, "/dev/sda1");
        assert_eq!(e.mountpoint, "/");
        assert_eq!(e.fstype, "ext2");
        assert_eq!(e.passno, 1);
        assert!(e.is_root());
        assert!(!e.done);
        assert!(tab.warnings.is_empty());
    }

    #[test]
    fn options_split_once() {
        let tab = Table::parse(SAMPLE);
        let home = &tab.entries()[1];
        assert_eq!(home.options, vec!["defaults", "noauto"]);
        assert!(home.has_option("noauto"));
        assert!(!home.has_option("auto"));
    }

    #[test]
    fn skips_comments_and_blanks() {
        let tab = Table::parse("# only a comment\n\n   \n");
        assert!(tab.entries().is_empty());
        assert!(tab.warnings.is_empty());
    }

    #[test]
    fn short_line_warns() {
        let tab = Table::parse("/dev/sda1 /\n/dev/sda2 /home ext2 defaults 1 2\n");
        assert_eq!(tab.entries().len(), 1);
        assert_eq!(tab.warnings, vec![Warning::MalformedLine(1)]);
    }

    #[test]
    fn missing_passnos_default_to_one() {
        let tab = Table::parse("/dev/sda1 / ext2 defaults\n/dev/sda2 /home ext2 defaults\n");
        assert!(tab.entries().iter().all(|e| e.passno == 1));
        assert_eq!(tab.warnings, vec![Warning::NoPassNumbers]);
    }

    #[test]
    fn partial_passnos_do_not_default() {
        let tab = Table::parse("/dev/sda1 / ext2 defaults 1 1\n/dev/sda2 /home ext2 defaults\n");
        assert_eq!(tab.entries()[0].passno, 1);
        assert_eq!(tab.entries()[1].passno, 0);
        assert!(tab.warnings.is_empty());
    }

    #[test]
    fn bad_passno_warns_and_zeroes() {
        let tab = Table::parse("/dev/sda1 / ext2 defaults 1 x\n");
        assert_eq!(tab.entries()[0].passno, 0);
        assert_eq!(tab.warnings, vec![Warning::BadPassNumber(1)]);
    }

    #[test]
    fn lookup_by_device_and_mountpoint() {
        let tab = Table::parse(SAMPLE);
        assert_eq!(tab.lookup("/dev/sda2").unwrap().mountpoint, "/home");
        assert_eq!(tab.lookup("/data").unwrap().device, "/dev/sdb1");
        assert!(tab.lookup("/dev/sdz9").is_none());
    }

    #[test]
    fn load_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(SAMPLE.as_bytes()).unwrap();
        let tab = Table::load(f.path()).unwrap();
        assert_eq!(tab.entries().len(), 4);
    }

    #[test]
    fn load_missing_file_errors() {
        let err = Table::load(Path::new("/no/such/fstab")).unwrap_err();
        assert!(err.to_string().contains("/no/such/fstab"));
    }
}
