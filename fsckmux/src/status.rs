// SPDX-License-Identifier: MIT

use bitflags::bitflags;

bitflags! {
    /// Aggregate result of a run. Every reaped checker's normalized exit
    /// status is OR-folded in; the final value is the process exit code.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ExitFlags: i32 {
        /// Filesystem errors were found and corrected.
        const CORRECTED   = 1;
        /// System should be rebooted.
        const REBOOT      = 2;
        /// Filesystem errors were left uncorrected.
        const UNCORRECTED = 4;
        /// Operational error (exec failure, wait failure, ...).
        const ERROR       = 8;
        /// Usage or argument error.
        const USAGE       = 16;
        /// Shared-library / orchestrator internal error.
        const LIBRARY     = 128;
    }
}

impl ExitFlags {
    /// The severities a root check may report without invalidating the rest
    /// of the run.
    pub const NONDESTRUCT: ExitFlags = ExitFlags::CORRECTED.union(ExitFlags::UNCORRECTED);

    /// True when any bit above the non-destructive threshold is set. This is
    /// the only meaningful ordering comparison on the bitmask; after a root
    /// check it triggers the fail-fast abort.
    pub fn is_destructive(self) -> bool {
        (self.bits() & !Self::NONDESTRUCT.bits()) != 0
    }

    /// Low byte, as handed back to the shell.
    pub fn exit_code(self) -> u8 {
        (self.bits() & 0xff) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nondestructive_statuses() {
        assert!(!ExitFlags::empty().is_destructive());
        assert!(!ExitFlags::CORRECTED.is_destructive());
        assert!(!ExitFlags::UNCORRECTED.is_destructive());
        assert!(!(ExitFlags::CORRECTED | ExitFlags::UNCORRECTED).is_destructive());
    }

    #[test]
    fn destructive_statuses() {
        assert!(ExitFlags::REBOOT.is_destructive());
        assert!(ExitFlags::ERROR.is_destructive());
        assert!(ExitFlags::LIBRARY.is_destructive());
        assert!((ExitFlags::CORRECTED | ExitFlags::ERROR).is_destructive());
        // Bits the checker invented are still above the threshold.
        assert!(ExitFlags::from_bits_retain(32).is_destructive());
    }

    #[test]
    fn folding_is_monotonic() {
        let mut agg = ExitFlags::empty();
        for s in [1, 4, 2, 0, 4] {
            let before = agg;
            agg |= ExitFlags::from_bits_retain(s);
            assert!(agg.contains(before));
        }
        assert_eq!(agg.bits(), 7);
    }
}
