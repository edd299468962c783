// SPDX-License-Identifier: MIT

//! The multi-pass, spindle-exclusion-respecting, root-first orchestration
//! loop. All mutable run state lives on [`Scheduler`]; independent runs use
//! independent schedulers.

use fscktab::FsEntry;

use crate::device::base_device;
use crate::filter::{FilterConfig, Verdict};
use crate::launch::Launcher;
use crate::locate::Locator;
use crate::registry::Registry;
use crate::status::ExitFlags;

#[derive(Debug, Clone, Default)]
pub struct ScheduleOptions {
    /// Skip the root filesystem entirely.
    pub skip_root: bool,
    /// Let root participate in normal pass scheduling instead of a
    /// dedicated first phase.
    pub parallel_root: bool,
    /// Never run more than one checker at a time.
    pub serialize: bool,
    /// Print command lines instead of executing them.
    pub preview: bool,
    /// Passed to every checker, before the device argument.
    pub extra_args: Vec<String>,
}

impl ScheduleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip_root(mut self) -> Self {
        self.skip_root = true;
        self
    }

    pub fn parallel_root(mut self) -> Self {
        self.parallel_root = true;
        self
    }

    pub fn serialize(mut self) -> Self {
        self.serialize = true;
        self
    }

    pub fn preview(mut self) -> Self {
        self.preview = true;
        self
    }

    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }
}

pub struct Scheduler {
    launcher: Launcher,
    registry: Registry,
    filter: FilterConfig,
    opts: ScheduleOptions,
}

impl Scheduler {
    pub fn new(locator: Locator, filter: FilterConfig, opts: ScheduleOptions) -> Self {
        Self {
            launcher: Launcher::new(locator, opts.preview),
            registry: Registry::new(),
            filter,
            opts,
        }
    }

    /// Runs every entry through the state machine: root phase, pass loop,
    /// final drain. Returns the OR-fold of every normalized exit status.
    pub fn run_all(&mut self, entries: &mut [FsEntry]) -> ExitFlags {
        let mut status = ExitFlags::empty();

        // Root is never checked concurrently with anything else: damage to
        // the root filesystem invalidates every check of a filesystem
        // mounted under it.
        if !self.opts.parallel_root
            && let Some(root) = entries.iter_mut().find(|e| e.is_root() && !e.done)
        {
            if !self.opts.skip_root {
                match self.filter.verdict(root, &self.launcher.locator) {
                    Verdict::Check => {
                        status |= self.launch_one(root);
                        status |= self.registry.wait_all();
                        if status.is_destructive() {
                            root.done = true;
                            crate::log_warn!(
                                "root filesystem check failed (status {}); not checking anything else",
                                status.bits()
                            );
                            return status;
                        }
                    }
                    Verdict::NoChecker => status |= ExitFlags::ERROR,
                    Verdict::Skip => {}
                }
            }
            root.done = true;
        }

        // Ineligible entries never enter the pass loop.
        for entry in entries.iter_mut() {
            if entry.done {
                continue;
            }
            match self.filter.verdict(entry, &self.launcher.locator) {
                Verdict::Check => {}
                Verdict::Skip => {
                    crate::log_verbose!("not checking {} ({})", entry.device, entry.fstype);
                    entry.done = true;
                }
                Verdict::NoChecker => {
                    entry.done = true;
                    status |= ExitFlags::ERROR;
                }
            }
        }

        let mut pass: u32 = 0;
        loop {
            // Entries belonging to a later pass than the current one.
            let mut deferred = 0usize;
            // Cleared when an entry of this pass had to wait for a spindle,
            // or serialize mode cut the sweep short.
            let mut pass_done = true;

            for idx in 0..entries.len() {
                if entries[idx].done {
                    continue;
                }
                if entries[idx].passno > pass {
                    deferred += 1;
                    continue;
                }
                if self.registry.active(base_device(&entries[idx].device)) {
                    pass_done = false;
                    continue;
                }
                status |= self.launch_one(&entries[idx]);
                entries[idx].done = true;
                if self.opts.serialize {
                    pass_done = false;
                    break;
                }
            }

            // Retire one instance per sweep: frees a spindle for deferred
            // same-pass entries and bounds how far ahead we get.
            if let Some(reaped) = self.registry.wait_one() {
                status |= reaped.status;
            }

            if pass_done {
                status |= self.registry.wait_all();
                crate::log_verbose!("---- pass {pass} complete ----");
                pass += 1;
            }

            if deferred == 0 && pass_done {
                break;
            }
        }

        // Nothing is ever left unreaped.
        status |= self.registry.wait_all();
        status
    }

    /// Launch failures fold an error bit but never abort the pass; the
    /// device simply goes unchecked.
    fn launch_one(&mut self, entry: &FsEntry) -> ExitFlags {
        match self.launcher.launch(
            &mut self.registry,
            &entry.fstype,
            &entry.device,
            &self.opts.extra_args,
        ) {
            Ok(()) => ExitFlags::empty(),
            Err(err) => {
                crate::log_warn!("cannot check {}: {}", entry.device, err);
                ExitFlags::ERROR
            }
        }
    }
}
