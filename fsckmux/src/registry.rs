// SPDX-License-Identifier: MIT

use std::process::{Child, ExitStatus};
use std::thread;
use std::time::Duration;

use crate::device::base_device;
use crate::status::ExitFlags;

const REAP_POLL: Duration = Duration::from_millis(10);

/// One in-flight checker process. Lives in the registry from successful
/// spawn until it is reaped; while present, its device's spindle counts as
/// active.
#[derive(Debug)]
pub struct Instance {
    pub pid: u32,
    pub prog: String,
    pub device: String,
    pub child: Child,
}

/// A reaped instance, with its exit already normalized.
#[derive(Debug)]
pub struct Reaped {
    pub prog: String,
    pub device: String,
    pub status: ExitFlags,
}

#[derive(Debug, Default)]
pub struct Registry {
    instances: Vec<Instance>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// True iff some running instance's device resolves to this spindle.
    pub fn active(&self, base: &str) -> bool {
        self.instances.iter().any(|i| base_device(&i.device) == base)
    }

    pub fn insert(&mut self, inst: Instance) {
        debug_assert!(
            !self.instances.iter().any(|i| i.pid == inst.pid),
            "duplicate pid in registry"
        );
        self.instances.push(inst);
    }

    /// Blocks until any one child exits, removes it and returns it with its
    /// status normalized. Returns `None` only when the registry is empty.
    ///
    /// std cannot wait on "any child", so this polls the registry; the poll
    /// interval bounds the scheduling latency, not correctness.
    pub fn wait_one(&mut self) -> Option<Reaped> {
        if self.instances.is_empty() {
            return None;
        }
        loop {
            let mut i = 0;
            while i < self.instances.len() {
                match self.instances[i].child.try_wait() {
                    Ok(Some(status)) => {
                        let inst = self.instances.remove(i);
                        let status = normalize_exit(&inst.prog, &inst.device, status);
                        return Some(Reaped {
                            prog: inst.prog,
                            device: inst.device,
                            status,
                        });
                    }
                    Ok(None) => i += 1,
                    Err(err) => {
                        // The child vanished under us; drop it rather than
                        // spin forever.
                        let inst = self.instances.remove(i);
                        crate::log_warn!(
                            "wait failed for {} ({}): {}",
                            inst.prog,
                            inst.device,
                            err
                        );
                        return Some(Reaped {
                            prog: inst.prog,
                            device: inst.device,
                            status: ExitFlags::ERROR,
                        });
                    }
                }
            }
            thread::sleep(REAP_POLL);
        }
    }

    /// Reaps until the registry is empty, OR-folding every status.
    pub fn wait_all(&mut self) -> ExitFlags {
        let mut agg = ExitFlags::empty();
        while let Some(reaped) = self.wait_one() {
            agg |= reaped.status;
        }
        agg
    }
}

/// Folds one child's raw exit information into status bits. The only
/// platform-coupled logic in the orchestrator.
pub fn normalize_exit(prog: &str, device: &str, status: ExitStatus) -> ExitFlags {
    if let Some(code) = status.code() {
        return ExitFlags::from_bits_retain(code);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            if sig == libc::SIGINT {
                return ExitFlags::UNCORRECTED;
            }
            crate::log_warn!("{} ({}) killed by signal {}", prog, device, sig);
            return ExitFlags::ERROR;
        }
    }
    crate::log_warn!("{} ({}) exited abnormally: {:?}", prog, device, status);
    ExitFlags::ERROR
}
