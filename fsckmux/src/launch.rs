// SPDX-License-Identifier: MIT

use std::process::Command;

use thiserror::Error;

use crate::locate::Locator;
use crate::registry::{Instance, Registry};

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("{0} not found on search path")]
    NotFound(String),
    #[error("cannot execute {prog}: {source}")]
    Spawn {
        prog: String,
        #[source]
        source: std::io::Error,
    },
}

/// Spawns checker processes and records them in the registry. In preview
/// mode the command line is printed and nothing runs.
#[derive(Debug)]
pub struct Launcher {
    pub locator: Locator,
    pub preview: bool,
}

impl Launcher {
    pub fn new(locator: Locator, preview: bool) -> Self {
        Self { locator, preview }
    }

    /// Resolves `fsck.<type>`, builds `[prog, extra_args.., device]` and
    /// spawns it. Errors are per-device and never fatal to the run; the
    /// caller folds them into the aggregate.
    pub fn launch(
        &self,
        registry: &mut Registry,
        fstype: &str,
        device: &str,
        extra_args: &[String],
    ) -> Result<(), LaunchError> {
        let prog = Locator::checker_name(fstype);
        let path = self
            .locator
            .find(fstype)
            .ok_or_else(|| LaunchError::NotFound(prog.clone()))?;

        let mut cmdline = vec![path.display().to_string()];
        cmdline.extend(extra_args.iter().cloned());
        cmdline.push(device.to_string());

        if self.preview {
            crate::log_normal!("would run: {}", cmdline.join(" "));
            return Ok(());
        }
        crate::log_verbose!("running {}", cmdline.join(" "));

        let child = Command::new(&path)
            .args(extra_args)
            .arg(device)
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                prog: prog.clone(),
                source,
            })?;

        registry.insert(Instance {
            pid: child.id(),
            prog,
            device: device.to_string(),
            child,
        });
        Ok(())
    }
}
