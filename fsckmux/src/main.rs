// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;

use fscktab::{FsEntry, Table};
use fsckmux::filter::{FilterConfig, TypeFilter};
use fsckmux::locate::Locator;
use fsckmux::scheduler::{ScheduleOptions, Scheduler};
use fsckmux::status::ExitFlags;
use fsckmux::utils::{LogLevel, set_log_level};
use fsckmux::{log_info, log_warn};

#[derive(Parser, Debug)]
#[command(name = "fsckmux", version, about = "Parallel filesystem-check front-end", long_about = None)]
struct Cli {
    /// Check all filesystems in the mount table
    #[arg(short = 'A', long = "all")]
    all: bool,

    /// Skip the root filesystem
    #[arg(short = 'R', long = "skip-root")]
    skip_root: bool,

    /// Let root participate in normal pass scheduling
    #[arg(short = 'P', long = "parallel-root")]
    parallel_root: bool,

    /// Run at most one checker at a time
    #[arg(short = 's', long = "serialize")]
    serialize: bool,

    /// Print commands without executing them
    #[arg(short = 'N', long = "dry-run")]
    preview: bool,

    /// Restrict to these filesystem types, or exclude them with a "no"
    /// prefix (e.g. "ext2,vfat" or "noext2")
    #[arg(short = 't', long = "types", value_name = "LIST")]
    types: Option<String>,

    /// Verbose output
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Suppress informational output
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,

    /// Mount table to read
    #[arg(long, default_value = "/etc/fstab", value_name = "PATH")]
    fstab: PathBuf,

    /// Devices or mountpoints to check
    #[arg(value_name = "DEVICE")]
    operands: Vec<String>,

    /// Extra arguments passed to every checker
    #[arg(last = true, value_name = "ARGS")]
    extra: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    set_log_level(if cli.verbose {
        LogLevel::Verbose
    } else if cli.quiet {
        LogLevel::Quiet
    } else {
        LogLevel::Normal
    });

    match run(cli) {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(err) => {
            eprintln!("[fsckmux] {} {err:#}", "error:".red());
            ExitCode::from(ExitFlags::ERROR.exit_code())
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitFlags> {
    if !cli.all && cli.operands.is_empty() {
        log_warn!("nothing to do; name devices to check or pass -A");
        return Ok(ExitFlags::USAGE);
    }
    if cli.all && !cli.operands.is_empty() {
        log_warn!("-A cannot be combined with explicit devices");
        return Ok(ExitFlags::USAGE);
    }

    let table = Table::load(&cli.fstab)
        .with_context(|| format!("cannot load mount table {}", cli.fstab.display()))?;
    for warning in &table.warnings {
        log_warn!("{}: {warning}", cli.fstab.display());
    }

    let mut status = ExitFlags::empty();
    let mut entries: Vec<FsEntry> = if cli.all {
        table.into_entries()
    } else {
        let mut selected = Vec::new();
        for name in &cli.operands {
            match table.lookup(name) {
                Some(entry) => selected.push(entry.clone()),
                None => {
                    log_warn!("{name}: not found in {}", cli.fstab.display());
                    status |= ExitFlags::USAGE;
                }
            }
        }
        selected
    };

    let filter = FilterConfig::new(cli.types.as_deref().map(TypeFilter::parse));
    let opts = ScheduleOptions {
        skip_root: cli.skip_root,
        parallel_root: cli.parallel_root,
        serialize: cli.serialize,
        preview: cli.preview,
        extra_args: cli.extra,
    };

    let mut scheduler = Scheduler::new(Locator::new(), filter, opts);
    status |= scheduler.run_all(&mut entries);

    if status.is_empty() {
        log_info!("all filesystems clean");
    }
    Ok(status)
}
