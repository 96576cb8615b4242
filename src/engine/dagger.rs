use super::{ExecutionEngine, LogOptions};
use anyhow::{bail, Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::paths;

pub const DAGGER_BIN: &str = "dagger";

/// Runs `dagger do up` against a stack's plans.
#[derive(Debug, Clone)]
pub struct Dagger {
    binary: PathBuf,
}

impl Default for Dagger {
    fn default() -> Self {
        Self::with_binary(DAGGER_BIN)
    }
}

impl Dagger {
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Arguments for `up`, in order.
    pub fn up_args(log: &LogOptions) -> Vec<OsString> {
        [
            "--log-format",
            log.format.as_str(),
            "--log-level",
            log.level.as_str(),
            "-p",
            paths::PLANS_DIR,
            "do",
            "up",
        ]
        .into_iter()
        .map(OsString::from)
        .collect()
    }
}

impl ExecutionEngine for Dagger {
    fn name(&self) -> &'static str {
        "dagger"
    }

    fn is_available(&self) -> bool {
        which::which(&self.binary).is_ok()
    }

    fn up(&self, stack_dir: &Path, log: &LogOptions) -> Result<()> {
        if !self.is_available() {
            bail!(
                "{} is not installed. Run 'stackup check' for details.",
                self.binary.display()
            );
        }
        if !paths::stack::plans_dir(stack_dir).is_dir() {
            bail!("No plans directory found in {}", stack_dir.display());
        }

        let args = Self::up_args(log);
        debug!(binary = %self.binary.display(), ?args, "starting engine");
        println!("🚀 Bringing stack up with {}...", self.name());

        let status = Command::new(&self.binary)
            .current_dir(stack_dir)
            .args(&args)
            .status()
            .context("Failed to run dagger")?;

        if status.success() {
            println!("✅ Stack is up");
            Ok(())
        } else {
            bail!("dagger exited with {status}")
        }
    }
}
