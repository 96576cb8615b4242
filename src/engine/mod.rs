pub mod dagger;

use anyhow::Result;
use std::path::Path;

pub use dagger::Dagger;

/// Logging flags handed to the engine as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    pub format: String,
    pub level: String,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            format: "auto".to_string(),
            level: "info".to_string(),
        }
    }
}

/// Trait for the engine that builds and runs a stack
pub trait ExecutionEngine {
    /// Get the name of this engine
    fn name(&self) -> &'static str;

    /// Check if the engine binary is available
    fn is_available(&self) -> bool;

    /// Bring the stack up. The process environment must already hold every
    /// resolved parameter.
    fn up(&self, stack_dir: &Path, log: &LogOptions) -> Result<()>;
}
