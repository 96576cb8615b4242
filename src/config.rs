use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::cache::CacheDir;

/// Configuration for a stackup invocation
#[derive(Debug, Clone)]
pub struct Config {
    /// Stack root directory, absolute
    pub stack_dir: PathBuf,
    /// Local stack cache
    pub cache: CacheDir,
}

impl Config {
    /// Load configuration. `stack_dir` defaults to the current directory.
    pub fn load(stack_dir: Option<PathBuf>) -> Result<Self> {
        let stack_dir = match stack_dir {
            Some(dir) => dir,
            None => std::env::current_dir().context("Failed to get current directory")?,
        };
        let stack_dir = stack_dir.canonicalize().with_context(|| {
            format!("Couldn't find stack at {}", stack_dir.display())
        })?;
        let cache = CacheDir::resolve().context("Failed to initialize cache home")?;

        Ok(Self { stack_dir, cache })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_stack_dir() {
        let tmp = TempDir::new().unwrap();
        let err = Config::load(Some(tmp.path().join("nope"))).unwrap_err();
        assert!(err.to_string().starts_with("Couldn't find stack at"));
    }
}
