//! Local cache directory for stacks.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::paths;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("failed to get user cache dir")]
    NoUserCache,

    #[error("failed to create dir {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove dir {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where stacks are stored locally. Exists once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheDir {
    path: PathBuf,
}

impl CacheDir {
    /// `$STACKUP_CACHE_HOME`, else `<user cache dir>/stackup`, created if missing.
    pub fn resolve() -> Result<Self, CacheError> {
        let override_dir = std::env::var_os(paths::CACHE_HOME_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::resolve_with(override_dir, dirs::cache_dir())
    }

    /// Resolve from explicit inputs instead of the process environment.
    pub fn resolve_with(
        override_dir: Option<PathBuf>,
        user_cache: Option<PathBuf>,
    ) -> Result<Self, CacheError> {
        let path = match override_dir {
            Some(dir) => dir,
            None => user_cache
                .ok_or(CacheError::NoUserCache)?
                .join(paths::CACHE_SUBDIR),
        };
        Self::at(path)
    }

    /// Use `path` as the cache, creating it if needed.
    pub fn at(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        create_dir(&path).map_err(|source| CacheError::Create {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "cache directory ready");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stacks_dir(&self) -> PathBuf {
        paths::cache::stacks_dir(&self.path)
    }

    /// Remove everything under the cache, including the directory itself.
    ///
    /// No confirmation; gate this behind one in the caller.
    pub fn clean(&self) -> Result<(), CacheError> {
        match fs::remove_dir_all(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CacheError::Remove {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(unix)]
fn create_dir(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o755).create(path)
}

#[cfg(not(unix))]
fn create_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}
