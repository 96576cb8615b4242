//! Single source of truth for the stackup filesystem layout.
//!
//! This module defines WHERE things live. It has no I/O, no validation,
//! no business logic.
//!
//! # Stack Layout
//!
//! ```text
//! stack/
//! ├── schemas/
//! │   └── schema.yaml          # Parameter declarations
//! └── plans/                   # Dagger plans, run by `stackup up`
//! ```
//!
//! # User Cache
//!
//! ```text
//! <user cache dir>/stackup/    # or $STACKUP_CACHE_HOME
//! └── stacks/                  # Locally stored stacks
//! ```

use std::path::{Path, PathBuf};

/// Environment variable that overrides the cache location.
pub const CACHE_HOME_ENV: &str = "STACKUP_CACHE_HOME";

/// Directory name joined onto the platform user cache dir.
pub const CACHE_SUBDIR: &str = "stackup";

/// Plans directory handed to dagger, relative to the stack root.
pub const PLANS_DIR: &str = "./plans";

/// Stack-level paths, relative to a stack root.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use stackup::paths::stack;
///
/// let root = Path::new("/home/user/mystack");
/// assert_eq!(
///     stack::schema_path(root),
///     Path::new("/home/user/mystack/schemas/schema.yaml")
/// );
/// ```
pub mod stack {
    use super::*;

    /// Schema directory: `schemas/`
    pub fn schemas_dir(root: &Path) -> PathBuf {
        root.join("schemas")
    }

    /// Parameter schema: `schemas/schema.yaml`
    pub fn schema_path(root: &Path) -> PathBuf {
        schemas_dir(root).join("schema.yaml")
    }

    /// Dagger plans: `plans/`
    pub fn plans_dir(root: &Path) -> PathBuf {
        root.join("plans")
    }
}

/// Cache-level paths, relative to a resolved cache root.
pub mod cache {
    use super::*;

    /// Locally stored stacks: `<cache>/stacks/`
    pub fn stacks_dir(cache_root: &Path) -> PathBuf {
        cache_root.join("stacks")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_paths() {
        let root = Path::new("/tmp/test-stack");

        assert_eq!(
            stack::schemas_dir(root),
            PathBuf::from("/tmp/test-stack/schemas")
        );
        assert_eq!(
            stack::schema_path(root),
            PathBuf::from("/tmp/test-stack/schemas/schema.yaml")
        );
        assert_eq!(stack::plans_dir(root), PathBuf::from("/tmp/test-stack/plans"));
    }

    #[test]
    fn test_cache_paths() {
        let stacks = cache::stacks_dir(Path::new("/tmp/cache/stackup"));
        assert!(stacks.ends_with("stackup/stacks"));
    }
}
