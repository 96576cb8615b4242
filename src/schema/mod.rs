//! Schema module - Parameter declarations of a stack
//!
//! Reads `schemas/schema.yaml` under a stack directory into an ordered list
//! of [`Parameter`]s. A missing document is reported as
//! [`SchemaError::NotFound`], distinct from a malformed one, so callers can
//! treat "no schema" as "nothing to resolve".
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use stackup::schema::Schema;
//!
//! match Schema::new(Path::new(".")).load() {
//!     Ok(schema) => {
//!         for p in schema.parameters() {
//!             println!("{} -> ${}", p.title, p.key);
//!         }
//!     }
//!     Err(e) if e.is_not_found() => println!("nothing to resolve"),
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

mod internal;

use std::path::{Path, PathBuf};
use thiserror::Error;

pub use internal::Parameter;

/// Failure to load a stack's schema.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("no schema declared for this stack: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read schema {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("syntax error in schema {}: {source}", path.display())]
    Syntax {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("parameter #{index} ({title:?}) has no key")]
    MissingKey { index: usize, title: String },
}

impl SchemaError {
    /// True when the stack simply declares no schema.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SchemaError::NotFound { .. })
    }
}

/// Input schema of a stack.
///
/// `directory` is the stack root, not the schema file itself.
#[derive(Debug)]
pub struct Schema<'a> {
    directory: &'a Path,
    parameters: Vec<Parameter>,
}

impl<'a> Schema<'a> {
    /// Create an empty schema bound to a stack directory.
    pub fn new(directory: &'a Path) -> Self {
        Self {
            directory,
            parameters: Vec::new(),
        }
    }

    /// Build a schema from already-known parameters.
    pub fn with_parameters(directory: &'a Path, parameters: Vec<Parameter>) -> Self {
        Self {
            directory,
            parameters,
        }
    }

    /// Create and load in one step.
    pub fn open(directory: &'a Path) -> Result<Self, SchemaError> {
        Self::new(directory).load()
    }

    /// Read `schemas/schema.yaml` and replace the parameters.
    ///
    /// Consumes the schema, so a failed load leaves nothing to resolve from.
    pub fn load(self) -> Result<Self, SchemaError> {
        let parameters = internal::load(self.directory)?;
        Ok(Self { parameters, ..self })
    }

    pub fn directory(&self) -> &Path {
        self.directory
    }

    /// Parameters in declaration order.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Keys declared by more than one parameter, in first-seen order.
    pub fn duplicate_keys(&self) -> Vec<&str> {
        internal::duplicate_keys(&self.parameters)
    }

    /// Whether any parameter binds `key`.
    pub fn declares(&self, key: &str) -> bool {
        self.parameters.iter().any(|p| p.key == key)
    }
}
