//! Where resolved values are bound.

use std::collections::BTreeMap;

use super::ResolveError;

/// A key/value environment the resolver reads from and writes into.
///
/// Bindings are never removed.
pub trait EnvStore {
    /// Current value of `key`, if bound and valid unicode.
    fn get(&self, key: &str) -> Option<String>;

    /// Bind `key` to `value`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), ResolveError>;

    /// True when `key` is bound to a non-empty value.
    fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_empty())
    }
}

/// Reject names and values the OS environment cannot hold.
pub fn validate(key: &str, value: &str) -> Result<(), ResolveError> {
    let reason = if key.is_empty() {
        Some("empty variable name")
    } else if key.contains('=') {
        Some("variable name contains '='")
    } else if key.contains('\0') {
        Some("variable name contains NUL")
    } else if value.contains('\0') {
        Some("value contains NUL")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ResolveError::EnvironmentWrite {
            key: key.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

/// The process environment.
///
/// Callers must not mutate the same variables from another thread while a
/// resolution pass is running.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvStore for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        if key.is_empty() || key.contains('=') || key.contains('\0') {
            return None;
        }
        std::env::var(key).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ResolveError> {
        validate(key, value)?;
        std::env::set_var(key, value);
        Ok(())
    }
}

/// An in-memory environment, for dry runs and tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current process environment.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvStore for MapEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ResolveError> {
        validate(key, value)?;
        self.vars.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
