//! Parameter resolution.
//!
//! Walks a [`Schema`]'s parameters in declaration order and binds each key
//! from the first source that can satisfy it:
//!
//! 1. a caller override (`--set`)
//! 2. a non-empty value already in the environment (left untouched)
//! 3. the prompter, in interactive mode
//! 4. the default, expanded to an absolute path, otherwise
//! 5. nothing for optional parameters, or an error for required ones
//!
//! The first error ends the pass. Keys bound before it stay bound.

mod env;
mod expand;

use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::prompt::Prompter;
use crate::schema::{Parameter, Schema};

pub use env::{validate, EnvStore, MapEnv, ProcessEnv};
pub use expand::{absolutize, default_to_absolute, expand_home, PathExpansionError};

/// A resolution pass failure. Every variant aborts the pass.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("failed to expand default {default:?} of {key}: {source}")]
    PathExpansion {
        key: String,
        default: String,
        #[source]
        source: PathExpansionError,
    },

    #[error("prompt for {title:?} failed: {source}")]
    Prompt {
        title: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("couldn't find value of {title}, which is required")]
    MissingRequired { title: String, key: String },

    #[error("cannot set environment variable {key:?}: {reason}")]
    EnvironmentWrite { key: String, reason: String },
}

/// Where a parameter's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Override,
    Environment,
    Prompt,
    Default,
    /// Optional parameter left unbound.
    Skipped,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Override => "override",
            Source::Environment => "environment",
            Source::Prompt => "prompt",
            Source::Default => "default",
            Source::Skipped => "skipped",
        }
    }
}

/// Outcome of a successful pass, one entry per parameter in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    entries: Vec<(String, Source)>,
}

impl Resolution {
    pub fn entries(&self) -> &[(String, Source)] {
        &self.entries
    }

    /// Source recorded for the first parameter binding `key`.
    pub fn source_of(&self, key: &str) -> Option<Source> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, source)| *source)
    }

    pub fn count(&self, source: Source) -> usize {
        self.entries.iter().filter(|(_, s)| *s == source).count()
    }
}

/// Caller-supplied values that win over everything else.
pub type Overrides = BTreeMap<String, String>;

/// Runs the precedence chain over a schema.
pub struct Resolver<'s> {
    parameters: &'s [Parameter],
    overrides: Overrides,
    interactive: bool,
}

impl<'s> Resolver<'s> {
    pub fn new(schema: &'s Schema<'_>) -> Self {
        Self {
            parameters: schema.parameters(),
            overrides: Overrides::new(),
            interactive: false,
        }
    }

    pub fn overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Resolve every parameter, stopping at the first failure.
    pub fn resolve<E, P>(&self, env: &mut E, prompter: &mut P) -> Result<Resolution, ResolveError>
    where
        E: EnvStore + ?Sized,
        P: Prompter + ?Sized,
    {
        let mut resolution = Resolution::default();

        for p in self.parameters {
            let source = self.resolve_one(p, env, prompter)?;
            debug!(key = %p.key, source = source.as_str(), "resolved parameter");
            resolution.entries.push((p.key.clone(), source));
        }

        info!(
            parameters = resolution.entries.len(),
            skipped = resolution.count(Source::Skipped),
            "resolution pass complete"
        );
        Ok(resolution)
    }

    fn resolve_one<E, P>(
        &self,
        p: &Parameter,
        env: &mut E,
        prompter: &mut P,
    ) -> Result<Source, ResolveError>
    where
        E: EnvStore + ?Sized,
        P: Prompter + ?Sized,
    {
        if let Some(value) = self.overrides.get(&p.key).filter(|v| !v.is_empty()) {
            env.set(&p.key, value)?;
            return Ok(Source::Override);
        }

        if env.is_set(&p.key) {
            return Ok(Source::Environment);
        }

        if self.interactive {
            let answer = prompter
                .prompt(p)
                .map_err(|source| ResolveError::Prompt {
                    title: p.title.clone(),
                    source,
                })?;
            if answer.is_empty() {
                if p.required {
                    return Err(ResolveError::MissingRequired {
                        title: p.title.clone(),
                        key: p.key.clone(),
                    });
                }
                return Ok(Source::Skipped);
            }
            env.set(&p.key, &answer)?;
            return Ok(Source::Prompt);
        }

        if p.has_default() {
            let value =
                default_to_absolute(&p.default).map_err(|source| ResolveError::PathExpansion {
                    key: p.key.clone(),
                    default: p.default.clone(),
                    source,
                })?;
            env.set(&p.key, &value)?;
            return Ok(Source::Default);
        }

        if !p.required {
            return Ok(Source::Skipped);
        }

        Err(ResolveError::MissingRequired {
            title: p.title.clone(),
            key: p.key.clone(),
        })
    }

    /// Bind overrides for keys no parameter declares.
    ///
    /// Returns the keys written, in order.
    pub fn apply_extra_overrides<E>(&self, env: &mut E) -> Result<Vec<String>, ResolveError>
    where
        E: EnvStore + ?Sized,
    {
        let mut written = Vec::new();
        for (key, value) in &self.overrides {
            if self.parameters.iter().any(|p| &p.key == key) {
                continue;
            }
            env.set(key, value)?;
            written.push(key.clone());
        }
        Ok(written)
    }
}
