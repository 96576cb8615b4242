pub mod cache;
pub mod checker;
pub mod config;
pub mod engine;
pub mod overrides;
pub mod paths;
pub mod prompt;
pub mod resolve;
pub mod schema;

// Re-export commonly used types
pub use cache::CacheDir;
pub use config::Config;
pub use overrides::OverrideMap;
pub use prompt::{NoPrompt, Prompter, TerminalPrompter};
pub use resolve::{EnvStore, MapEnv, ProcessEnv, Resolution, ResolveError, Resolver, Source};
pub use schema::{Parameter, Schema, SchemaError};
