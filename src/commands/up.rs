use anyhow::{Context, Result};
use stackup::engine::{Dagger, ExecutionEngine, LogOptions};
use stackup::{
    checker, Config, NoPrompt, OverrideMap, ProcessEnv, Resolver, Schema, TerminalPrompter,
};
use tracing::{info, warn};

pub fn execute(
    config: &Config,
    sets: &[String],
    interactive: bool,
    log: &LogOptions,
) -> Result<()> {
    // Parse --set flags
    let overrides = OverrideMap::parse_all(sets)
        .context("failed parsing --set data")?
        .flatten();

    checker::preflight();

    // Defaults resolve against the stack directory
    std::env::set_current_dir(&config.stack_dir).with_context(|| {
        format!(
            "Couldn't enter stack {}. Please check the path",
            config.stack_dir.display()
        )
    })?;

    let schema = match Schema::open(&config.stack_dir) {
        Ok(schema) => schema,
        Err(e) if e.is_not_found() => {
            warn!("{e}; nothing to resolve");
            Schema::new(&config.stack_dir)
        }
        Err(e) => return Err(e).context("failed to load input schema"),
    };

    let resolver = Resolver::new(&schema)
        .overrides(overrides)
        .interactive(interactive);
    let mut env = ProcessEnv;

    let resolution = if interactive {
        let mut prompter = TerminalPrompter::stdio();
        resolver.resolve(&mut env, &mut prompter)
    } else {
        resolver.resolve(&mut env, &mut NoPrompt)
    }
    .context("failed to set input values")?;

    let extra = resolver
        .apply_extra_overrides(&mut env)
        .context("failed to set input values")?;
    info!(
        resolved = resolution.entries().len(),
        extra = extra.len(),
        "input values ready"
    );

    Dagger::default().up(&config.stack_dir, log)
}
