use anyhow::{Context, Result};
use stackup::Config;
use std::io::{self, BufRead, Write};

pub fn path(config: &Config) -> Result<()> {
    println!("{}", config.cache.path().display());
    Ok(())
}

pub fn clean(config: &Config, yes: bool) -> Result<()> {
    let path = config.cache.path();

    if !yes {
        print!("Remove everything under {}? [y/N] ", path.display());
        io::stdout().flush()?;
        let mut response = String::new();
        io::stdin().lock().read_line(&mut response)?;

        if !response.trim().eq_ignore_ascii_case("y") {
            println!("Aborted");
            return Ok(());
        }
    }

    config
        .cache
        .clean()
        .context("failed to clean cache")?;
    println!("✓ Cache cleaned");
    Ok(())
}
