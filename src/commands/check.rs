use anyhow::{bail, Result};
use colored::*;
use stackup::checker::{self, TOOLS};

pub fn execute(json: bool) -> Result<()> {
    let infos = checker::detect(TOOLS);
    let missing = checker::missing_required(&infos);

    if json {
        println!("{}", serde_json::to_string_pretty(&infos)?);
    } else {
        println!("🔍 Checking infrastructure...");
        for info in &infos {
            if info.available {
                let version = info.version.as_deref().unwrap_or("unknown version");
                println!("   {} {} ({})", "✓".green().bold(), info.name, version);
            } else if info.required {
                println!("   {} {} not found", "✗".red().bold(), info.name);
            } else {
                println!("   {} {} not found (optional)", "⚠️".yellow(), info.name);
            }
        }
    }

    if !missing.is_empty() {
        bail!("missing required tools: {}", missing.join(", "));
    }
    if !json {
        println!("\n{}", "✅ Infrastructure is ready".green().bold());
    }
    Ok(())
}
