use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use stackup::resolve::default_to_absolute;
use stackup::{Config, EnvStore, MapEnv, Parameter, Schema};

#[derive(Serialize)]
struct ParameterStatus<'a> {
    #[serde(flatten)]
    parameter: &'a Parameter,
    status: Status,
}

#[derive(Serialize)]
#[serde(tag = "source", content = "detail", rename_all = "snake_case")]
enum Status {
    Environment,
    Default(String),
    InvalidDefault(String),
    Unset,
    Missing,
}

fn status_of(p: &Parameter, env: &impl EnvStore) -> Status {
    if env.is_set(&p.key) {
        Status::Environment
    } else if p.has_default() {
        match default_to_absolute(&p.default) {
            Ok(value) => Status::Default(value),
            Err(e) => Status::InvalidDefault(e.to_string()),
        }
    } else if !p.required {
        Status::Unset
    } else {
        Status::Missing
    }
}

/// Show declared parameters and where each would resolve from.
pub fn execute(config: &Config, json: bool) -> Result<()> {
    let schema = match Schema::open(&config.stack_dir) {
        Ok(schema) => schema,
        Err(e) if e.is_not_found() => {
            if json {
                println!("[]");
            } else {
                println!("No schema declared for this stack");
            }
            return Ok(());
        }
        Err(e) => return Err(e).context("failed to load input schema"),
    };

    let env = MapEnv::from_process();
    let statuses: Vec<ParameterStatus> = schema
        .parameters()
        .iter()
        .map(|p| ParameterStatus {
            parameter: p,
            status: status_of(p, &env),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    println!("📋 Parameters of {}\n", config.stack_dir.display());
    for s in &statuses {
        let p = s.parameter;
        let status = match &s.status {
            Status::Environment => "from environment".green().to_string(),
            Status::Default(value) => format!("default → {value}"),
            Status::InvalidDefault(e) => format!("invalid default: {e}").red().to_string(),
            Status::Unset => "optional, unset".dimmed().to_string(),
            Status::Missing => "MISSING (required)".red().bold().to_string(),
        };
        println!("   {} ({}): {}", p.key.bold(), p.title, status);
    }

    for key in schema.duplicate_keys() {
        println!("\n   {} {key} is declared more than once", "⚠️".yellow());
    }
    Ok(())
}
