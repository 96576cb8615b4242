//! Infrastructure checks - verify the tools a stack run depends on.
//!
//! Verify only: nothing is installed here.

use serde::Serialize;
use std::process::Command;
use tracing::{debug, warn};

/// A binary the tool depends on.
#[derive(Debug, Clone, Copy)]
pub struct Tool {
    pub name: &'static str,
    pub version_args: &'static [&'static str],
    pub required: bool,
}

/// Tools checked by `stackup check` and the preflight in `up`.
pub const TOOLS: &[Tool] = &[
    Tool {
        name: "dagger",
        version_args: &["version"],
        required: true,
    },
    Tool {
        name: "docker",
        version_args: &["--version"],
        required: false,
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub required: bool,
    pub available: bool,
    pub version: Option<String>,
    pub path: Option<String>,
}

/// Look up each tool on PATH and ask it for its version.
pub fn detect(tools: &[Tool]) -> Vec<ToolInfo> {
    tools.iter().map(detect_one).collect()
}

fn detect_one(tool: &Tool) -> ToolInfo {
    let mut info = ToolInfo {
        name: tool.name.to_string(),
        required: tool.required,
        available: false,
        version: None,
        path: None,
    };

    if let Ok(path) = which::which(tool.name) {
        info.available = true;
        info.path = Some(path.display().to_string());

        if let Ok(output) = Command::new(&path).args(tool.version_args).output() {
            let version_str = String::from_utf8_lossy(&output.stdout);
            info.version = version_str
                .lines()
                .next()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty());
        }
    }

    debug!(tool = tool.name, available = info.available, "checked tool");
    info
}

/// Names of required tools that were not found.
pub fn missing_required(infos: &[ToolInfo]) -> Vec<&str> {
    infos
        .iter()
        .filter(|i| i.required && !i.available)
        .map(|i| i.name.as_str())
        .collect()
}

/// Check without failing; warn about anything missing.
pub fn preflight() -> bool {
    let infos = detect(TOOLS);
    let missing = missing_required(&infos);
    if missing.is_empty() {
        return true;
    }
    warn!(missing = ?missing, "required tools not found, please run 'stackup check'");
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool() {
        let tools = [Tool {
            name: "stackup-no-such-tool",
            version_args: &["--version"],
            required: true,
        }];
        let infos = detect(&tools);
        assert_eq!(infos.len(), 1);
        assert!(!infos[0].available);
        assert!(infos[0].path.is_none());
        assert_eq!(missing_required(&infos), vec!["stackup-no-such-tool"]);
    }

    #[test]
    fn test_optional_tool_not_reported_missing() {
        let infos = vec![ToolInfo {
            name: "docker".to_string(),
            required: false,
            available: false,
            version: None,
            path: None,
        }];
        assert!(missing_required(&infos).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_detects_tool_on_path() {
        let tools = [Tool {
            name: "sh",
            version_args: &["-c", "echo sh-version"],
            required: true,
        }];
        let infos = detect(&tools);
        assert!(infos[0].available);
        assert_eq!(infos[0].version.as_deref(), Some("sh-version"));
    }
}
