//! Turning a default expression into an absolute path.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathExpansionError {
    #[error("cannot expand '~': home directory is unknown")]
    NoHomeDir,

    #[error("cannot expand '{0}': only the current user's home ('~') is supported")]
    UnsupportedUser(String),

    #[error("cannot resolve current directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    #[error("expanded path is not valid unicode: {}", .0.display())]
    NotUnicode(PathBuf),
}

/// Expand a leading `~` against `home`.
///
/// `~` and `~/...` are expanded, `~user/...` is refused, anything else is
/// returned unchanged.
pub fn expand_home(raw: &str, home: Option<&Path>) -> Result<PathBuf, PathExpansionError> {
    if !raw.starts_with('~') {
        return Ok(PathBuf::from(raw));
    }
    if raw != "~" && !raw.starts_with("~/") {
        let user = raw.split('/').next().unwrap_or(raw);
        return Err(PathExpansionError::UnsupportedUser(user.to_string()));
    }

    let home = home.ok_or(PathExpansionError::NoHomeDir)?;
    let expanded = shellexpand::tilde_with_context(raw, || Some(home.display().to_string()));
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Make `path` absolute against `cwd` and drop `.`/`..` lexically.
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    clean(&joined)
}

fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `/..` stays at the root
                if !matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Expand `~` with the user's home and resolve against the working directory.
pub fn default_to_absolute(raw: &str) -> Result<String, PathExpansionError> {
    let home = dirs::home_dir();
    let expanded = expand_home(raw, home.as_deref())?;
    let cwd = std::env::current_dir().map_err(PathExpansionError::CurrentDir)?;
    absolutize(&expanded, &cwd)
        .into_os_string()
        .into_string()
        .map_err(|os| PathExpansionError::NotUnicode(PathBuf::from(os)))
}
