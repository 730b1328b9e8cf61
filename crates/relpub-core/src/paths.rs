use dirs::home_dir;
use std::path::{Path, PathBuf};

/// A `~`-prefixed path could not be expanded.
#[derive(thiserror::Error, Debug)]
pub enum ExpandError {
    #[error("home directory could not be determined")]
    NoHome,

    #[error("cannot expand user-specific home dir")]
    OtherUser,
}

/// Expand a leading `~` to the current user's home directory.
///
/// Paths without a leading `~` are returned unchanged. `~user/...` forms
/// are rejected.
pub fn expand_home(path: &Path) -> Result<PathBuf, ExpandError> {
    if let Ok(rest) = path.strip_prefix("~") {
        let home = home_dir().ok_or(ExpandError::NoHome)?;
        if rest.as_os_str().is_empty() {
            return Ok(home);
        }
        return Ok(home.join(rest));
    }

    if path.to_str().is_some_and(|s| s.starts_with('~')) {
        return Err(ExpandError::OtherUser);
    }

    Ok(path.to_path_buf())
}
