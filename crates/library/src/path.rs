//! Absolute, `/`-separated path helpers.
//!
//! Paths are rooted at `/`; no path other than the root carries a trailing
//! separator.

use heapless::String;
use platform::config::MAX_PATH_LEN;

/// Owned path with the player's fixed capacity.
pub type PathString = String<MAX_PATH_LEN>;

/// Returned when a joined path would not fit in [`PathString`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[error("path exceeds the fixed path capacity")]
pub struct PathTooLong;

/// Root of the medium.
pub const ROOT: &str = "/";

/// `true` for `/` (and the empty string, which callers treat as root).
pub fn is_root(path: &str) -> bool {
    path.is_empty() || path == ROOT
}

/// Containing folder of `path`.
///
/// `/a/b` → `/a`, `/a` → `/`, `/` → `/`.
pub fn parent(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some(("", _)) | None => ROOT,
        Some((parent, _)) => parent,
    }
}

/// `dir` + `/` + `name`, without doubling the separator at the root.
pub fn join(dir: &str, name: &str) -> Result<PathString, PathTooLong> {
    let mut out = PathString::new();
    out.push_str(dir.trim_end_matches('/')).map_err(|_| PathTooLong)?;
    out.push('/').map_err(|_| PathTooLong)?;
    out.push_str(name).map_err(|_| PathTooLong)?;
    Ok(out)
}

/// Copy `path` into a [`PathString`].
pub fn to_owned(path: &str) -> Result<PathString, PathTooLong> {
    let mut out = PathString::new();
    out.push_str(path).map_err(|_| PathTooLong)?;
    Ok(out)
}

/// Last component of `path`, or `/` for the root.
pub fn display_name(path: &str) -> &str {
    if is_root(path) {
        return ROOT;
    }
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}
