//! Scanner: extension filtering for the files the player can open.

/// Stateless helper for extension filtering.
pub struct Scanner;

impl Scanner {
    /// Returns `true` when `ext` is a supported audio file extension.
    ///
    /// The comparison is **case-insensitive** and does not allocate.
    ///
    /// Supported extensions: `mp3`, `wav`.
    pub fn is_supported_extension(ext: &str) -> bool {
        ext.eq_ignore_ascii_case("mp3") || ext.eq_ignore_ascii_case("wav")
    }

    /// Returns `true` when the file `name` ends in a supported extension.
    ///
    /// Names without a dot, and dot-files such as `.mp3`, are rejected.
    pub fn is_supported_file(name: &str) -> bool {
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => Self::is_supported_extension(ext),
            _ => false,
        }
    }
}
