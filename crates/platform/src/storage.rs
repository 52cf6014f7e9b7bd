//! Storage abstraction for the removable medium

use core::ops::ControlFlow;

/// One directory entry, borrowed for the duration of a visit callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirEntry<'a> {
    /// Entry name without any directory prefix.
    pub name: &'a str,
    /// `true` for subdirectories.
    pub is_dir: bool,
}

/// Storage trait for file system access
///
/// Paths are absolute, `/`-separated, rooted at the medium's root (`/`).
pub trait Storage {
    /// Error type
    type Error: core::fmt::Debug;

    /// Bring the medium up. Fails if no medium is present.
    fn mount(&mut self) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Check if path exists
    fn exists(
        &mut self,
        path: &str,
    ) -> impl core::future::Future<Output = Result<bool, Self::Error>>;

    /// Visit the immediate children of directory `path` in the medium's
    /// listing order. The visitor returns [`ControlFlow::Break`] to stop
    /// early.
    fn read_dir<F>(
        &mut self,
        path: &str,
        visit: F,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>
    where
        F: FnMut(DirEntry<'_>) -> ControlFlow<()>;
}
