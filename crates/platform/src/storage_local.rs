//! Local filesystem Storage implementation for the desktop simulator.
//!
//! `LocalFileStorage` implements `platform::Storage` using `std::fs`.
//! Used when the `std` feature is enabled (simulator builds only).
//! Absolute player paths (`/Album/01.mp3`) are resolved relative to the
//! `music_root` provided at construction.

use core::ops::ControlFlow;
use std::fs;
use std::path::PathBuf;

use crate::storage::{DirEntry, Storage};

/// Error type for local filesystem operations.
#[derive(Debug)]
pub struct LocalStorageError(pub std::io::Error);

impl core::fmt::Display for LocalStorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "local storage error: {}", self.0)
    }
}

impl std::error::Error for LocalStorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// A `platform::Storage` implementation backed by `std::fs`.
///
/// Directory listings are sorted by name so the simulator is
/// deterministic; hidden entries (leading `.`) and names that are not valid
/// UTF-8 are skipped.
///
/// # Example
/// ```no_run
/// # async fn example() {
/// use platform::storage_local::LocalFileStorage;
/// use platform::Storage;
/// let mut storage = LocalFileStorage::new("/home/user/music");
/// storage.mount().await.unwrap();
/// assert!(storage.exists("/").await.unwrap());
/// # }
/// ```
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    /// Create a new storage rooted at `music_root`.
    #[must_use]
    pub fn new(music_root: &str) -> Self {
        Self {
            root: PathBuf::from(music_root),
        }
    }

    /// Create from the `MUSIC_PATH` environment variable.
    ///
    /// Returns `None` if `MUSIC_PATH` is not set or is not valid UTF-8.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        std::env::var("MUSIC_PATH").ok().map(|p| Self::new(&p))
    }

    /// Host path backing the player path `path`.
    #[must_use]
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl Storage for LocalFileStorage {
    type Error = LocalStorageError;

    async fn mount(&mut self) -> Result<(), Self::Error> {
        if self.root.is_dir() {
            Ok(())
        } else {
            Err(LocalStorageError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "music root is not a directory",
            )))
        }
    }

    async fn exists(&mut self, path: &str) -> Result<bool, Self::Error> {
        Ok(self.resolve(path).exists())
    }

    async fn read_dir<F>(&mut self, path: &str, mut visit: F) -> Result<(), Self::Error>
    where
        F: FnMut(DirEntry<'_>) -> ControlFlow<()>,
    {
        let mut entries: Vec<(String, bool)> = Vec::new();
        for entry in fs::read_dir(self.resolve(path)).map_err(LocalStorageError)? {
            let entry = entry.map_err(LocalStorageError)?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            let is_dir = entry.file_type().map_err(LocalStorageError)?.is_dir();
            entries.push((name, is_dir));
        }
        entries.sort();

        for (name, is_dir) in &entries {
            if visit(DirEntry { name, is_dir: *is_dir }).is_break() {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    async fn collect(storage: &mut LocalFileStorage, path: &str) -> Vec<(String, bool)> {
        let mut out = Vec::new();
        storage
            .read_dir(path, |e| {
                out.push((e.name.to_owned(), e.is_dir));
                ControlFlow::Continue(())
            })
            .await
            .unwrap();
        out
    }

    #[tokio::test]
    async fn local_storage_mount_requires_directory() {
        let tmp = TempDir::new().unwrap();
        let mut storage = LocalFileStorage::new(tmp.path().to_str().unwrap());
        assert!(storage.mount().await.is_ok());

        let mut missing = LocalFileStorage::new(tmp.path().join("nope").to_str().unwrap());
        assert!(missing.mount().await.is_err());
    }

    #[tokio::test]
    async fn local_storage_exists_resolves_absolute_paths() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("Album")).unwrap();
        fs::write(tmp.path().join("Album/01.mp3"), b"x").unwrap();
        let mut storage = LocalFileStorage::new(tmp.path().to_str().unwrap());
        assert!(storage.exists("/Album/01.mp3").await.unwrap());
        assert!(!storage.exists("/Album/02.mp3").await.unwrap());
    }

    #[tokio::test]
    async fn local_storage_read_dir_is_sorted_and_skips_hidden() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("b_dir")).unwrap();
        fs::write(tmp.path().join("c.mp3"), b"x").unwrap();
        fs::write(tmp.path().join("a.wav"), b"x").unwrap();
        fs::write(tmp.path().join(".hidden"), b"x").unwrap();
        let mut storage = LocalFileStorage::new(tmp.path().to_str().unwrap());

        let entries = collect(&mut storage, "/").await;
        assert_eq!(
            entries,
            vec![
                ("a.wav".to_owned(), false),
                ("b_dir".to_owned(), true),
                ("c.mp3".to_owned(), false),
            ]
        );
    }

    #[tokio::test]
    async fn local_storage_read_dir_stops_on_break() {
        let tmp = TempDir::new().unwrap();
        for name in ["1.mp3", "2.mp3", "3.mp3"] {
            fs::write(tmp.path().join(name), b"x").unwrap();
        }
        let mut storage = LocalFileStorage::new(tmp.path().to_str().unwrap());
        let mut seen = 0;
        storage
            .read_dir("/", |_| {
                seen += 1;
                if seen == 2 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .await
            .unwrap();
        assert_eq!(seen, 2);
    }

    #[tokio::test]
    async fn local_storage_read_dir_missing_folder_errors() {
        let tmp = TempDir::new().unwrap();
        let mut storage = LocalFileStorage::new(tmp.path().to_str().unwrap());
        assert!(storage.read_dir("/missing", |_| ControlFlow::Continue(())).await.is_err());
    }
}
