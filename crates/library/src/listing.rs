//! One-level enumeration of a folder into capped [`FolderList`] /
//! [`TrackList`] values.
//!
//! Each call builds a fresh list; callers replace their previous list
//! wholesale.

use core::ops::ControlFlow;

use platform::Storage;

use crate::path;
use crate::scanner::Scanner;
use crate::track::{Folder, FolderList, Track, TrackList};

/// Error type for listing operations.
#[derive(Debug, thiserror_no_std::Error)]
pub enum LibraryError<E: core::fmt::Debug> {
    /// The storage driver failed to enumerate the folder.
    #[error("storage error: {0:?}")]
    Storage(E),
}

/// Immediate subfolders of `dir`, in listing order, capped at
/// [`platform::config::MAX_FOLDERS`].
///
/// Subfolders whose full path would not fit a `PathString` are skipped.
pub async fn list_folders<S: Storage>(
    storage: &mut S,
    dir: &str,
) -> Result<FolderList, LibraryError<S::Error>> {
    let mut folders = FolderList::new();
    storage
        .read_dir(dir, |entry| {
            if !entry.is_dir {
                return ControlFlow::Continue(());
            }
            let Ok(full) = path::join(dir, entry.name) else {
                return ControlFlow::Continue(());
            };
            if folders.push(Folder { path: full }).is_err() {
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        })
        .await
        .map_err(LibraryError::Storage)?;
    Ok(folders)
}

/// Supported files directly inside `dir`, in listing order, capped at
/// [`platform::config::MAX_TRACKS`]. Ordinals are assigned densely from 0.
pub async fn list_tracks<S: Storage>(
    storage: &mut S,
    dir: &str,
) -> Result<TrackList, LibraryError<S::Error>> {
    let mut tracks = TrackList::new();
    storage
        .read_dir(dir, |entry| {
            if entry.is_dir || !Scanner::is_supported_file(entry.name) {
                return ControlFlow::Continue(());
            }
            let Ok(full) = path::join(dir, entry.name) else {
                return ControlFlow::Continue(());
            };
            let ordinal = tracks.len();
            if tracks.push(Track { path: full, ordinal }).is_err() {
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        })
        .await
        .map_err(LibraryError::Storage)?;
    Ok(tracks)
}
