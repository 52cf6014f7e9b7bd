//! Track and Folder: the records the browser and the playlist are built from.

use heapless::Vec;
use platform::config::{MAX_FOLDERS, MAX_TRACKS};

use crate::path::{self, PathString, PathTooLong};

/// A playable file in the current folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Absolute path on the medium
    pub path: PathString,
    /// Zero-based position in the folder's track list
    pub ordinal: usize,
}

impl Track {
    /// Create a track from an absolute path.
    pub fn new(path: &str, ordinal: usize) -> Result<Self, PathTooLong> {
        Ok(Self {
            path: path::to_owned(path)?,
            ordinal,
        })
    }

    /// File name shown in lists.
    pub fn name(&self) -> &str {
        path::display_name(&self.path)
    }
}

/// An immediate subfolder of the current folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    /// Absolute path on the medium
    pub path: PathString,
}

impl Folder {
    /// Create a folder from an absolute path.
    pub fn new(path: &str) -> Result<Self, PathTooLong> {
        Ok(Self {
            path: path::to_owned(path)?,
        })
    }

    /// Folder name shown in lists.
    pub fn name(&self) -> &str {
        path::display_name(&self.path)
    }
}

/// Subfolders of one folder, in listing order. Entries past
/// [`MAX_FOLDERS`] are dropped.
pub type FolderList = Vec<Folder, MAX_FOLDERS>;

/// Playable files of one folder, in listing order. Entries past
/// [`MAX_TRACKS`] are dropped.
pub type TrackList = Vec<Track, MAX_TRACKS>;
