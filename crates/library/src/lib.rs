//! Music library model: folders, tracks and capped directory enumeration.
//!
//! # Modules
//!
//! - [`track`]: `Track` and `Folder` records, list type aliases
//! - [`path`]: absolute path helpers (`parent`, `join`, `display_name`)
//! - [`scanner`]: supported-extension filter
//! - [`listing`]: one-level folder and track enumeration over `platform::Storage`

#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]
#![allow(async_fn_in_trait)]

pub mod listing;
pub mod path;
pub mod scanner;
pub mod track;

// Top-level re-exports for convenience
pub use listing::{list_folders, list_tracks, LibraryError};
pub use path::{PathString, PathTooLong};
pub use scanner::Scanner;
pub use track::{Folder, FolderList, Track, TrackList};
