//! Integration tests for folder and track enumeration against a real
//! directory tree.
//!
//! Run with: cargo test -p library --test scanner_integration

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing, clippy::arithmetic_side_effects)]

use std::fs;

use library::{list_folders, list_tracks, path};
use platform::storage_local::LocalFileStorage;
use tempfile::TempDir;

fn music_tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("Rock/Live")).unwrap();
    fs::create_dir_all(root.join("Jazz")).unwrap();
    fs::write(root.join("Rock/01 - Opener.mp3"), b"id3").unwrap();
    fs::write(root.join("Rock/02 - Closer.wav"), b"riff").unwrap();
    fs::write(root.join("Rock/notes.txt"), b"...").unwrap();
    fs::write(root.join("Rock/Live/01.MP3"), b"id3").unwrap();
    fs::write(root.join("loose.mp3"), b"id3").unwrap();
    tmp
}

#[tokio::test]
async fn test_root_lists_folders_sorted() {
    let tmp = music_tree();
    let mut storage = LocalFileStorage::new(tmp.path().to_str().unwrap());
    let folders = list_folders(&mut storage, "/").await.unwrap();
    let paths: Vec<_> = folders.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, ["/Jazz", "/Rock"]);
}

#[tokio::test]
async fn test_folder_tracks_skip_unsupported_files() {
    let tmp = music_tree();
    let mut storage = LocalFileStorage::new(tmp.path().to_str().unwrap());
    let tracks = list_tracks(&mut storage, "/Rock").await.unwrap();
    let names: Vec<_> = tracks.iter().map(|t| t.name()).collect();
    assert_eq!(names, ["01 - Opener.mp3", "02 - Closer.wav"]);
}

#[tokio::test]
async fn test_navigating_down_and_back_up() {
    let tmp = music_tree();
    let mut storage = LocalFileStorage::new(tmp.path().to_str().unwrap());

    let rock = list_folders(&mut storage, "/Rock").await.unwrap();
    assert_eq!(rock.len(), 1);
    let live = rock[0].path.clone();
    assert_eq!(live.as_str(), "/Rock/Live");

    let tracks = list_tracks(&mut storage, &live).await.unwrap();
    assert_eq!(tracks.len(), 1);

    let up = path::parent(&live);
    assert_eq!(up, "/Rock");
    assert_eq!(path::parent(up), "/");
}

#[tokio::test]
async fn test_empty_folder_yields_empty_lists() {
    let tmp = music_tree();
    let mut storage = LocalFileStorage::new(tmp.path().to_str().unwrap());
    assert!(list_folders(&mut storage, "/Jazz").await.unwrap().is_empty());
    assert!(list_tracks(&mut storage, "/Jazz").await.unwrap().is_empty());
}
