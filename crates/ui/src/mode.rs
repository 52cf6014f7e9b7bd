//! Top-level mode: the two screens the player can show.

/// Which list the cursor keys move through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Folder browser.
    #[default]
    FolderSelect,
    /// Playlist and transport view.
    Player,
}
