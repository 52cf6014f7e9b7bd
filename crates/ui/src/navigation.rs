//! Navigation state machine: folder browser vs. player, cursors and the
//! visible list window.
//!
//! The folder browser lists `[..] + subfolders + [Confirm]`, the parent
//! entry only when the current folder is not the root. Cursor movement wraps
//! in both modes; a cursor is never outside its list.

use crate::mode::Mode;

/// Rows visible in the folder browser.
pub const FOLDER_ROWS: usize = 5;
/// Rows visible in the player's track list.
pub const PLAYER_ROWS: usize = 10;

/// What the folder cursor points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderItem {
    /// Go up one level.
    Parent,
    /// The subfolder at this position of the folder list.
    Folder(usize),
    /// Play the current folder.
    Confirm,
}

/// First row and row count of the visible slice of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListWindow {
    /// Index of the first visible item.
    pub start: usize,
    /// Maximum rows shown.
    pub rows: usize,
}

/// Browser and player cursors.
#[derive(Debug, Clone)]
pub struct NavigationState {
    mode: Mode,
    folder_cursor: usize,
    file_cursor: usize,
    view_window_start: usize,
    folder_count: usize,
    at_root: bool,
    track_count: usize,
}

impl NavigationState {
    /// Folder browser at the root with `folder_count` subfolders.
    pub fn new(folder_count: usize) -> Self {
        Self {
            mode: Mode::FolderSelect,
            folder_cursor: 0,
            file_cursor: 0,
            view_window_start: 0,
            folder_count,
            at_root: true,
            track_count: 0,
        }
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Folder cursor, an index into the browser items.
    #[must_use]
    pub fn folder_cursor(&self) -> usize {
        self.folder_cursor
    }

    /// Track cursor in the player list.
    #[must_use]
    pub fn file_cursor(&self) -> usize {
        self.file_cursor
    }

    /// `true` when the browser is showing `/`.
    #[must_use]
    pub fn at_root(&self) -> bool {
        self.at_root
    }

    /// Items the cursor moves through in the current mode.
    #[must_use]
    pub fn item_count(&self) -> usize {
        match self.mode {
            Mode::FolderSelect => self.folder_item_count(),
            Mode::Player => self.track_count,
        }
    }

    fn folder_item_count(&self) -> usize {
        let parent = usize::from(!self.at_root);
        self.folder_count.saturating_add(parent).saturating_add(1)
    }

    fn cursor_mut(&mut self) -> &mut usize {
        match self.mode {
            Mode::FolderSelect => &mut self.folder_cursor,
            Mode::Player => &mut self.file_cursor,
        }
    }

    fn cursor(&self) -> usize {
        match self.mode {
            Mode::FolderSelect => self.folder_cursor,
            Mode::Player => self.file_cursor,
        }
    }

    /// Move the cursor up, wrapping from the first item to the last.
    pub fn move_prev(&mut self) {
        let count = self.item_count();
        if count == 0 {
            return;
        }
        let cursor = self.cursor_mut();
        *cursor = match cursor.checked_sub(1) {
            Some(prev) if prev < count => prev,
            _ => count.saturating_sub(1),
        };
        self.update_window();
    }

    /// Move the cursor down, wrapping from the last item to the first.
    pub fn move_next(&mut self) {
        let count = self.item_count();
        if count == 0 {
            return;
        }
        let cursor = self.cursor_mut();
        *cursor = match cursor.checked_add(1) {
            Some(next) if next < count => next,
            _ => 0,
        };
        self.update_window();
    }

    /// Meaning of the folder cursor's item.
    #[must_use]
    pub fn selected_folder_item(&self) -> FolderItem {
        self.folder_item(self.folder_cursor)
    }

    /// Meaning of the browser item at `position`.
    #[must_use]
    pub fn folder_item(&self, position: usize) -> FolderItem {
        let index = if self.at_root {
            position
        } else {
            match position.checked_sub(1) {
                None => return FolderItem::Parent,
                Some(index) => index,
            }
        };
        if index < self.folder_count {
            FolderItem::Folder(index)
        } else {
            FolderItem::Confirm
        }
    }

    /// The browser moved to a new folder holding `folder_count` subfolders.
    pub fn folders_rebuilt(&mut self, folder_count: usize, at_root: bool) {
        self.folder_count = folder_count;
        self.at_root = at_root;
        self.folder_cursor = 0;
        self.update_window();
    }

    /// Switch to the player showing `track_count` tracks.
    pub fn enter_player(&mut self, track_count: usize) {
        self.mode = Mode::Player;
        self.track_count = track_count;
        self.file_cursor = 0;
        self.update_window();
    }

    /// Return to the browser at the root holding `folder_count` subfolders.
    pub fn leave_player(&mut self, folder_count: usize) {
        self.mode = Mode::FolderSelect;
        self.track_count = 0;
        self.file_cursor = 0;
        self.folders_rebuilt(folder_count, true);
    }

    /// Slice of the current list to draw.
    #[must_use]
    pub fn visible_window(&self) -> ListWindow {
        let rows = match self.mode {
            Mode::FolderSelect => FOLDER_ROWS,
            Mode::Player => PLAYER_ROWS,
        };
        ListWindow {
            start: self.view_window_start,
            rows,
        }
    }

    fn update_window(&mut self) {
        let half = match self.mode {
            Mode::FolderSelect => FOLDER_ROWS / 2,
            Mode::Player => PLAYER_ROWS / 2,
        };
        self.view_window_start = self.cursor().saturating_sub(half);
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[test]
    fn test_root_items_are_folders_then_confirm() {
        let nav = NavigationState::new(2);
        assert_eq!(nav.item_count(), 3);
        assert_eq!(nav.selected_folder_item(), FolderItem::Folder(0));
    }

    #[test]
    fn test_empty_root_has_only_confirm() {
        let nav = NavigationState::new(0);
        assert_eq!(nav.selected_folder_item(), FolderItem::Confirm);
    }

    #[test]
    fn test_subfolder_starts_with_parent() {
        let mut nav = NavigationState::new(3);
        nav.folders_rebuilt(2, false);
        assert_eq!(nav.selected_folder_item(), FolderItem::Parent);
        nav.move_next();
        assert_eq!(nav.selected_folder_item(), FolderItem::Folder(0));
        nav.move_next();
        nav.move_next();
        assert_eq!(nav.selected_folder_item(), FolderItem::Confirm);
        nav.move_next();
        assert_eq!(nav.selected_folder_item(), FolderItem::Parent);
    }

    #[test]
    fn test_prev_wraps_to_last_item() {
        let mut nav = NavigationState::new(4);
        nav.move_prev();
        assert_eq!(nav.folder_cursor(), 4);
        assert_eq!(nav.selected_folder_item(), FolderItem::Confirm);
    }

    #[test]
    fn test_folder_window_keeps_cursor_centered() {
        let mut nav = NavigationState::new(10);
        for _ in 0..6 {
            nav.move_next();
        }
        assert_eq!(nav.visible_window(), ListWindow { start: 4, rows: 5 });
        nav.move_prev();
        nav.move_prev();
        nav.move_prev();
        nav.move_prev();
        assert_eq!(nav.visible_window().start, 0);
    }

    #[test]
    fn test_enter_player_resets_file_cursor() {
        let mut nav = NavigationState::new(1);
        nav.enter_player(12);
        assert_eq!(nav.mode(), Mode::Player);
        assert_eq!(nav.file_cursor(), 0);
        for _ in 0..8 {
            nav.move_next();
        }
        assert_eq!(nav.visible_window(), ListWindow { start: 3, rows: 10 });
        nav.move_prev();
        assert_eq!(nav.file_cursor(), 7);
    }

    #[test]
    fn test_player_with_no_tracks_ignores_cursor_keys() {
        let mut nav = NavigationState::new(1);
        nav.enter_player(0);
        nav.move_next();
        nav.move_prev();
        assert_eq!(nav.file_cursor(), 0);
    }

    #[test]
    fn test_leave_player_returns_to_root() {
        let mut nav = NavigationState::new(1);
        nav.folders_rebuilt(3, false);
        nav.enter_player(5);
        nav.move_next();
        nav.leave_player(7);
        assert_eq!(nav.mode(), Mode::FolderSelect);
        assert!(nav.at_root());
        assert_eq!(nav.folder_cursor(), 0);
        assert_eq!(nav.item_count(), 8);
    }

    proptest::proptest! {
        #[test]
        fn cursor_stays_in_range_and_wraps(
            folders in 0usize..20,
            at_root in proptest::bool::ANY,
            presses in proptest::collection::vec(proptest::bool::ANY, 0..200),
        ) {
            let mut nav = NavigationState::new(folders);
            nav.folders_rebuilt(folders, at_root);
            let count = nav.item_count();
            for next in presses {
                let before = nav.folder_cursor();
                if next {
                    nav.move_next();
                    let expected = if before == count - 1 { 0 } else { before + 1 };
                    assert_eq!(nav.folder_cursor(), expected);
                } else {
                    nav.move_prev();
                    let expected = if before == 0 { count - 1 } else { before - 1 };
                    assert_eq!(nav.folder_cursor(), expected);
                }
                assert!(nav.folder_cursor() < count);
                let window = nav.visible_window();
                assert!(window.start <= nav.folder_cursor());
                assert!(nav.folder_cursor() < window.start + window.rows);
            }
        }
    }
}
