//! Frame contents for the two screens and the [`Renderer`] seam.
//!
//! Building a frame is pure: [`FolderView::build`] and [`PlayerView::build`]
//! take the navigation state, the listings and the latest playback snapshot
//! and produce owned, fixed-capacity rows. A [`Renderer`] turns them into
//! pixels.

use core::fmt::Write as _;

use heapless::{String, Vec};
use library::{Folder, Track};
use platform::Brightness;
use playback::{Phase, PlaybackSnapshot};

use crate::navigation::{FolderItem, NavigationState, FOLDER_ROWS, PLAYER_ROWS};

/// Longest label kept per row; longer names are cut.
pub const LABEL_LEN: usize = 40;

/// One row of text.
pub type Label = String<LABEL_LEN>;

/// `MM:SS`, minutes not wrapped.
pub type TimeText = String<8>;

/// Label shown for the parent entry.
pub const PARENT_LABEL: &str = "..";
/// Label shown for the play-this-folder entry.
pub const CONFIRM_LABEL: &str = "[ Play this folder ]";

// ── Formatting helpers ──────────────────────────────────────────────────────

/// Copy `text` into a [`Label`], cutting at a character boundary.
pub fn label(text: &str) -> Label {
    let mut out = Label::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Shown when the elapsed time does not fit a [`TimeText`].
pub const TIME_OVERFLOW: &str = "--:--";

/// Format elapsed milliseconds as `MM:SS`.
pub fn format_time(elapsed_ms: u64) -> TimeText {
    let seconds = elapsed_ms.checked_div(1000).unwrap_or(0);
    let minutes = seconds.checked_div(60).unwrap_or(0);
    let rest = seconds.checked_rem(60).unwrap_or(0);
    let mut out = TimeText::new();
    if write!(out, "{minutes:02}:{rest:02}").is_err() {
        // Past "99999:59".
        return TimeText::try_from(TIME_OVERFLOW).unwrap_or_default();
    }
    out
}

/// Top of the playlist position marker.
pub const SLIDER_TOP: i32 = 8;
/// Travel of the playlist position marker.
pub const SLIDER_TRAVEL: usize = 102;

/// Vertical position of the playlist slider for `index` of `count` tracks.
pub fn slider_y(index: usize, count: usize) -> i32 {
    if count == 0 {
        return SLIDER_TOP;
    }
    let last = count.saturating_sub(1).max(1);
    let index = index.min(last);
    let offset = index
        .saturating_mul(SLIDER_TRAVEL)
        .checked_div(last)
        .unwrap_or(0)
        .min(SLIDER_TRAVEL);
    SLIDER_TOP.saturating_add(i32::try_from(offset).unwrap_or(0))
}

// ── Marquee ─────────────────────────────────────────────────────────────────

/// Horizontally scrolling title offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marquee {
    x: i32,
}

impl Marquee {
    /// Starting x position.
    pub const START: i32 = 90;
    /// Pixels moved per frame.
    pub const STEP: i32 = 2;
    /// Once `x` drops below this it jumps back to [`START`](Self::START).
    pub const LIMIT: i32 = -300;

    /// Marquee at its starting position.
    pub const fn new() -> Self {
        Self { x: Self::START }
    }

    /// Current x position.
    pub fn x(self) -> i32 {
        self.x
    }

    /// Move one frame to the left.
    pub fn advance(&mut self) {
        self.x = self.x.saturating_sub(Self::STEP);
        if self.x < Self::LIMIT {
            self.x = Self::START;
        }
    }

    /// Back to the start, e.g. when the track changes.
    pub fn reset(&mut self) {
        self.x = Self::START;
    }
}

impl Default for Marquee {
    fn default() -> Self {
        Self::new()
    }
}

// ── Views ───────────────────────────────────────────────────────────────────

/// One visible list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Text to draw.
    pub label: Label,
    /// Under the cursor.
    pub highlighted: bool,
    /// The track currently loaded.
    pub playing: bool,
}

/// Folder browser frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderView {
    /// Name of the folder being browsed, `/` at the root.
    pub title: Label,
    /// Visible items.
    pub rows: Vec<Row, FOLDER_ROWS>,
}

impl FolderView {
    /// Frame for the folder `dir` whose subfolders are `folders`.
    pub fn build(nav: &NavigationState, dir: &str, folders: &[Folder]) -> Self {
        let window = nav.visible_window();
        let mut rows = Vec::new();
        let items = (0..nav.item_count()).skip(window.start).take(window.rows);
        for position in items {
            let text = match nav.folder_item(position) {
                FolderItem::Parent => PARENT_LABEL,
                FolderItem::Folder(i) => folders.get(i).map_or("?", Folder::name),
                FolderItem::Confirm => CONFIRM_LABEL,
            };
            let row = Row {
                label: label(text),
                highlighted: position == nav.folder_cursor(),
                playing: false,
            };
            if rows.push(row).is_err() {
                break;
            }
        }
        let title = if library::path::is_root(dir) {
            label("/")
        } else {
            label(library::path::display_name(dir))
        };
        Self { title, rows }
    }
}

/// Player frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerView {
    /// Visible tracks.
    pub rows: Vec<Row, PLAYER_ROWS>,
    /// Name of the loaded track, hidden when stopped or empty.
    pub title: Option<Label>,
    /// Title scroll offset.
    pub marquee_x: i32,
    /// Elapsed time, hidden when stopped.
    pub time: Option<TimeText>,
    /// Slider marker position.
    pub slider_y: i32,
    /// Output gain.
    pub volume: u8,
    /// `true` while paused.
    pub paused: bool,
    /// `false` when bring-up failed and nothing will sound.
    pub codec_ready: bool,
}

impl PlayerView {
    /// Frame for `tracks` given the latest `snapshot`.
    pub fn build(
        nav: &NavigationState,
        tracks: &[Track],
        snapshot: &PlaybackSnapshot,
        marquee: Marquee,
    ) -> Self {
        let window = nav.visible_window();
        let mut rows = Vec::new();
        let visible = tracks.iter().enumerate().skip(window.start).take(window.rows);
        for (position, track) in visible {
            let row = Row {
                label: label(track.name()),
                highlighted: position == nav.file_cursor(),
                playing: position == snapshot.current_track && is_loaded(snapshot.phase),
            };
            if rows.push(row).is_err() {
                break;
            }
        }

        let shows_track = is_loaded(snapshot.phase) && !tracks.is_empty();
        let title = if shows_track {
            tracks.get(snapshot.current_track).map(|t| label(t.name()))
        } else {
            None
        };
        let time = shows_track.then(|| format_time(snapshot.elapsed_ms));

        Self {
            rows,
            title,
            marquee_x: marquee.x(),
            time,
            slider_y: slider_y(snapshot.current_track, tracks.len()),
            volume: snapshot.volume.get(),
            paused: snapshot.phase == Phase::Paused,
            codec_ready: snapshot.codec_ready,
        }
    }
}

fn is_loaded(phase: Phase) -> bool {
    matches!(phase, Phase::Playing | Phase::Paused | Phase::LoadingTrack)
}

// ── Renderer seam ───────────────────────────────────────────────────────────

/// Display backend.
pub trait Renderer {
    /// Error type
    type Error: core::fmt::Debug;

    /// Draw a folder browser frame.
    fn draw_folders(&mut self, view: &FolderView) -> Result<(), Self::Error>;

    /// Draw a player frame.
    fn draw_player(&mut self, view: &PlayerView) -> Result<(), Self::Error>;

    /// Set the backlight level.
    fn set_brightness(&mut self, brightness: Brightness) -> Result<(), Self::Error>;
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;
    use platform::Volume;

    fn tracks(n: usize) -> std::vec::Vec<Track> {
        (0..n)
            .map(|i| Track::new(&std::format!("/Album/{i:02}.mp3"), i).unwrap())
            .collect()
    }

    fn playing(track: usize, elapsed_ms: u64) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_track: track,
            track_count: 12,
            phase: Phase::Playing,
            is_playing: true,
            elapsed_ms,
            volume: Volume::default(),
            codec_ready: true,
        }
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0).as_str(), "00:00");
        assert_eq!(format_time(59_999).as_str(), "00:59");
        assert_eq!(format_time(61_000).as_str(), "01:01");
        assert_eq!(format_time(100 * 60_000).as_str(), "100:00");
    }

    #[test]
    fn test_format_time_overflow() {
        assert_eq!(format_time(99_999 * 60_000 + 59_999).as_str(), "99999:59");
        assert_eq!(format_time(100_000 * 60_000).as_str(), TIME_OVERFLOW);
        assert_eq!(format_time(u64::MAX).as_str(), TIME_OVERFLOW);
    }

    #[test]
    fn test_slider_positions() {
        assert_eq!(slider_y(0, 0), 8);
        assert_eq!(slider_y(0, 1), 8);
        assert_eq!(slider_y(0, 10), 8);
        assert_eq!(slider_y(9, 10), 110);
        assert_eq!(slider_y(1, 3), 59);
        assert_eq!(slider_y(50, 10), 110);
    }

    #[test]
    fn test_marquee_wraps_back_to_start() {
        let mut m = Marquee::new();
        m.advance();
        assert_eq!(m.x(), 88);
        // 90 -> -300 takes 195 steps, the next one wraps.
        for _ in 1..195 {
            m.advance();
        }
        assert_eq!(m.x(), -300);
        m.advance();
        assert_eq!(m.x(), Marquee::START);
    }

    #[test]
    fn test_label_truncates_on_char_boundary() {
        let long = "é".repeat(LABEL_LEN);
        let l = label(&long);
        assert_eq!(l.len(), LABEL_LEN);
        assert!(l.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_folder_view_at_root() {
        let folders = [Folder::new("/Jazz").unwrap(), Folder::new("/Rock").unwrap()];
        let nav = NavigationState::new(folders.len());
        let view = FolderView::build(&nav, "/", &folders);
        assert_eq!(view.title.as_str(), "/");
        let labels: std::vec::Vec<&str> = view.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["Jazz", "Rock", CONFIRM_LABEL]);
        assert!(view.rows[0].highlighted);
    }

    #[test]
    fn test_folder_view_in_subfolder_scrolls() {
        let folders: std::vec::Vec<Folder> = (0..8)
            .map(|i| Folder::new(&std::format!("/Music/{i}")).unwrap())
            .collect();
        let mut nav = NavigationState::new(0);
        nav.folders_rebuilt(folders.len(), false);
        let first = FolderView::build(&nav, "/Music", &folders);
        assert_eq!(first.title.as_str(), "Music");
        assert_eq!(first.rows[0].label.as_str(), PARENT_LABEL);
        assert_eq!(first.rows.len(), FOLDER_ROWS);

        for _ in 0..9 {
            nav.move_next();
        }
        let last = FolderView::build(&nav, "/Music", &folders);
        assert_eq!(last.rows.len(), 3);
        assert_eq!(last.rows[2].label.as_str(), CONFIRM_LABEL);
        assert!(last.rows[2].highlighted);
    }

    #[test]
    fn test_player_view_marks_cursor_and_playing_row() {
        let list = tracks(12);
        let mut nav = NavigationState::new(0);
        nav.enter_player(list.len());
        nav.move_next();
        let view = PlayerView::build(&nav, &list, &playing(3, 65_000), Marquee::new());
        assert_eq!(view.rows.len(), PLAYER_ROWS);
        assert!(view.rows[1].highlighted);
        assert!(view.rows[3].playing);
        assert_eq!(view.title.as_ref().unwrap().as_str(), "03.mp3");
        assert_eq!(view.time.as_ref().unwrap().as_str(), "01:05");
        assert_eq!(view.marquee_x, Marquee::START);
        assert!(!view.paused);
    }

    #[test]
    fn test_player_view_hides_title_and_time_when_stopped() {
        let list = tracks(2);
        let mut nav = NavigationState::new(0);
        nav.enter_player(list.len());
        let snapshot = PlaybackSnapshot {
            phase: Phase::Stopped,
            is_playing: false,
            ..playing(1, 5_000)
        };
        let view = PlayerView::build(&nav, &list, &snapshot, Marquee::new());
        assert_eq!(view.title, None);
        assert_eq!(view.time, None);
        assert!(view.rows.iter().all(|r| !r.playing));
    }

    #[test]
    fn test_player_view_empty_folder() {
        let mut nav = NavigationState::new(0);
        nav.enter_player(0);
        let view = PlayerView::build(&nav, &[], &PlaybackSnapshot::default(), Marquee::new());
        assert!(view.rows.is_empty());
        assert_eq!(view.title, None);
        assert_eq!(view.slider_y, SLIDER_TOP);
    }
}
