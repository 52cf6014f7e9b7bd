//! Render/input task: the foreground loop.
//!
//! Each [`iterate`](RenderTask::iterate):
//! 0. resends a command the link refused last frame,
//! 1. drains pending keys through the [`KeyDispatcher`], applying the
//!    navigation change before queueing the playback command,
//! 2. picks up the audio task's latest snapshot without waiting on it,
//! 3. hands one frame to the [`Renderer`].
//!
//! Folder and track lists are rebuilt wholesale from storage on every
//! navigation into a folder.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Instant, Timer};
use library::{list_folders, list_tracks, path, FolderList, PathString, TrackList};
use platform::config::RENDER_PERIOD_MS;
use platform::{Brightness, InputDevice, Storage};
use playback::{PlaybackCommand, PlaybackLink, PlaybackSnapshot, SnapshotReceiver};
use ui::{
    Dispatch, FolderView, KeyDispatcher, Marquee, Mode, NavigationState, PlayerView, Renderer,
    Transition,
};

/// Owner of the navigation state, the displayed lists and the renderer.
pub struct RenderTask<'a, S, I, R> {
    link: &'a PlaybackLink,
    storage: &'a Mutex<CriticalSectionRawMutex, S>,
    input: I,
    renderer: R,
    snapshots: Option<SnapshotReceiver<'a>>,
    nav: NavigationState,
    keys: KeyDispatcher,
    current_dir: PathString,
    folders: FolderList,
    tracks: TrackList,
    marquee: Marquee,
    snapshot: PlaybackSnapshot,
    brightness: Brightness,
    held: Option<PlaybackCommand>,
}

impl<'a, S, I, R> RenderTask<'a, S, I, R>
where
    S: Storage,
    I: InputDevice,
    R: Renderer,
{
    /// Build the task at `/`. Call [`open_root`](Self::open_root) before
    /// the first frame.
    pub fn new(
        link: &'a PlaybackLink,
        storage: &'a Mutex<CriticalSectionRawMutex, S>,
        input: I,
        renderer: R,
        now_ms: u64,
    ) -> Self {
        let snapshots = link.snapshots();
        if snapshots.is_none() {
            tracing::warn!("no snapshot receiver left, player view will not update");
        }
        Self {
            link,
            storage,
            input,
            renderer,
            snapshots,
            nav: NavigationState::default(),
            keys: KeyDispatcher::new(now_ms),
            current_dir: path::to_owned(path::ROOT).unwrap_or_default(),
            folders: FolderList::new(),
            tracks: TrackList::new(),
            marquee: Marquee::new(),
            snapshot: PlaybackSnapshot::default(),
            brightness: Brightness::default(),
            held: None,
        }
    }

    /// Navigation as the user currently sees it.
    pub fn nav(&self) -> &NavigationState {
        &self.nav
    }

    /// Folder being browsed.
    pub fn current_dir(&self) -> &str {
        &self.current_dir
    }

    /// Subfolders of [`current_dir`](Self::current_dir).
    pub fn folders(&self) -> &FolderList {
        &self.folders
    }

    /// Tracks shown in the player.
    pub fn tracks(&self) -> &TrackList {
        &self.tracks
    }

    /// Milliseconds since the last key press.
    pub fn idle_ms(&self, now_ms: u64) -> u64 {
        self.keys.idle_ms(now_ms)
    }

    /// The renderer, for inspection.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The input device, e.g. to queue keys from outside.
    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// List `/` and show it in folder-select mode.
    pub async fn open_root(&mut self) {
        let count = self.load_folders(path::ROOT).await;
        self.nav.leave_player(count);
    }

    /// Run one frame at time `now_ms`.
    pub async fn iterate(&mut self, now_ms: u64) {
        if let Some(command) = self.held.take() {
            self.send(command);
        }
        while let Some(key) = self.input.poll_key() {
            let dispatch = self.keys.dispatch(key, &self.nav, now_ms);
            self.apply(dispatch).await;
        }

        self.refresh_snapshot();
        self.draw();
    }

    /// Iterate forever at the render cadence.
    pub async fn run(&mut self) {
        loop {
            self.iterate(Instant::now().as_millis()).await;
            Timer::after_millis(RENDER_PERIOD_MS).await;
        }
    }

    async fn apply(&mut self, dispatch: Dispatch) {
        if let Some(transition) = dispatch.transition {
            self.transition(transition).await;
        }
        if let Some(command) = dispatch.command {
            self.send(command);
        }
        if dispatch.brightness_up {
            self.brightness = self.brightness.step_up();
            tracing::debug!(level = self.brightness.get(), "brightness");
            if let Err(e) = self.renderer.set_brightness(self.brightness) {
                tracing::warn!(error = ?e, "backlight update failed");
            }
        }
    }

    /// Queue `command`, holding it for the next frame if the link refused
    /// it. A newer refused command replaces a held one.
    fn send(&mut self, command: PlaybackCommand) {
        if !self.link.send(command) {
            tracing::debug!(?command, "holding command for next frame");
            self.held = Some(command);
        }
    }

    async fn transition(&mut self, transition: Transition) {
        match transition {
            Transition::CursorPrev => self.nav.move_prev(),
            Transition::CursorNext => self.nav.move_next(),
            Transition::OpenFolder(index) => {
                let Some(folder) = self.folders.get(index) else {
                    return;
                };
                let target = folder.path.clone();
                self.open_dir(&target).await;
            }
            Transition::OpenParent => {
                if path::is_root(&self.current_dir) {
                    return;
                }
                let target = path::parent(&self.current_dir);
                let Ok(target) = path::to_owned(target) else {
                    return;
                };
                self.open_dir(&target).await;
            }
            Transition::EnterPlayer => {
                let tracks = self.load_tracks().await;
                tracing::info!(dir = %self.current_dir, tracks = tracks.len(), "playing folder");
                self.link.publish_playlist(tracks.clone()).await;
                self.nav.enter_player(tracks.len());
                self.tracks = tracks;
                self.marquee.reset();
            }
            Transition::LeavePlayer => {
                self.tracks.clear();
                self.open_root().await;
            }
        }
    }

    async fn open_dir(&mut self, dir: &str) {
        let count = self.load_folders(dir).await;
        self.nav.folders_rebuilt(count, path::is_root(dir));
    }

    /// Replace the folder list with the subfolders of `dir`. On a listing
    /// error the folder is still entered, with no subfolders.
    async fn load_folders(&mut self, dir: &str) -> usize {
        let listed = {
            let mut storage = self.storage.lock().await;
            list_folders(&mut *storage, dir).await
        };
        self.folders = listed.unwrap_or_else(|e| {
            tracing::warn!(dir, error = ?e, "folder listing failed");
            FolderList::new()
        });
        if let Ok(owned) = path::to_owned(dir) {
            self.current_dir = owned;
        }
        tracing::debug!(dir, folders = self.folders.len(), "folder opened");
        self.folders.len()
    }

    async fn load_tracks(&mut self) -> TrackList {
        let listed = {
            let mut storage = self.storage.lock().await;
            list_tracks(&mut *storage, &self.current_dir).await
        };
        listed.unwrap_or_else(|e| {
            tracing::warn!(dir = %self.current_dir, error = ?e, "track listing failed");
            TrackList::new()
        })
    }

    fn refresh_snapshot(&mut self) {
        let Some(latest) = self.snapshots.as_mut().and_then(|rx| rx.try_get()) else {
            return;
        };
        if latest.current_track == self.snapshot.current_track && latest.phase == self.snapshot.phase
        {
            self.marquee.advance();
        } else {
            self.marquee.reset();
        }
        self.snapshot = latest;
    }

    fn draw(&mut self) {
        let drawn = match self.nav.mode() {
            Mode::FolderSelect => {
                let view = FolderView::build(&self.nav, &self.current_dir, &self.folders);
                self.renderer.draw_folders(&view)
            }
            Mode::Player => {
                let view = PlayerView::build(&self.nav, &self.tracks, &self.snapshot, self.marquee);
                self.renderer.draw_player(&view)
            }
        };
        if let Err(e) = drawn {
            tracing::warn!(error = ?e, "frame dropped");
        }
    }
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
    use platform::mocks::{MockInput, MockStorage};
    use platform::Key;
    use playback::PlaybackCommand;
    use ui::{Frame, MockRenderer};

    fn storage() -> Mutex<CriticalSectionRawMutex, MockStorage> {
        Mutex::new(
            MockStorage::new()
                .with_file("/rock/one.mp3")
                .with_file("/rock/two.wav")
                .with_file("/rock/notes.txt")
                .with_dir("/rock/live")
                .with_dir("/jazz"),
        )
    }

    async fn press(task: &mut RenderTask<'_, MockStorage, MockInput, MockRenderer>, keys: &[Key]) {
        for key in keys {
            task.input_mut().push_key(*key).unwrap();
        }
        task.iterate(0).await;
    }

    #[tokio::test]
    async fn test_root_listing_is_drawn() {
        let link = PlaybackLink::new();
        let storage = storage();
        let mut task = RenderTask::new(&link, &storage, MockInput::new(), MockRenderer::new(), 0);
        task.open_root().await;
        task.iterate(0).await;

        let view = task.renderer().last_folders().unwrap();
        let labels: Vec<&str> = view.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["rock", "jazz", ui::view::CONFIRM_LABEL]);
        assert!(view.rows[0].highlighted);
    }

    #[tokio::test]
    async fn test_confirm_on_folder_descends() {
        let link = PlaybackLink::new();
        let storage = storage();
        let mut task = RenderTask::new(&link, &storage, MockInput::new(), MockRenderer::new(), 0);
        task.open_root().await;
        press(&mut task, &[Key::Confirm]).await;

        assert_eq!(task.current_dir(), "/rock");
        assert_eq!(task.folders().len(), 1);
        assert!(!task.nav().at_root());
        assert_eq!(task.nav().folder_cursor(), 0);
        assert!(link.try_receive().is_none());
    }

    #[tokio::test]
    async fn test_back_at_root_changes_nothing() {
        let link = PlaybackLink::new();
        let storage = storage();
        let mut task = RenderTask::new(&link, &storage, MockInput::new(), MockRenderer::new(), 0);
        task.open_root().await;
        press(&mut task, &[Key::NavigateNext]).await;
        let listings = storage.lock().await.listings;
        press(&mut task, &[Key::Back]).await;

        assert_eq!(task.current_dir(), "/");
        assert_eq!(task.nav().folder_cursor(), 1);
        assert_eq!(storage.lock().await.listings, listings);
    }

    #[tokio::test]
    async fn test_play_folder_publishes_then_selects_first() {
        let link = PlaybackLink::new();
        let storage = storage();
        let mut task = RenderTask::new(&link, &storage, MockInput::new(), MockRenderer::new(), 0);
        task.open_root().await;
        // Into /rock: [.., live, confirm]; confirm sits at index 2.
        press(&mut task, &[Key::Confirm, Key::NavigatePrev, Key::Confirm]).await;

        assert_eq!(task.nav().mode(), Mode::Player);
        let published = link.playlist().lock().await.clone();
        let names: Vec<&str> = published.iter().map(|t| t.path.as_str()).collect();
        assert_eq!(names, ["/rock/one.mp3", "/rock/two.wav"]);
        assert_eq!(link.try_receive(), Some(PlaybackCommand::Select(0)));
        assert!(matches!(task.renderer().last_frame(), Some(Frame::Player(_))));
    }

    #[tokio::test]
    async fn test_leaving_player_stops_and_returns_to_root() {
        let link = PlaybackLink::new();
        let storage = storage();
        let mut task = RenderTask::new(&link, &storage, MockInput::new(), MockRenderer::new(), 0);
        task.open_root().await;
        press(&mut task, &[Key::Confirm, Key::NavigatePrev, Key::Confirm]).await;
        let _ = link.try_receive();
        press(&mut task, &[Key::Back]).await;

        assert_eq!(link.try_receive(), Some(PlaybackCommand::Stop));
        assert_eq!(task.nav().mode(), Mode::FolderSelect);
        assert_eq!(task.current_dir(), "/");
        assert!(task.nav().at_root());
        assert!(task.tracks().is_empty());
    }

    #[tokio::test]
    async fn test_brightness_wraps_through_renderer() {
        let link = PlaybackLink::new();
        let storage = storage();
        let mut task = RenderTask::new(&link, &storage, MockInput::new(), MockRenderer::new(), 0);
        task.open_root().await;
        press(&mut task, &[Key::Confirm, Key::NavigatePrev, Key::Confirm]).await;
        press(&mut task, &[Key::BrightnessUp, Key::BrightnessUp]).await;

        let levels: Vec<u8> = task.renderer().brightness.iter().map(|b| b.get()).collect();
        assert_eq!(levels, [192, 0]);
    }

    #[tokio::test]
    async fn test_snapshot_drives_player_view() {
        let link = PlaybackLink::new();
        let storage = storage();
        let mut task = RenderTask::new(&link, &storage, MockInput::new(), MockRenderer::new(), 0);
        task.open_root().await;
        press(&mut task, &[Key::Confirm, Key::NavigatePrev, Key::Confirm]).await;

        link.publish_snapshot(PlaybackSnapshot {
            current_track: 1,
            track_count: 2,
            phase: playback::Phase::Playing,
            is_playing: true,
            elapsed_ms: 65_000,
            codec_ready: true,
            ..PlaybackSnapshot::default()
        });
        task.iterate(0).await;

        let view = task.renderer().last_player().unwrap();
        assert_eq!(view.title.as_deref(), Some("two.wav"));
        assert_eq!(view.time.as_deref(), Some("01:05"));
        assert!(view.rows[1].playing);
        assert_eq!(view.marquee_x, Marquee::START);

        task.iterate(0).await;
        let view = task.renderer().last_player().unwrap();
        assert_eq!(view.marquee_x, Marquee::START - Marquee::STEP);
    }

    #[tokio::test]
    async fn test_full_queue_still_starts_folder_and_retries_volume() {
        let link = PlaybackLink::new();
        let storage = storage();
        let mut task = RenderTask::new(&link, &storage, MockInput::new(), MockRenderer::new(), 0);
        task.open_root().await;
        for _ in 0..playback::link::COMMAND_DEPTH {
            assert!(link.send(PlaybackCommand::VolumeDown));
        }
        press(&mut task, &[Key::Confirm, Key::NavigatePrev, Key::Confirm]).await;
        press(&mut task, &[Key::VolumeUp]).await;

        let drained: Vec<PlaybackCommand> = core::iter::from_fn(|| link.try_receive()).collect();
        assert_eq!(drained.len(), playback::link::COMMAND_DEPTH + 1);
        assert_eq!(drained.last(), Some(&PlaybackCommand::Select(0)));

        task.iterate(1).await;
        assert_eq!(link.try_receive(), Some(PlaybackCommand::VolumeUp));
        assert_eq!(link.try_receive(), None);
    }
}
