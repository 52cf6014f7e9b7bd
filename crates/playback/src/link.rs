//! Channels between the input/render task and the audio task.
//!
//! ```text
//!  render task ──PlaybackCommand──► Channel ──► audio task
//!                     (overflow) ──► Signal ───► audio task
//!  render task ──TrackList────────► Mutex ────► audio task
//!  render task ◄─PlaybackSnapshot── Watch ◄──── audio task
//! ```
//!
//! A single [`PlaybackLink`] is built at boot and lent to both tasks.
//!
//! When the queue is full, a track-changing command is parked in a
//! one-slot [`Signal`] instead of being dropped; a later park replaces an
//! earlier one. The audio task reads the slot after the queue, so the
//! newest track request always lands.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_sync::watch::{Receiver, Watch};
use library::TrackList;

use crate::command::PlaybackCommand;
use crate::state::PlaybackSnapshot;

/// Commands that may queue before track requests are parked and volume steps dropped.
pub const COMMAND_DEPTH: usize = 8;

/// Maximum number of snapshot readers.
pub const SNAPSHOT_RECEIVERS: usize = 2;

/// Receiver half handed to the render task.
pub type SnapshotReceiver<'a> =
    Receiver<'a, CriticalSectionRawMutex, PlaybackSnapshot, SNAPSHOT_RECEIVERS>;

/// Shared plumbing between the two tasks.
pub struct PlaybackLink {
    commands: Channel<CriticalSectionRawMutex, PlaybackCommand, COMMAND_DEPTH>,
    parked: Signal<CriticalSectionRawMutex, PlaybackCommand>,
    snapshot: Watch<CriticalSectionRawMutex, PlaybackSnapshot, SNAPSHOT_RECEIVERS>,
    playlist: Mutex<CriticalSectionRawMutex, TrackList>,
}

impl PlaybackLink {
    /// Empty queue, no snapshot yet, empty playlist.
    pub fn new() -> Self {
        Self {
            commands: Channel::new(),
            parked: Signal::new(),
            snapshot: Watch::new(),
            playlist: Mutex::new(TrackList::new()),
        }
    }

    /// Queue a command without waiting.
    ///
    /// On a full queue a track-changing command is parked (replacing any
    /// parked one) and still counts as delivered. Returns `false` only when
    /// a volume command was dropped.
    pub fn send(&self, command: PlaybackCommand) -> bool {
        match self.commands.try_send(command) {
            Ok(()) => true,
            Err(_) if command.changes_track() => {
                tracing::warn!(?command, "playback queue full, parking track request");
                self.parked.signal(command);
                true
            }
            Err(_) => {
                tracing::warn!(?command, "playback queue full, dropping command");
                false
            }
        }
    }

    /// Next queued command, then the parked track request, if any.
    pub fn try_receive(&self) -> Option<PlaybackCommand> {
        self.commands
            .try_receive()
            .ok()
            .or_else(|| self.parked.try_take())
    }

    /// Replace the published playlist wholesale.
    pub async fn publish_playlist(&self, tracks: TrackList) {
        *self.playlist.lock().await = tracks;
    }

    /// Borrow the published playlist.
    pub fn playlist(&self) -> &Mutex<CriticalSectionRawMutex, TrackList> {
        &self.playlist
    }

    /// Publish the latest session copy.
    pub fn publish_snapshot(&self, snapshot: PlaybackSnapshot) {
        self.snapshot.sender().send(snapshot);
    }

    /// A new snapshot reader, or `None` once [`SNAPSHOT_RECEIVERS`] are taken.
    pub fn snapshots(&self) -> Option<SnapshotReceiver<'_>> {
        self.snapshot.receiver()
    }
}

impl Default for PlaybackLink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use library::Track;

    #[test]
    fn test_commands_arrive_in_order() {
        let link = PlaybackLink::new();
        assert!(link.send(PlaybackCommand::Select(2)));
        assert!(link.send(PlaybackCommand::TogglePause));
        assert_eq!(link.try_receive(), Some(PlaybackCommand::Select(2)));
        assert_eq!(link.try_receive(), Some(PlaybackCommand::TogglePause));
        assert_eq!(link.try_receive(), None);
    }

    #[test]
    fn test_full_queue_drops_volume_command() {
        let link = PlaybackLink::new();
        for _ in 0..COMMAND_DEPTH {
            assert!(link.send(PlaybackCommand::VolumeUp));
        }
        assert!(!link.send(PlaybackCommand::VolumeDown));
        for _ in 0..COMMAND_DEPTH {
            assert_eq!(link.try_receive(), Some(PlaybackCommand::VolumeUp));
        }
        assert_eq!(link.try_receive(), None);
    }

    #[test]
    fn test_full_queue_parks_newest_track_request() {
        let link = PlaybackLink::new();
        for _ in 0..COMMAND_DEPTH {
            assert!(link.send(PlaybackCommand::VolumeUp));
        }
        assert!(link.send(PlaybackCommand::Next));
        assert!(link.send(PlaybackCommand::Select(0)));

        for _ in 0..COMMAND_DEPTH {
            assert_eq!(link.try_receive(), Some(PlaybackCommand::VolumeUp));
        }
        assert_eq!(link.try_receive(), Some(PlaybackCommand::Select(0)));
        assert_eq!(link.try_receive(), None);
    }

    #[tokio::test]
    async fn test_snapshot_reader_sees_latest() {
        let link = PlaybackLink::new();
        let mut rx = link.snapshots().unwrap();
        assert_eq!(rx.try_get(), None);
        link.publish_snapshot(PlaybackSnapshot {
            current_track: 1,
            ..PlaybackSnapshot::default()
        });
        link.publish_snapshot(PlaybackSnapshot {
            current_track: 4,
            ..PlaybackSnapshot::default()
        });
        assert_eq!(rx.try_get().unwrap().current_track, 4);
    }

    #[tokio::test]
    async fn test_playlist_is_replaced_wholesale() {
        let link = PlaybackLink::new();
        let mut first = TrackList::new();
        first.push(Track::new("/a.mp3", 0).unwrap()).unwrap();
        first.push(Track::new("/b.mp3", 1).unwrap()).unwrap();
        link.publish_playlist(first).await;

        let mut second = TrackList::new();
        second.push(Track::new("/Album/c.mp3", 0).unwrap()).unwrap();
        link.publish_playlist(second).await;

        let playlist = link.playlist().lock().await;
        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist[0].path.as_str(), "/Album/c.mp3");
    }
}
