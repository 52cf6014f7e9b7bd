//! Playback session and audio task: track selection, transport commands,
//! elapsed time and end-of-track auto-advance.
//!
//! The render task never touches [`PlaybackState`] directly: it sends
//! [`PlaybackCommand`]s and reads [`PlaybackSnapshot`]s through a
//! [`PlaybackLink`]; the [`AudioTask`] owns the state and the transport.
#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![allow(async_fn_in_trait)]

pub mod audio_task;
pub mod command;
pub mod link;
pub mod state;

pub use audio_task::{AudioTask, Pace};
pub use command::PlaybackCommand;
pub use link::{PlaybackLink, SnapshotReceiver};
pub use state::{Phase, PlaybackSnapshot, PlaybackState};

// Scenario tests across the state record and the task loop
#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use embassy_sync::mutex::Mutex;
    use library::{Track, TrackList};
    use platform::mocks::{MockStorage, MockTransport};
    use platform::Transport;

    use crate::{AudioTask, Pace, Phase, PlaybackCommand, PlaybackLink};

    fn playlist(paths: &[&str]) -> TrackList {
        let mut list = TrackList::new();
        for (i, p) in paths.iter().enumerate() {
            list.push(Track::new(p, i).unwrap()).unwrap();
        }
        list
    }

    fn storage(paths: &[&str]) -> Mutex<CriticalSectionRawMutex, MockStorage> {
        let mut s = MockStorage::new();
        for p in paths {
            s = s.with_file(p);
        }
        Mutex::new(s)
    }

    const ALBUM: [&str; 3] = ["/A/1.mp3", "/A/2.mp3", "/A/3.mp3"];

    #[tokio::test]
    async fn test_select_loads_then_steps() {
        let link = PlaybackLink::new();
        let sd = storage(&ALBUM);
        link.publish_playlist(playlist(&ALBUM)).await;
        let mut task = AudioTask::new(&link, &sd, MockTransport::new(100), true, 1);

        assert_eq!(task.iterate(0).await, Pace::Idle);

        link.send(PlaybackCommand::Select(1));
        assert_eq!(task.iterate(10).await, Pace::Busy);
        assert_eq!(task.transport().last_opened(), Some("/A/2.mp3"));
        assert_eq!(task.state().phase(), Phase::Playing);

        task.iterate(11).await;
        assert_eq!(task.transport().step_count, 1);
    }

    #[tokio::test]
    async fn test_end_of_track_requests_then_loads_next() {
        let link = PlaybackLink::new();
        let sd = storage(&ALBUM);
        link.publish_playlist(playlist(&ALBUM)).await;
        let mut task = AudioTask::new(&link, &sd, MockTransport::new(1), true, 1);

        link.send(PlaybackCommand::Select(2));
        task.iterate(0).await;
        assert_eq!(task.state().current_track(), 2);

        // One step ends the track: the request is raised, nothing loaded yet.
        task.iterate(1).await;
        assert!(task.state().next_track_requested());
        assert_eq!(task.state().current_track(), 0);
        assert_eq!(task.transport().opened.len(), 1);

        // Next iteration services it.
        task.iterate(2).await;
        assert!(!task.state().next_track_requested());
        assert_eq!(task.transport().last_opened(), Some("/A/1.mp3"));
    }

    #[tokio::test]
    async fn test_missing_file_stops_without_advancing() {
        let link = PlaybackLink::new();
        let sd = storage(&["/A/1.mp3", "/A/3.mp3"]);
        link.publish_playlist(playlist(&ALBUM)).await;
        let mut task = AudioTask::new(&link, &sd, MockTransport::new(10), true, 1);

        link.send(PlaybackCommand::Select(1));
        task.iterate(0).await;
        assert_eq!(task.state().phase(), Phase::Stopped);
        assert_eq!(task.state().current_track(), 1);
        assert!(task.transport().opened.is_empty());

        assert_eq!(task.iterate(1).await, Pace::Idle);
    }

    #[tokio::test]
    async fn test_rejected_source_stops_without_advancing() {
        let link = PlaybackLink::new();
        let sd = storage(&ALBUM);
        link.publish_playlist(playlist(&ALBUM)).await;
        let mut transport = MockTransport::new(10);
        transport.reject("/A/2.mp3");
        let mut task = AudioTask::new(&link, &sd, transport, true, 1);

        link.send(PlaybackCommand::Select(1));
        task.iterate(0).await;
        assert_eq!(task.state().phase(), Phase::Stopped);
        assert_eq!(task.state().current_track(), 1);
        assert!(!task.state().next_track_requested());
        assert_eq!(task.transport().opened, ["/A/2.mp3"]);
        assert!(!task.transport().is_running());

        assert_eq!(task.iterate(1).await, Pace::Idle);
        assert_eq!(task.transport().opened.len(), 1);
    }

    #[tokio::test]
    async fn test_codec_not_ready_never_opens() {
        let link = PlaybackLink::new();
        let sd = storage(&ALBUM);
        link.publish_playlist(playlist(&ALBUM)).await;
        let mut task = AudioTask::new(&link, &sd, MockTransport::new(10), false, 1);

        link.send(PlaybackCommand::Select(0));
        task.iterate(0).await;
        assert!(task.transport().opened.is_empty());
        assert_eq!(task.state().phase(), Phase::Stopped);
    }

    #[tokio::test]
    async fn test_snapshot_follows_every_iteration() {
        let link = PlaybackLink::new();
        let mut rx = link.snapshots().unwrap();
        let sd = storage(&ALBUM);
        link.publish_playlist(playlist(&ALBUM)).await;
        let mut task = AudioTask::new(&link, &sd, MockTransport::new(100), true, 1);

        link.send(PlaybackCommand::Select(0));
        task.iterate(1_000).await;
        task.iterate(3_500).await;
        let snap = rx.try_get().unwrap();
        assert_eq!(snap.track_count, 3);
        assert_eq!(snap.phase, Phase::Playing);
        assert_eq!(snap.elapsed_ms, 2_500);
        assert!(snap.codec_ready);
    }
}
