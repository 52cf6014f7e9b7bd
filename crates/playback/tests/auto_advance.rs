//! Auto-advance and transport hand-off through the public API.
//!
//! Run with: cargo test -p playback --test auto_advance

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use library::{Track, TrackList};
use platform::mocks::{MockStorage, MockTransport};
use playback::{AudioTask, Phase, PlaybackCommand, PlaybackLink};

fn album(n: usize) -> (TrackList, MockStorage) {
    let mut list = TrackList::new();
    let mut storage = MockStorage::new();
    for i in 0..n {
        let path = format!("/Album/{i:02}.mp3");
        storage = storage.with_file(&path);
        list.push(Track::new(&path, i).unwrap()).unwrap();
    }
    (list, storage)
}

/// A transport that ends after one step cycles through the whole playlist,
/// and never holds two load requests at once.
#[tokio::test]
async fn playlist_cycles_one_request_at_a_time() {
    let (list, storage) = album(3);
    let link = PlaybackLink::new();
    let sd = Mutex::<CriticalSectionRawMutex, _>::new(storage);
    link.publish_playlist(list).await;
    let mut task = AudioTask::new(&link, &sd, MockTransport::new(1), true, 9);

    link.send(PlaybackCommand::Select(0));
    let mut now = 0;
    for _ in 0..12 {
        now += 1;
        let was_requested = task.state().next_track_requested();
        task.iterate(now).await;
        if was_requested {
            assert!(
                !task.state().next_track_requested(),
                "a serviced request must be cleared before the next is raised"
            );
        }
    }

    let opened: Vec<_> = task.transport().opened.iter().map(String::as_str).collect();
    assert_eq!(
        opened,
        [
            "/Album/00.mp3",
            "/Album/01.mp3",
            "/Album/02.mp3",
            "/Album/00.mp3",
            "/Album/01.mp3",
            "/Album/02.mp3"
        ]
    );
}

/// Scenario: three tracks, on the last, "next-track" wraps to the first.
#[tokio::test]
async fn next_on_last_track_wraps_and_resets_elapsed() {
    let (list, storage) = album(3);
    let link = PlaybackLink::new();
    let sd = Mutex::<CriticalSectionRawMutex, _>::new(storage);
    link.publish_playlist(list).await;
    let mut task = AudioTask::new(&link, &sd, MockTransport::default(), true, 9);

    link.send(PlaybackCommand::Select(2));
    task.iterate(0).await;
    task.iterate(4_000).await;
    assert_eq!(task.state().elapsed_ms(4_000), 4_000);

    link.send(PlaybackCommand::Next);
    // Drain the command and service the load in the same iteration.
    task.iterate(5_000).await;
    assert_eq!(task.state().current_track(), 0);
    assert_eq!(task.state().elapsed_ms(5_000), 0);
    assert_eq!(task.transport().last_opened(), Some("/Album/00.mp3"));
}

/// Stop silences the transport and pausing halts stepping.
#[tokio::test]
async fn pause_and_stop_halt_stepping() {
    let (list, storage) = album(2);
    let link = PlaybackLink::new();
    let sd = Mutex::<CriticalSectionRawMutex, _>::new(storage);
    link.publish_playlist(list).await;
    let mut task = AudioTask::new(&link, &sd, MockTransport::default(), true, 9);

    link.send(PlaybackCommand::Select(0));
    task.iterate(0).await;
    task.iterate(1).await;
    let steps = task.transport().step_count;

    link.send(PlaybackCommand::TogglePause);
    task.iterate(2).await;
    task.iterate(3).await;
    assert_eq!(task.state().phase(), Phase::Paused);
    assert_eq!(task.transport().step_count, steps);

    link.send(PlaybackCommand::Stop);
    task.iterate(4).await;
    assert_eq!(task.state().phase(), Phase::Stopped);
    assert!(task.transport().stop_count >= 2);
}

/// Volume commands reach the transport immediately.
#[tokio::test]
async fn volume_commands_reach_transport() {
    let (list, storage) = album(1);
    let link = PlaybackLink::new();
    let sd = Mutex::<CriticalSectionRawMutex, _>::new(storage);
    link.publish_playlist(list).await;
    let mut task = AudioTask::new(&link, &sd, MockTransport::default(), true, 9);
    assert_eq!(task.transport().volume.map(|v| v.get()), Some(10));

    link.send(PlaybackCommand::VolumeUp);
    task.iterate(0).await;
    assert_eq!(task.transport().volume.map(|v| v.get()), Some(14));

    link.send(PlaybackCommand::VolumeDown);
    link.send(PlaybackCommand::VolumeDown);
    task.iterate(1).await;
    assert_eq!(task.transport().volume.map(|v| v.get()), Some(6));
}
