//! Playback session record.
//!
//! `PlaybackState` is a pure, allocation-free record of which track is
//! current, what the user intends (play, pause, stop), whether a track load
//! is pending, and the elapsed-time accounting for the current track.
//!
//! It has **no** I/O. The audio task owns the only instance, applies
//! [`PlaybackCommand`]s to it, drives the transport according to it, and
//! publishes [`PlaybackSnapshot`] copies for the render task.

use platform::Volume;
use rand::Rng;

use crate::command::PlaybackCommand;

/// Coarse transport phase, derived from the record's flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing has been loaded yet.
    Idle,
    /// A load has been requested and not yet attempted.
    LoadingTrack,
    /// A track is loaded and being stepped.
    Playing,
    /// A track is loaded; stepping is suspended.
    Paused,
    /// Output was stopped by the user or by a failed load.
    Stopped,
}

/// Read-only copy of the session published to the render task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    /// Position of the current track in the playlist
    pub current_track: usize,
    /// Length of the playlist the position refers to
    pub track_count: usize,
    /// Transport phase
    pub phase: Phase,
    /// Play intent
    pub is_playing: bool,
    /// Milliseconds into the current track
    pub elapsed_ms: u64,
    /// Output gain
    pub volume: Volume,
    /// `false` when audio bring-up failed and nothing can be heard
    pub codec_ready: bool,
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            current_track: 0,
            track_count: 0,
            phase: Phase::Idle,
            is_playing: false,
            elapsed_ms: 0,
            volume: Volume::default(),
            codec_ready: false,
        }
    }
}

/// The playback session.
///
/// Invariant: `current_track < track_count` whenever `track_count > 0`.
/// `next_track_requested` is set by a track change or end of track and
/// cleared only by [`finish_load`](PlaybackState::finish_load), after the
/// load attempt has completed.
#[derive(Debug, Clone)]
pub struct PlaybackState {
    current_track: usize,
    track_count: usize,
    is_playing: bool,
    is_stopped: bool,
    loaded: bool,
    next_track_requested: bool,
    track_started_ms: u64,
    accumulated_ms: u64,
    volume: Volume,
}

impl PlaybackState {
    /// Empty session: no playlist, nothing loaded, default volume.
    pub fn new() -> Self {
        Self {
            current_track: 0,
            track_count: 0,
            is_playing: false,
            is_stopped: false,
            loaded: false,
            next_track_requested: false,
            track_started_ms: 0,
            accumulated_ms: 0,
            volume: Volume::default(),
        }
    }

    /// Record the length of the published playlist.
    ///
    /// A shorter playlist pulls the current position back inside it.
    pub fn set_track_count(&mut self, count: usize) {
        self.track_count = count;
        if self.current_track >= count {
            self.current_track = 0;
        }
    }

    /// Apply one user command. `rng` is only drawn from for
    /// [`PlaybackCommand::Random`].
    ///
    /// Track-changing commands on an empty playlist are ignored.
    pub fn apply<R: Rng>(&mut self, command: PlaybackCommand, now_ms: u64, rng: &mut R) {
        let count = self.track_count;
        match command {
            PlaybackCommand::Select(index) => {
                if count > 0 {
                    self.current_track = if index < count { index } else { 0 };
                    self.request_track(now_ms);
                }
            }
            PlaybackCommand::Next => {
                if count > 0 {
                    self.current_track = wrap_next(self.current_track, count);
                    self.request_track(now_ms);
                }
            }
            PlaybackCommand::Previous => {
                if count > 0 {
                    self.current_track = wrap_prev(self.current_track, count);
                    self.request_track(now_ms);
                }
            }
            PlaybackCommand::Random => {
                if count > 0 {
                    self.current_track = rng.gen_range(0..count);
                    self.request_track(now_ms);
                }
            }
            PlaybackCommand::TogglePause => {
                if !self.loaded {
                    // Nothing to resume: replay the current track.
                    if count > 0 {
                        self.request_track(now_ms);
                    }
                } else if self.is_playing {
                    self.pause(now_ms);
                } else {
                    self.resume(now_ms);
                }
            }
            PlaybackCommand::Stop => self.stop(),
            PlaybackCommand::VolumeUp => self.volume = self.volume.step_up(),
            PlaybackCommand::VolumeDown => self.volume = self.volume.step_down(),
        }
    }

    fn request_track(&mut self, now_ms: u64) {
        self.track_started_ms = now_ms;
        self.accumulated_ms = 0;
        self.is_playing = true;
        self.next_track_requested = true;
    }

    fn stop(&mut self) {
        self.is_playing = false;
        self.is_stopped = true;
        self.loaded = false;
        self.next_track_requested = false;
        self.accumulated_ms = 0;
    }

    /// Position to load if a load is pending and the playlist is non-empty.
    ///
    /// Does not clear the request; see [`finish_load`](Self::finish_load).
    pub fn begin_load(&self) -> Option<usize> {
        (self.next_track_requested && self.track_count > 0).then_some(self.current_track)
    }

    /// Record the outcome of a load attempt and clear the pending request.
    ///
    /// Success starts the elapsed-time clock at `now_ms`. Failure stops
    /// playback and drops play intent, leaving the position unchanged.
    pub fn finish_load(&mut self, opened: bool, now_ms: u64) {
        self.next_track_requested = false;
        self.track_started_ms = now_ms;
        self.accumulated_ms = 0;
        if opened {
            self.loaded = true;
            self.is_stopped = false;
            self.is_playing = true;
        } else {
            self.loaded = false;
            self.is_stopped = true;
            self.is_playing = false;
        }
    }

    /// `true` when the transport should be stepped this iteration.
    pub fn wants_step(&self) -> bool {
        self.loaded
            && self.is_playing
            && !self.is_stopped
            && !self.next_track_requested
            && self.track_count > 0
    }

    /// The loaded track ran out: move to the next one and request its load.
    pub fn on_end_of_track(&mut self) {
        if self.track_count == 0 {
            return;
        }
        self.current_track = wrap_next(self.current_track, self.track_count);
        self.loaded = false;
        self.next_track_requested = true;
    }

    /// Suspend the elapsed-time clock.
    pub fn pause(&mut self, now_ms: u64) {
        self.accumulated_ms = now_ms.saturating_sub(self.track_started_ms);
        self.is_playing = false;
    }

    /// Restart the elapsed-time clock so it continues from where it paused.
    pub fn resume(&mut self, now_ms: u64) {
        self.track_started_ms = now_ms.saturating_sub(self.accumulated_ms);
        self.is_playing = true;
    }

    /// Milliseconds into the current track.
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        if self.loaded && self.is_playing {
            now_ms.saturating_sub(self.track_started_ms)
        } else {
            self.accumulated_ms
        }
    }

    /// Current transport phase.
    pub fn phase(&self) -> Phase {
        if self.next_track_requested {
            Phase::LoadingTrack
        } else if self.is_stopped {
            Phase::Stopped
        } else if !self.loaded {
            Phase::Idle
        } else if self.is_playing {
            Phase::Playing
        } else {
            Phase::Paused
        }
    }

    /// Copy for the render task.
    pub fn snapshot(&self, now_ms: u64, codec_ready: bool) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_track: self.current_track,
            track_count: self.track_count,
            phase: self.phase(),
            is_playing: self.is_playing,
            elapsed_ms: self.elapsed_ms(now_ms),
            volume: self.volume,
            codec_ready,
        }
    }

    /// Position of the current track.
    pub fn current_track(&self) -> usize {
        self.current_track
    }

    /// Length of the playlist.
    pub fn track_count(&self) -> usize {
        self.track_count
    }

    /// Play intent.
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Output was stopped.
    pub fn is_stopped(&self) -> bool {
        self.is_stopped
    }

    /// A load is pending.
    pub fn next_track_requested(&self) -> bool {
        self.next_track_requested
    }

    /// Output gain.
    pub fn volume(&self) -> Volume {
        self.volume
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}

fn wrap_next(index: usize, count: usize) -> usize {
    match index.checked_add(1) {
        Some(next) if next < count => next,
        _ => 0,
    }
}

fn wrap_prev(index: usize, count: usize) -> usize {
    match index.checked_sub(1) {
        Some(prev) if prev < count => prev,
        _ => count.saturating_sub(1),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn playing(count: usize, current: usize) -> PlaybackState {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = PlaybackState::new();
        s.set_track_count(count);
        s.apply(PlaybackCommand::Select(current), 0, &mut rng);
        s.finish_load(true, 0);
        s
    }

    #[test]
    fn test_new_session_is_idle() {
        let s = PlaybackState::new();
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.volume().get(), 10);
        assert_eq!(s.begin_load(), None);
    }

    #[test]
    fn test_next_wraps_and_requests_load() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = playing(3, 2);
        s.apply(PlaybackCommand::Next, 7_000, &mut rng);
        assert_eq!(s.current_track(), 0);
        assert!(s.next_track_requested());
        assert_eq!(s.elapsed_ms(7_000), 0);
        assert_eq!(s.phase(), Phase::LoadingTrack);
    }

    #[test]
    fn test_previous_wraps_to_last() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = playing(4, 0);
        s.apply(PlaybackCommand::Previous, 0, &mut rng);
        assert_eq!(s.current_track(), 3);
    }

    #[test]
    fn test_random_stays_in_range() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut s = playing(5, 0);
        for _ in 0..50 {
            s.apply(PlaybackCommand::Random, 0, &mut rng);
            assert!(s.current_track() < 5);
        }
    }

    #[test]
    fn test_select_out_of_range_falls_back_to_first() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = PlaybackState::new();
        s.set_track_count(2);
        s.apply(PlaybackCommand::Select(9), 0, &mut rng);
        assert_eq!(s.begin_load(), Some(0));
    }

    #[test]
    fn test_track_commands_ignored_without_playlist() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = PlaybackState::new();
        for cmd in [
            PlaybackCommand::Select(0),
            PlaybackCommand::Next,
            PlaybackCommand::Previous,
            PlaybackCommand::Random,
            PlaybackCommand::TogglePause,
        ] {
            s.apply(cmd, 0, &mut rng);
        }
        assert_eq!(s.phase(), Phase::Idle);
        assert!(!s.next_track_requested());
    }

    #[test]
    fn test_request_survives_until_load_finishes() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = PlaybackState::new();
        s.set_track_count(2);
        s.apply(PlaybackCommand::Select(1), 0, &mut rng);
        assert_eq!(s.begin_load(), Some(1));
        assert_eq!(s.begin_load(), Some(1), "begin_load must not consume");
        s.finish_load(true, 10);
        assert_eq!(s.begin_load(), None);
        assert_eq!(s.phase(), Phase::Playing);
    }

    #[test]
    fn test_failed_load_stops_and_keeps_cursor() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = PlaybackState::new();
        s.set_track_count(3);
        s.apply(PlaybackCommand::Select(2), 0, &mut rng);
        s.finish_load(false, 5);
        assert_eq!(s.phase(), Phase::Stopped);
        assert!(!s.is_playing());
        assert!(!s.next_track_requested());
        assert_eq!(s.current_track(), 2);
    }

    #[test]
    fn test_pause_and_resume_keep_elapsed_time() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = playing(1, 0);
        assert_eq!(s.elapsed_ms(3_000), 3_000);
        s.apply(PlaybackCommand::TogglePause, 3_000, &mut rng);
        assert_eq!(s.phase(), Phase::Paused);
        assert_eq!(s.elapsed_ms(60_000), 3_000);
        s.apply(PlaybackCommand::TogglePause, 60_000, &mut rng);
        assert_eq!(s.phase(), Phase::Playing);
        assert_eq!(s.elapsed_ms(61_500), 4_500);
    }

    #[test]
    fn test_toggle_after_stop_replays_current() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = playing(3, 1);
        s.apply(PlaybackCommand::Stop, 0, &mut rng);
        assert_eq!(s.phase(), Phase::Stopped);
        s.apply(PlaybackCommand::TogglePause, 0, &mut rng);
        assert_eq!(s.begin_load(), Some(1));
    }

    #[test]
    fn test_end_of_track_advances_modulo_count() {
        let mut s = playing(3, 2);
        s.on_end_of_track();
        assert_eq!(s.current_track(), 0);
        assert!(s.next_track_requested());
        assert!(!s.wants_step());
    }

    #[test]
    fn test_volume_commands_clamp() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = PlaybackState::new();
        for _ in 0..10 {
            s.apply(PlaybackCommand::VolumeUp, 0, &mut rng);
        }
        assert_eq!(s.volume().get(), 21);
        for _ in 0..10 {
            s.apply(PlaybackCommand::VolumeDown, 0, &mut rng);
        }
        assert_eq!(s.volume().get(), 0);
    }

    #[test]
    fn test_shrinking_playlist_pulls_cursor_inside() {
        let mut s = playing(10, 8);
        s.set_track_count(4);
        assert_eq!(s.current_track(), 0);
    }

    proptest::proptest! {
        #[test]
        fn current_track_always_in_range(
            count in 1usize..20,
            cmds in proptest::collection::vec(0u8..6, 0..100),
        ) {
            let mut rng = SmallRng::seed_from_u64(7);
            let mut s = PlaybackState::new();
            s.set_track_count(count);
            for (t, c) in cmds.into_iter().enumerate() {
                let now = t as u64 * 10;
                match c {
                    0 => s.apply(PlaybackCommand::Next, now, &mut rng),
                    1 => s.apply(PlaybackCommand::Previous, now, &mut rng),
                    2 => s.apply(PlaybackCommand::Random, now, &mut rng),
                    3 => s.apply(PlaybackCommand::Select(t), now, &mut rng),
                    4 => s.on_end_of_track(),
                    _ => s.finish_load(t % 2 == 0, now),
                }
                assert!(s.current_track() < count);
            }
        }
    }
}
