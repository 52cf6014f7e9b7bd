//! Audio task: the consumer loop that drives the transport.
//!
//! Each [`iterate`](AudioTask::iterate) does exactly one of:
//! 1. service a pending track load (stop, check the file, open it),
//! 2. advance the transport by one step and detect end of track,
//! 3. nothing.
//!
//! and reports how long the caller should yield before the next iteration.
//! [`run`](AudioTask::run) wraps this in the forever-loop with embassy
//! timers.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Instant, Timer};
use library::PathString;
use platform::config::{AUDIO_BUSY_YIELD_MS, AUDIO_IDLE_YIELD_MS, HEARTBEAT_MS};
use platform::{Storage, Transport};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::command::PlaybackCommand;
use crate::link::PlaybackLink;
use crate::state::PlaybackState;

/// How soon the loop wants to run again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    /// Transport work was done; come back after the short yield.
    Busy,
    /// Nothing to do; come back after the long yield.
    Idle,
}

impl Pace {
    /// Yield duration for this pace.
    pub fn yield_ms(self) -> u64 {
        match self {
            Pace::Busy => AUDIO_BUSY_YIELD_MS,
            Pace::Idle => AUDIO_IDLE_YIELD_MS,
        }
    }
}

/// Owner of the playback session and the transport.
pub struct AudioTask<'a, T, S> {
    link: &'a PlaybackLink,
    storage: &'a Mutex<CriticalSectionRawMutex, S>,
    transport: T,
    state: PlaybackState,
    codec_ready: bool,
    rng: SmallRng,
    last_heartbeat_ms: u64,
}

impl<'a, T: Transport, S: Storage> AudioTask<'a, T, S> {
    /// Build the task. `codec_ready` is the bring-up outcome; when `false`
    /// tracks are never opened. `seed` feeds random track selection.
    pub fn new(
        link: &'a PlaybackLink,
        storage: &'a Mutex<CriticalSectionRawMutex, S>,
        mut transport: T,
        codec_ready: bool,
        seed: u64,
    ) -> Self {
        let state = PlaybackState::new();
        transport.set_volume(state.volume());
        Self {
            link,
            storage,
            transport,
            state,
            codec_ready,
            rng: SmallRng::seed_from_u64(seed),
            last_heartbeat_ms: 0,
        }
    }

    /// The session as the task currently sees it.
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// The transport, for inspection.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run one bounded iteration at time `now_ms`.
    pub async fn iterate(&mut self, now_ms: u64) -> Pace {
        while let Some(command) = self.link.try_receive() {
            self.handle(command, now_ms).await;
        }

        let pace = if let Some(index) = self.state.begin_load() {
            self.load(index, now_ms).await;
            Pace::Busy
        } else if self.codec_ready && self.state.wants_step() {
            self.transport.step().await;
            if !self.transport.is_running() {
                tracing::info!(
                    track = self.state.current_track(),
                    "end of track, advancing"
                );
                self.state.on_end_of_track();
            }
            Pace::Busy
        } else {
            Pace::Idle
        };

        self.heartbeat(now_ms);
        self.link
            .publish_snapshot(self.state.snapshot(now_ms, self.codec_ready));
        pace
    }

    /// Iterate forever, yielding between iterations.
    pub async fn run(&mut self) {
        loop {
            let pace = self.iterate(Instant::now().as_millis()).await;
            Timer::after_millis(pace.yield_ms()).await;
        }
    }

    async fn handle(&mut self, command: PlaybackCommand, now_ms: u64) {
        tracing::debug!(?command, "playback command");
        match command {
            PlaybackCommand::Stop => {
                self.transport.stop().await;
                self.state.apply(command, now_ms, &mut self.rng);
            }
            PlaybackCommand::VolumeUp | PlaybackCommand::VolumeDown => {
                self.state.apply(command, now_ms, &mut self.rng);
                self.transport.set_volume(self.state.volume());
            }
            _ => {
                let count = self.link.playlist().lock().await.len();
                self.state.set_track_count(count);
                self.state.apply(command, now_ms, &mut self.rng);
            }
        }
    }

    async fn load(&mut self, index: usize, now_ms: u64) {
        self.transport.stop().await;

        let path: Option<PathString> = {
            let playlist = self.link.playlist().lock().await;
            self.state.set_track_count(playlist.len());
            playlist.get(index).map(|t| t.path.clone())
        };
        let Some(path) = path else {
            tracing::warn!(index, "track vanished from playlist");
            self.state.finish_load(false, now_ms);
            return;
        };

        let exists = match self.storage.lock().await.exists(&path).await {
            Ok(exists) => exists,
            Err(_) => {
                tracing::warn!(path = path.as_str(), "storage error while checking track");
                false
            }
        };

        let opened = if !exists {
            tracing::warn!(path = path.as_str(), "track missing");
            false
        } else if !self.codec_ready {
            tracing::warn!(path = path.as_str(), "codec not ready, not opening");
            false
        } else if self.transport.open(&path).await {
            tracing::info!(index, path = path.as_str(), "playing");
            true
        } else {
            tracing::warn!(path = path.as_str(), "transport rejected track");
            false
        };

        self.state.finish_load(opened, now_ms);
        self.last_heartbeat_ms = now_ms;
    }

    fn heartbeat(&mut self, now_ms: u64) {
        if !self.state.wants_step() {
            return;
        }
        if now_ms.saturating_sub(self.last_heartbeat_ms) < HEARTBEAT_MS {
            return;
        }
        self.last_heartbeat_ms = now_ms;
        tracing::info!(
            track = self.state.current_track(),
            of = self.state.track_count(),
            volume = self.state.volume().get(),
            elapsed_ms = self.state.elapsed_ms(now_ms),
            "heartbeat"
        );
    }
}
