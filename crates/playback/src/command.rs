//! Messages from the input task to the audio task.

/// One user request for the transport.
///
/// Sent through [`crate::PlaybackLink`]; the audio task is the only reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    /// Play the track at this position of the published playlist
    Select(usize),
    /// Play the following track, wrapping to the first
    Next,
    /// Play the preceding track, wrapping to the last
    Previous,
    /// Play a uniformly chosen track
    Random,
    /// Pause, or resume where playback left off
    TogglePause,
    /// Stop output and forget the current track
    Stop,
    /// Raise the output gain one step
    VolumeUp,
    /// Lower the output gain one step
    VolumeDown,
}

impl PlaybackCommand {
    /// `true` for commands that load, replace or drop the current track.
    pub fn changes_track(self) -> bool {
        matches!(
            self,
            PlaybackCommand::Select(_)
                | PlaybackCommand::Next
                | PlaybackCommand::Previous
                | PlaybackCommand::Random
                | PlaybackCommand::TogglePause
                | PlaybackCommand::Stop
        )
    }
}
