//! Key dispatcher: turns one key press into a navigation change and/or a
//! playback command.
//!
//! The dispatcher is pure: it reads [`NavigationState`] and returns a
//! [`Dispatch`] describing what should happen. The render task applies the
//! navigation [`Transition`] (some of which need storage) and forwards the
//! [`PlaybackCommand`] to the audio task.
//!
//! | Key            | Folder browser                    | Player                  |
//! |----------------|-----------------------------------|-------------------------|
//! | prev / next    | move cursor                       | move cursor             |
//! | confirm        | open folder, go up, or play here  | play track under cursor |
//! | back           | go up (ignored at `/`)            | stop, back to browser   |
//! | toggle         | ignored                           | pause / resume          |
//! | volume up/down | ignored                           | volume step             |
//! | brightness     | ignored                           | backlight step          |
//! | next/prev/rand | ignored                           | skip                    |

use platform::Key;
use playback::PlaybackCommand;

use crate::inactivity::InactivityTimer;
use crate::mode::Mode;
use crate::navigation::{FolderItem, NavigationState};

/// Navigation change requested by a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Cursor up one item.
    CursorPrev,
    /// Cursor down one item.
    CursorNext,
    /// Descend into the subfolder at this index of the folder list.
    OpenFolder(usize),
    /// Ascend to the parent folder.
    OpenParent,
    /// Publish the current folder's tracks and show the player.
    EnterPlayer,
    /// Return to the browser at `/`.
    LeavePlayer,
}

/// Everything one key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dispatch {
    /// Navigation change, if any.
    pub transition: Option<Transition>,
    /// Command for the audio task, if any.
    pub command: Option<PlaybackCommand>,
    /// Step the backlight.
    pub brightness_up: bool,
}

impl Dispatch {
    fn transition(transition: Transition) -> Self {
        Self {
            transition: Some(transition),
            ..Self::default()
        }
    }

    fn command(command: PlaybackCommand) -> Self {
        Self {
            command: Some(command),
            ..Self::default()
        }
    }

    /// `true` if nothing happens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transition.is_none() && self.command.is_none() && !self.brightness_up
    }

    /// `true` if the command may start a different track.
    #[must_use]
    pub fn changes_track(&self) -> bool {
        matches!(
            self.command,
            Some(
                PlaybackCommand::Select(_)
                    | PlaybackCommand::Next
                    | PlaybackCommand::Previous
                    | PlaybackCommand::Random
                    | PlaybackCommand::Stop
            )
        )
    }
}

/// Maps key presses to [`Dispatch`]es and tracks user activity.
#[derive(Debug, Clone)]
pub struct KeyDispatcher {
    inactivity: InactivityTimer,
}

impl KeyDispatcher {
    /// Dispatcher whose last activity is `now_ms`.
    pub fn new(now_ms: u64) -> Self {
        Self {
            inactivity: InactivityTimer::new(now_ms),
        }
    }

    /// Milliseconds since the last key press.
    #[must_use]
    pub fn idle_ms(&self, now_ms: u64) -> u64 {
        self.inactivity.idle_ms(now_ms)
    }

    /// Dispatch a raw keyboard character. Characters outside the layout
    /// still count as activity but do nothing else.
    pub fn dispatch_char(&mut self, c: char, nav: &NavigationState, now_ms: u64) -> Dispatch {
        match Key::from_char(c) {
            Some(key) => self.dispatch(key, nav, now_ms),
            None => {
                self.inactivity.reset(now_ms);
                Dispatch::default()
            }
        }
    }

    /// Dispatch one key in the current navigation mode.
    pub fn dispatch(&mut self, key: Key, nav: &NavigationState, now_ms: u64) -> Dispatch {
        self.inactivity.reset(now_ms);
        match nav.mode() {
            Mode::FolderSelect => folder_key(key, nav),
            Mode::Player => player_key(key, nav),
        }
    }
}

fn folder_key(key: Key, nav: &NavigationState) -> Dispatch {
    match key {
        Key::NavigatePrev => Dispatch::transition(Transition::CursorPrev),
        Key::NavigateNext => Dispatch::transition(Transition::CursorNext),
        Key::Confirm => match nav.selected_folder_item() {
            FolderItem::Parent => Dispatch::transition(Transition::OpenParent),
            FolderItem::Folder(index) => Dispatch::transition(Transition::OpenFolder(index)),
            FolderItem::Confirm => Dispatch {
                transition: Some(Transition::EnterPlayer),
                command: Some(PlaybackCommand::Select(0)),
                brightness_up: false,
            },
        },
        Key::Back if !nav.at_root() => Dispatch::transition(Transition::OpenParent),
        _ => Dispatch::default(),
    }
}

fn player_key(key: Key, nav: &NavigationState) -> Dispatch {
    match key {
        Key::NavigatePrev => Dispatch::transition(Transition::CursorPrev),
        Key::NavigateNext => Dispatch::transition(Transition::CursorNext),
        Key::Confirm if nav.item_count() > 0 => {
            Dispatch::command(PlaybackCommand::Select(nav.file_cursor()))
        }
        Key::Confirm => Dispatch::default(),
        Key::Back => Dispatch {
            transition: Some(Transition::LeavePlayer),
            command: Some(PlaybackCommand::Stop),
            brightness_up: false,
        },
        Key::TogglePlay => Dispatch::command(PlaybackCommand::TogglePause),
        Key::VolumeUp => Dispatch::command(PlaybackCommand::VolumeUp),
        Key::VolumeDown => Dispatch::command(PlaybackCommand::VolumeDown),
        Key::BrightnessUp => Dispatch {
            brightness_up: true,
            ..Dispatch::default()
        },
        Key::NextTrack => Dispatch::command(PlaybackCommand::Next),
        Key::PrevTrack => Dispatch::command(PlaybackCommand::Previous),
        Key::RandomTrack => Dispatch::command(PlaybackCommand::Random),
    }
}
