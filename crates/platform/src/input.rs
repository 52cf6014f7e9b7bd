//! Input device abstraction

/// Input device trait for the keyboard
pub trait InputDevice {
    /// Wait for next key (async, power-efficient)
    fn wait_for_key(&mut self) -> impl core::future::Future<Output = Key>;

    /// Poll for a key (non-blocking)
    fn poll_key(&mut self) -> Option<Key>;
}

/// The closed input alphabet the player reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    /// Move the list cursor up
    NavigatePrev,
    /// Move the list cursor down
    NavigateNext,
    /// Open / select the item under the cursor
    Confirm,
    /// Leave the current folder or the player
    Back,
    /// Play/Pause
    TogglePlay,
    /// Volume up
    VolumeUp,
    /// Volume down
    VolumeDown,
    /// Backlight up
    BrightnessUp,
    /// Skip to the next track
    NextTrack,
    /// Skip to the previous track
    PrevTrack,
    /// Jump to a random track
    RandomTrack,
}

impl Key {
    /// Map a character from the built-in keyboard to a key.
    ///
    /// | Char        | Key          |
    /// |-------------|--------------|
    /// | `;`         | NavigatePrev |
    /// | `.`         | NavigateNext |
    /// | `\n`        | Confirm      |
    /// | `` ` `` `\b`| Back         |
    /// | `a` space   | TogglePlay   |
    /// | `v` / `c`   | Volume up / down |
    /// | `l`         | BrightnessUp |
    /// | `n` / `p`   | Next / previous track |
    /// | `r`         | RandomTrack  |
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            ';' => Some(Key::NavigatePrev),
            '.' => Some(Key::NavigateNext),
            '\n' | '\r' => Some(Key::Confirm),
            '`' | '\u{8}' => Some(Key::Back),
            'a' | ' ' => Some(Key::TogglePlay),
            'v' => Some(Key::VolumeUp),
            'c' => Some(Key::VolumeDown),
            'l' => Some(Key::BrightnessUp),
            'n' => Some(Key::NextTrack),
            'p' => Some(Key::PrevTrack),
            'r' => Some(Key::RandomTrack),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Key;

    #[test]
    fn test_layout_maps_navigation_keys() {
        assert_eq!(Key::from_char(';'), Some(Key::NavigatePrev));
        assert_eq!(Key::from_char('.'), Some(Key::NavigateNext));
        assert_eq!(Key::from_char('\n'), Some(Key::Confirm));
    }

    #[test]
    fn test_both_back_keys_map_to_back() {
        assert_eq!(Key::from_char('`'), Some(Key::Back));
        assert_eq!(Key::from_char('\u{8}'), Some(Key::Back));
    }

    #[test]
    fn test_both_play_keys_map_to_toggle() {
        assert_eq!(Key::from_char('a'), Some(Key::TogglePlay));
        assert_eq!(Key::from_char(' '), Some(Key::TogglePlay));
    }

    #[test]
    fn test_unknown_characters_are_ignored() {
        for c in ['x', 'Z', '1', '\t'] {
            assert_eq!(Key::from_char(c), None, "{c:?} should not map to a key");
        }
    }
}
