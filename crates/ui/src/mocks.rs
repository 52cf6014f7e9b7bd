//! Recording renderer for tests and the desktop simulator.
#![cfg(any(test, feature = "std"))]

use std::vec::Vec;

use platform::Brightness;

use crate::view::{FolderView, PlayerView, Renderer};

/// Last frame handed to a [`MockRenderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Folder browser frame.
    Folders(FolderView),
    /// Player frame.
    Player(PlayerView),
}

/// Renderer that keeps every frame and backlight change.
#[derive(Debug, Default)]
pub struct MockRenderer {
    /// Frames in draw order.
    pub frames: Vec<Frame>,
    /// Backlight levels in the order they were set.
    pub brightness: Vec<Brightness>,
}

impl MockRenderer {
    /// Empty renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent frame.
    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Most recent player frame, if the last frame was one.
    pub fn last_player(&self) -> Option<&PlayerView> {
        match self.frames.last() {
            Some(Frame::Player(view)) => Some(view),
            _ => None,
        }
    }

    /// Most recent folder frame, if the last frame was one.
    pub fn last_folders(&self) -> Option<&FolderView> {
        match self.frames.last() {
            Some(Frame::Folders(view)) => Some(view),
            _ => None,
        }
    }
}

impl Renderer for MockRenderer {
    type Error = core::convert::Infallible;

    fn draw_folders(&mut self, view: &FolderView) -> Result<(), Self::Error> {
        self.frames.push(Frame::Folders(view.clone()));
        Ok(())
    }

    fn draw_player(&mut self, view: &PlayerView) -> Result<(), Self::Error> {
        self.frames.push(Frame::Player(view.clone()));
        Ok(())
    }

    fn set_brightness(&mut self, brightness: Brightness) -> Result<(), Self::Error> {
        self.brightness.push(brightness);
        Ok(())
    }
}
