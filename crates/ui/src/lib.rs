//! Application UI layer: navigation state, key dispatch and frame building.
//!
//! Nothing here touches hardware or shared state. The render task owns a
//! [`NavigationState`] and a [`KeyDispatcher`], feeds key presses through
//! [`KeyDispatcher::dispatch`], applies the resulting [`Transition`] and
//! hands [`FolderView`] / [`PlayerView`] frames to a [`Renderer`].
//!
//! This crate is `no_std` by default; it only uses `core` + `heapless`.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]

pub mod dispatch;
pub mod inactivity;
pub mod mocks;
pub mod mode;
pub mod navigation;
pub mod view;

pub use dispatch::{Dispatch, KeyDispatcher, Transition};
pub use inactivity::InactivityTimer;
pub use mode::Mode;
pub use navigation::{FolderItem, ListWindow, NavigationState, FOLDER_ROWS, PLAYER_ROWS};
pub use view::{format_time, slider_y, FolderView, Marquee, PlayerView, Renderer, Row};

#[cfg(any(test, feature = "std"))]
pub use mocks::{Frame, MockRenderer};
