//! Application configuration and constants
//!
//! This module defines central configuration values used across the application.
//! All branding, limits and task cadences should reference these constants
//! rather than hardcoding values.

/// The application name
pub const APP_NAME: &str = "Pocket Player";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Development mode banner
pub const fn dev_banner() -> &'static str {
    "Pocket Player - Simulator"
}

// ── Limits ───────────────────────────────────────────────────────────────────

/// Tracks kept per folder; further files are ignored.
pub const MAX_TRACKS: usize = 100;

/// Subfolders kept per folder; further entries are ignored.
pub const MAX_FOLDERS: usize = 64;

/// Longest absolute path, in bytes, the player can address.
pub const MAX_PATH_LEN: usize = 128;

// ── Task cadences (milliseconds) ─────────────────────────────────────────────

/// Render/input task period.
pub const RENDER_PERIOD_MS: u64 = 40;

/// Audio task yield while a track is decoding.
pub const AUDIO_BUSY_YIELD_MS: u64 = 1;

/// Audio task yield when there is no transport work.
pub const AUDIO_IDLE_YIELD_MS: u64 = 20;

/// Headphone jack poll period.
pub const HEADPHONE_POLL_MS: u64 = 100;

/// Interval between playback heartbeat log lines.
pub const HEARTBEAT_MS: u64 = 5_000;
