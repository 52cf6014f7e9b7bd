//! Keyboard fed from stdin.
//!
//! Terminals deliver whole lines, so every character of a line is one key
//! press and an empty line is Enter.

use std::io::BufRead;
use std::thread;

use platform::{InputDevice, Key};
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// Key source backed by a stdin reader thread.
pub struct StdinKeys {
    chars: UnboundedReceiver<char>,
}

impl StdinKeys {
    /// Start the reader thread.
    pub fn spawn() -> Self {
        let (tx, chars) = mpsc::unbounded_channel();
        thread::spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                let sent = if line.is_empty() {
                    tx.send('\n').is_ok()
                } else {
                    line.chars().all(|c| tx.send(c).is_ok())
                };
                if !sent {
                    break;
                }
            }
            tracing::debug!("stdin closed");
        });
        Self { chars }
    }
}

impl InputDevice for StdinKeys {
    async fn wait_for_key(&mut self) -> Key {
        while let Some(c) = self.chars.recv().await {
            if let Some(key) = Key::from_char(c) {
                return key;
            }
        }
        core::future::pending().await
    }

    fn poll_key(&mut self) -> Option<Key> {
        while let Ok(c) = self.chars.try_recv() {
            if let Some(key) = Key::from_char(c) {
                return Some(key);
            }
            tracing::trace!(?c, "key not in layout");
        }
        None
    }
}
