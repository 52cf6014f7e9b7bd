//! Renderer that writes frames to the log.

use core::convert::Infallible;
use core::fmt::Write;

use platform::Brightness;
use ui::{FolderView, PlayerView, Renderer, Row};

/// Logs a frame whenever its content changes. The marquee offset is not
/// part of the content.
#[derive(Debug, Default)]
pub struct LogRenderer {
    last: String,
}

impl LogRenderer {
    /// Renderer with nothing shown yet.
    pub fn new() -> Self {
        Self::default()
    }

    fn show(&mut self, frame: String) {
        if frame != self.last {
            tracing::info!("\n{frame}");
            self.last = frame;
        }
    }
}

fn push_rows(out: &mut String, rows: &[Row]) {
    for row in rows {
        let cursor = if row.highlighted { '>' } else { ' ' };
        let playing = if row.playing { '*' } else { ' ' };
        let _ = writeln!(out, "{cursor}{playing} {}", row.label);
    }
}

impl Renderer for LogRenderer {
    type Error = Infallible;

    fn draw_folders(&mut self, view: &FolderView) -> Result<(), Self::Error> {
        let mut out = String::new();
        let _ = writeln!(out, "[{}]", view.title);
        push_rows(&mut out, &view.rows);
        self.show(out);
        Ok(())
    }

    fn draw_player(&mut self, view: &PlayerView) -> Result<(), Self::Error> {
        let mut out = String::new();
        let state = if view.paused { "paused" } else { "" };
        let _ = writeln!(
            out,
            "{} {} vol {} {state}{}",
            view.title.as_deref().unwrap_or("-"),
            view.time.as_deref().unwrap_or("--:--"),
            view.volume,
            if view.codec_ready { "" } else { " (no audio)" },
        );
        push_rows(&mut out, &view.rows);
        self.show(out);
        Ok(())
    }

    fn set_brightness(&mut self, brightness: Brightness) -> Result<(), Self::Error> {
        tracing::info!(level = brightness.get(), "backlight");
        Ok(())
    }
}
