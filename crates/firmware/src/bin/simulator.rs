//! Desktop simulator
//!
//! Runs the whole control core against simulated hardware: a bus populated
//! with the chosen board's chips, the music folder as storage, stdin as the
//! keyboard and the log as the screen.
//!
//! # Usage
//!
//! ```bash
//! MUSIC_PATH=~/Music cargo run -p firmware --bin simulator --features emulator
//!
//! # Standard board, board identity left to detection, debug logs
//! RUST_LOG=debug cargo run -p firmware --bin simulator --features emulator -- \
//!     --music-path ~/Music --hardware standard
//! ```
//!
//! Keys (type, then Enter): `;` `.` move, empty line confirms, `` ` `` back,
//! `a` play/pause, `v` `c` volume, `l` backlight, `n` `p` `r` track.

use clap::{Parser, ValueEnum};
use embassy_futures::join::join3;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Delay, Instant};
use firmware::audio::MockAmp;
use firmware::board::{AdvancedBoard, BoardHint, BoardVariant, StandardBoard};
use firmware::boot::{boot, Boards};
use firmware::emulator::{sim_bus, LogRenderer, SimHardware, SimTransport, StdinKeys};
use firmware::render_task::RenderTask;
use platform::mocks::{MockPcmOutput, MockPin};
use platform::storage_local::LocalFileStorage;
use platform::PinState;
use playback::{AudioTask, PlaybackLink};

/// Board identity as reported by the (simulated) support package.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Hint {
    Advanced,
    Standard,
    Other,
}

impl From<Hint> for BoardHint {
    fn from(hint: Hint) -> Self {
        match hint {
            Hint::Advanced => BoardHint::Advanced,
            Hint::Standard => BoardHint::Standard,
            Hint::Other => BoardHint::Other,
        }
    }
}

#[derive(Parser)]
#[command(name = "simulator")]
#[command(about = "Pocket player control core on the desktop")]
struct Args {
    /// Folder served as the storage root.
    #[arg(long, env = "MUSIC_PATH", default_value = ".")]
    music_path: String,

    /// Board identity hint; `other` leaves it to bus detection.
    #[arg(long, env = "BOARD_VARIANT", value_enum, default_value_t = Hint::Other)]
    board_variant: Hint,

    /// Chips present on the simulated bus.
    #[arg(long, env = "SIM_HARDWARE", value_enum, default_value_t = SimHardware::Advanced)]
    hardware: SimHardware,

    /// Start with headphones plugged in.
    #[arg(long)]
    headphones: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let args = Args::parse();
    tracing::info!(music_path = %args.music_path, "{}", platform::config::dev_banner());

    let mut bus = sim_bus(args.hardware);
    let mut delay = Delay;
    let mut storage = LocalFileStorage::new(&args.music_path);
    let mut transport = SimTransport::new(&args.music_path);
    let jack = if args.headphones { PinState::Low } else { PinState::High };
    let mut advanced = AdvancedBoard::new(MockAmp::new(), MockPin::new(jack), MockPcmOutput::new());
    let mut standard = StandardBoard::default();

    let report = boot(
        &mut bus,
        &mut delay,
        &mut storage,
        args.board_variant.into(),
        Boards {
            advanced: &mut advanced,
            standard: &mut standard,
        },
        &mut transport,
    )
    .await
    .map_err(|e| anyhow::anyhow!("boot halted: {e}"))?;
    tracing::info!(?report, "boot complete");

    let link = PlaybackLink::new();
    let storage = Mutex::<CriticalSectionRawMutex, _>::new(storage);
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());

    let mut audio = AudioTask::new(&link, &storage, transport, report.codec_ready, seed);
    let mut render = RenderTask::new(
        &link,
        &storage,
        StdinKeys::spawn(),
        LogRenderer::new(),
        Instant::now().as_millis(),
    );
    render.open_root().await;

    let monitor = (report.variant == BoardVariant::Advanced && report.codec_ready)
        .then(|| advanced.into_headphone_monitor());
    let headphones = async {
        match monitor {
            Some(monitor) => monitor.run().await,
            None => core::future::pending::<()>().await,
        }
    };

    join3(audio.run(), render.run(), headphones).await;
    Ok(())
}
