//! edu_gesture: interactive entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use edu_gesture::app::{run, AppOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "edu_gesture", about = "Gesture slide control and virtual whiteboard")]
struct Cli {
    /// Gesture profile (JSON). Created on exit if missing.
    #[arg(long, default_value = gesture_engine::config::PROFILE_FILE)]
    profile: PathBuf,

    /// Replay recorded landmarks (JSON Lines) instead of the mouse simulator.
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Run without a window; requires --replay.
    #[arg(long, requires = "replay")]
    headless: bool,

    /// Where whiteboard snapshots are written.
    #[arg(long, default_value = ".")]
    snapshot_dir: PathBuf,

    /// Frame width in pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Frame height in pixels.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Press real arrow keys on swipes (build with --features keys).
    #[arg(long)]
    press_keys: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "edu_gesture=info,gesture_engine=info,whiteboard=info".into()),
        )
        .init();

    let cli = Cli::parse();

    if !cli.headless {
        println!();
        println!("╔══════════════════════════════════════════════════════════════╗");
        println!("║        EduGesture: gesture slides & virtual whiteboard       ║");
        println!("╚══════════════════════════════════════════════════════════════╝");
        println!();
        match &cli.replay {
            Some(path) => println!("  Source: replay {}", path.display()),
            None       => println!("  Source: mouse simulator (keys 1-5 pick the hand shape)"),
        }
        println!("  Opening window…");
        println!();
    }

    let opts = AppOptions {
        profile:      cli.profile,
        replay:       cli.replay,
        headless:     cli.headless,
        snapshot_dir: cli.snapshot_dir,
        width:        cli.width.max(1),
        height:       cli.height.max(1),
        press_keys:   cli.press_keys,
    };
    run(opts).context("edu_gesture stopped with an error")
}
