//! Top-level application state machine.
//!
//! `AppState` owns the live `GestureConfig`, the tracking `SessionState`, the
//! `Whiteboard`, the dashboard, the calibration panel and the key-press
//! backend. It processes one `Detection` per frame and handles the window's
//! `Command`s.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::time::Instant;

use anyhow::{anyhow, Context};
use gesture_engine::{
    classify_posture, ConfigError, FrameReport, GestureConfig, LandmarkFrame, SessionState,
};
use tracing::{error, info, warn};
use whiteboard::{Whiteboard, WhiteboardError};

use crate::actions::{self, KeyPresser, LogPresser, SlideKey};
use crate::calibration::CalibrationPanel;
use crate::dashboard::Dashboard;
use crate::source::{Detection, HandSource, ReplaySource, SimHandSource, SimInput, SourceError};
use crate::visualizer::{Scene, Visualizer};

// ════════════════════════════════════════════════════════════════════════════
// AppOptions / Command
// ════════════════════════════════════════════════════════════════════════════

/// Process-level options, filled from the command line.
#[derive(Clone, Debug)]
pub struct AppOptions {
    pub profile:      PathBuf,
    /// Landmark replay file; the mouse simulator is used when absent.
    pub replay:       Option<PathBuf>,
    pub headless:     bool,
    pub snapshot_dir: PathBuf,
    pub width:        u32,
    pub height:       u32,
    /// Inject real arrow keys (needs the `keys` feature).
    pub press_keys:   bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        AppOptions {
            profile:      PathBuf::from(gesture_engine::config::PROFILE_FILE),
            replay:       None,
            headless:     false,
            snapshot_dir: PathBuf::from("."),
            width:        1280,
            height:       720,
            press_keys:   false,
        }
    }
}

/// User commands from the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    ClearBoard,
    SaveSnapshot,
    SaveProfile,
    ReloadProfile,
    ToggleCalibration,
    HideCalibration,
    SelectPrev,
    SelectNext,
    /// Move the selected calibration field by this many steps.
    Adjust(i32),
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    // ── configuration ────────────────────────────────────────────────────
    config:       GestureConfig,
    profile_path: PathBuf,

    // ── tracking ─────────────────────────────────────────────────────────
    session:      SessionState,
    report:       FrameReport,
    hand:         Option<LandmarkFrame>,
    frame_size:   (u32, u32),

    // ── outputs ──────────────────────────────────────────────────────────
    board:        Whiteboard,
    presser:      Box<dyn KeyPresser>,
    actions:      Vec<SlideKey>,
    snapshot_dir: PathBuf,

    // ── HUD ──────────────────────────────────────────────────────────────
    dashboard:    Dashboard,
    calibration:  CalibrationPanel,
    pub status:   String,
}

impl AppState {
    pub fn new(
        config:  GestureConfig,
        opts:    &AppOptions,
        presser: Box<dyn KeyPresser>,
        now:     Instant,
    ) -> Self {
        let mut board = Whiteboard::new(opts.width, opts.height);
        board.apply_config(&config);
        let status = format!("Ready - key output: {}", presser.name());

        AppState {
            config,
            profile_path: opts.profile.clone(),
            session:      SessionState::new(),
            report:       FrameReport::default(),
            hand:         None,
            frame_size:   (opts.width, opts.height),
            board,
            presser,
            actions:      Vec::new(),
            snapshot_dir: opts.snapshot_dir.clone(),
            dashboard:    Dashboard::new(now),
            calibration:  CalibrationPanel::new(),
            status,
        }
    }

    // ── process one frame ────────────────────────────────────────────────

    /// Run one detection through the session and apply its effects.
    pub fn process(&mut self, detection: &Detection, now: Instant) -> &FrameReport {
        let (w, h) = self.frame_size;
        self.hand = detection.hands.first().map(|raw| LandmarkFrame::from_normalized(raw, w, h));
        self.dashboard.update(self.hand.is_some(), now);

        let previous = self.report.gesture;
        let report = self.session.step(self.hand.as_ref(), now, &self.config);

        if let Some(segment) = report.segment {
            segment.apply(&mut self.board);
        }
        if let Some(key) = actions::dispatch(report.gesture, &mut *self.presser) {
            self.actions.push(key);
            self.status = format!(
                "{} ({} arrow)",
                report.gesture.action().unwrap_or(report.gesture.label()),
                key.name(),
            );
        } else if report.gesture != previous && report.gesture.swipe().is_none() {
            if let Some(action) = report.gesture.action() {
                info!("{} -> {}", report.gesture, action);
            }
        }

        self.report = report;
        &self.report
    }

    // ── commands ─────────────────────────────────────────────────────────

    /// Apply one window command. Returns `false` when the app should stop.
    pub fn handle_command(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Quit => return false,

            Command::ClearBoard => {
                self.board.clear();
                self.status = "Whiteboard cleared".to_string();
            }

            Command::SaveSnapshot => match self.save_snapshot() {
                Ok(path) => self.status = format!("Saved {}", path.display()),
                Err(e) => {
                    warn!("{}", e);
                    self.status = "Snapshot failed - see log".to_string();
                }
            },

            Command::SaveProfile => match self.save_profile() {
                Ok(()) => self.status = format!("Profile saved to {}", self.profile_path.display()),
                Err(e) => {
                    warn!("{}", e);
                    self.status = "Profile save failed - see log".to_string();
                }
            },

            Command::ReloadProfile => self.reload_profile(),

            Command::ToggleCalibration => self.calibration.toggle(),
            Command::HideCalibration   => self.calibration.hide(),
            Command::SelectPrev        => self.calibration.select_prev(),
            Command::SelectNext        => self.calibration.select_next(),

            Command::Adjust(steps) => {
                if self.calibration.is_visible() {
                    let field = self.calibration.adjust(&mut self.config, steps);
                    self.board.apply_config(&self.config);
                    self.status = format!("{}: {}", field.label(), field.format(&self.config));
                }
            }
        }
        true
    }

    /// Write the whiteboard to `whiteboard_YYYYmmdd_HHMMSS.png` in the
    /// snapshot directory.
    pub fn save_snapshot(&self) -> Result<PathBuf, WhiteboardError> {
        let name = format!("whiteboard_{}.png", chrono::Local::now().format("%Y%m%d_%H%M%S"));
        let path = self.snapshot_dir.join(name);
        self.board.save_png(&path)?;
        Ok(path)
    }

    pub fn save_profile(&self) -> Result<(), ConfigError> {
        self.config.save(&self.profile_path)?;
        info!("profile saved to {}", self.profile_path.display());
        Ok(())
    }

    /// Re-read the profile file. A bad file leaves the current config alone.
    pub fn reload_profile(&mut self) {
        match GestureConfig::load(&self.profile_path) {
            Ok(config) => {
                self.config = config;
                self.board.apply_config(&self.config);
                self.status = format!("Profile reloaded from {}", self.profile_path.display());
            }
            Err(e) => {
                warn!("profile reload failed: {}", e);
                self.status = "Profile reload failed - keeping current settings".to_string();
            }
        }
    }

    /// Save the profile on the way out. Failure is logged, not fatal.
    pub fn shutdown(&mut self) {
        if let Err(e) = self.save_profile() {
            error!("could not save profile on exit: {}", e);
        }
        info!(
            "session ended: {} frames, {} with a hand, {} slide actions",
            self.dashboard.frames(),
            self.dashboard.detected(),
            self.actions.len(),
        );
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn config(&self) -> &GestureConfig         { &self.config }
    pub fn report(&self) -> &FrameReport           { &self.report }
    pub fn board(&self) -> &Whiteboard             { &self.board }
    pub fn dashboard(&self) -> &Dashboard          { &self.dashboard }
    pub fn calibration(&self) -> &CalibrationPanel { &self.calibration }
    pub fn actions(&self) -> &[SlideKey]           { &self.actions }
    pub fn frame_size(&self) -> (u32, u32)         { self.frame_size }

    pub fn scene(&self) -> Scene<'_> {
        let calibrating = self.calibration.is_visible();
        let preview = self
            .report
            .posture
            .filter(|_| calibrating)
            .map(|p| {
                format!(
                    "preview: {}  fingers={} pinch={:.0}px",
                    classify_posture(&p, &self.config).label(),
                    p.fingers_up,
                    p.pinch_distance,
                )
            });
        Scene {
            board:       self.board.get_frame(),
            hand:        self.hand.as_ref(),
            report:      &self.report,
            dashboard:   self.dashboard.lines(),
            calibration: calibrating.then(|| self.calibration.lines(&self.config)),
            preview,
            status:      &self.status,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Startup helpers
// ════════════════════════════════════════════════════════════════════════════

/// Load the profile, falling back to defaults on any error.
pub fn load_config(path: &Path) -> GestureConfig {
    match GestureConfig::load(path) {
        Ok(config) => config,
        Err(e) => {
            warn!("{}; falling back to default settings", e);
            GestureConfig::default()
        }
    }
}

/// Pick the key-press backend.
pub fn make_presser(press_keys: bool) -> anyhow::Result<Box<dyn KeyPresser>> {
    #[cfg(feature = "keys")]
    if press_keys {
        return Ok(Box::new(actions::EnigoPresser::new()?));
    }
    #[cfg(not(feature = "keys"))]
    if press_keys {
        warn!("--press-keys needs the `keys` feature; swipes will only be logged");
    }
    Ok(Box::new(LogPresser::new()))
}

// ════════════════════════════════════════════════════════════════════════════
// run() - the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Opens the window and drives the input/process/render loop at ~60 fps,
/// or hands off to [`run_headless`] when `opts.headless` is set.
pub fn run(opts: AppOptions) -> anyhow::Result<()> {
    let config  = load_config(&opts.profile);
    let presser = make_presser(opts.press_keys)?;
    let start   = Instant::now();
    let mut app = AppState::new(config, &opts, presser, start);

    if opts.headless {
        let path = opts.replay.as_ref().context("--headless needs a --replay file")?;
        let mut source = ReplaySource::open(path, opts.width, opts.height)?;
        run_headless(&mut app, &mut source, start)?;
        return Ok(());
    }

    let (mut source, sim_tx) = open_source(&opts)?;
    info!("landmark source: {}", source.name());

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let (width, height) = source.frame_size();
    let mut vis = Visualizer::new(width, height, sim_tx)
        .map_err(|e| anyhow!("cannot open window: {}", e))?;

    // ── Main loop ─────────────────────────────────────────────────────────
    'frames: while vis.is_open() {
        // 1. Window commands
        for cmd in vis.poll_input() {
            if !app.handle_command(cmd) {
                break 'frames;
            }
        }

        // 2. Next detection
        match source.next_frame() {
            Ok(detection) => {
                app.process(&detection, start + detection.at);
            }
            Err(SourceError::Exhausted) => {
                info!("{} finished", source.name());
                break;
            }
            Err(e) => {
                error!("{}", e);
                break;
            }
        }

        // 3. Render
        vis.render(&app.scene());
    }

    app.shutdown();
    Ok(())
}

/// Pick the windowed landmark source. The returned sender feeds the mouse
/// simulator; with a replay its receiver is dropped here, so window input is
/// discarded instead of queueing up.
pub fn open_source(opts: &AppOptions) -> anyhow::Result<(Box<dyn HandSource>, Sender<SimInput>)> {
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let source: Box<dyn HandSource> = match &opts.replay {
        Some(path) => {
            drop(sim_rx);
            Box::new(ReplaySource::open(path, opts.width, opts.height)?)
        }
        None => Box::new(SimHandSource::new(sim_rx, opts.width, opts.height)),
    };
    Ok((source, sim_tx))
}

/// Drive `source` to the end without a window, then save a snapshot of the
/// board and the profile. Returns the snapshot path.
///
/// A source failure still saves both before the error is returned.
pub fn run_headless(
    app:    &mut AppState,
    source: &mut dyn HandSource,
    start:  Instant,
) -> anyhow::Result<PathBuf> {
    if source.frame_size() != app.frame_size() {
        anyhow::bail!(
            "{} delivers {:?} frames but the board is {:?}",
            source.name(),
            source.frame_size(),
            app.frame_size(),
        );
    }
    info!("headless run over {}", source.name());
    let outcome = loop {
        match source.next_frame() {
            Ok(detection) => {
                app.process(&detection, start + detection.at);
            }
            Err(SourceError::Exhausted) => break Ok(()),
            Err(e) => {
                error!("{}", e);
                break Err(e);
            }
        }
    };

    let snapshot = app.save_snapshot();
    app.shutdown();
    outcome.with_context(|| format!("reading {}", source.name()))?;
    Ok(snapshot?)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{synthesize_hand, SimPosture};
    use gesture_engine::{GestureEvent, Point};
    use std::time::Duration;

    const W: u32 = 640;
    const H: u32 = 480;
    const YELLOW: [u8; 3] = [255, 255, 0];

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("edu_gesture_app_{}_{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn make_app(dir: &Path) -> (AppState, Instant) {
        let opts = AppOptions {
            profile:      dir.join("profile.json"),
            snapshot_dir: dir.to_path_buf(),
            width:        W,
            height:       H,
            ..AppOptions::default()
        };
        let start = Instant::now();
        let app = AppState::new(GestureConfig::default(), &opts, Box::new(LogPresser::new()), start);
        (app, start)
    }

    fn hand_at(ms: u64, posture: SimPosture, x: f32, y: f32) -> Detection {
        Detection {
            at:    Duration::from_millis(ms),
            hands: vec![synthesize_hand(posture, Point::new(x, y)).to_normalized(W, H)],
        }
    }

    fn feed(app: &mut AppState, start: Instant, frames: &[Detection]) -> Vec<GestureEvent> {
        frames.iter().map(|d| app.process(d, start + d.at).gesture).collect()
    }

    #[test]
    fn index_point_draws_after_stabilising() {
        let dir = scratch("draw");
        let (mut app, start) = make_app(&dir);
        let frames: Vec<_> = (0..6)
            .map(|i| hand_at(i * 30, SimPosture::IndexPoint, 100.0 + i as f32 * 20.0, 200.0))
            .collect();
        let gestures = feed(&mut app, start, &frames);
        assert_eq!(&gestures[..3], &[GestureEvent::None; 3]);
        assert_eq!(gestures[5], GestureEvent::IndexPoint);
        assert_eq!(app.board().pixel(190, 200), Some(YELLOW));
        assert!(app.actions().is_empty());
    }

    #[test]
    fn fast_flick_presses_next_slide_once() {
        let dir = scratch("swipe");
        let (mut app, start) = make_app(&dir);
        let mut frames: Vec<_> = (0..4).map(|i| hand_at(i * 30, SimPosture::IndexPoint, 300.0, 200.0)).collect();
        frames.push(hand_at(150, SimPosture::IndexPoint, 500.0, 200.0));
        frames.push(hand_at(180, SimPosture::IndexPoint, 300.0, 200.0)); // inside cooldown
        let gestures = feed(&mut app, start, &frames);
        assert_eq!(gestures[4], GestureEvent::SwipeRight);
        assert_eq!(gestures[5], GestureEvent::IndexPoint);
        assert_eq!(app.actions(), &[SlideKey::Right]);
        assert!(app.status.starts_with("NEXT SLIDE"));
    }

    #[test]
    fn losing_the_hand_counts_in_dashboard() {
        let dir = scratch("dash");
        let (mut app, start) = make_app(&dir);
        app.process(&hand_at(0, SimPosture::Fist, 300.0, 200.0), start);
        app.process(&Detection { at: Duration::from_millis(40), hands: vec![] }, start + Duration::from_millis(40));
        assert_eq!(app.dashboard().frames(), 2);
        assert_eq!(app.dashboard().detected(), 1);
        assert!(!app.report().hand_detected());
        assert!(app.scene().hand.is_none());
    }

    #[test]
    fn clear_command_blanks_board() {
        let dir = scratch("clear");
        let (mut app, start) = make_app(&dir);
        let frames: Vec<_> = (0..6).map(|i| hand_at(i * 30, SimPosture::IndexPoint, 100.0 + i as f32 * 10.0, 200.0)).collect();
        feed(&mut app, start, &frames);
        assert!(!app.board().is_blank());
        assert!(app.handle_command(Command::ClearBoard));
        assert!(app.board().is_blank());
    }

    #[test]
    fn adjust_only_applies_while_panel_open() {
        let dir = scratch("adjust");
        let (mut app, _) = make_app(&dir);
        app.handle_command(Command::Adjust(2));
        assert_eq!(app.config().swipe_threshold, 100.0);

        app.handle_command(Command::ToggleCalibration);
        app.handle_command(Command::Adjust(2));
        assert_eq!(app.config().swipe_threshold, 110.0);

        for _ in 0..4 { app.handle_command(Command::SelectNext); }
        app.handle_command(Command::Adjust(3));
        assert_eq!(app.config().brush_size, 8);
        assert_eq!(app.board().brush_size, 8);

        app.handle_command(Command::HideCalibration);
        assert!(app.scene().calibration.is_none());
    }

    #[test]
    fn profile_save_and_reload() {
        let dir = scratch("profile");
        let (mut app, _) = make_app(&dir);
        app.handle_command(Command::ToggleCalibration);
        app.handle_command(Command::Adjust(-4));
        assert!(app.handle_command(Command::SaveProfile));

        let (mut fresh, _) = make_app(&dir);
        assert_eq!(fresh.config().swipe_threshold, 100.0);
        fresh.handle_command(Command::ReloadProfile);
        assert_eq!(fresh.config().swipe_threshold, 80.0);
    }

    #[test]
    fn bad_profile_reload_keeps_current_settings() {
        let dir = scratch("badprofile");
        let (mut app, _) = make_app(&dir);
        std::fs::write(dir.join("profile.json"), "{\"swipe_threshold\": -1}").unwrap();
        app.handle_command(Command::ReloadProfile);
        assert_eq!(app.config(), &GestureConfig::default());
        assert!(app.status.contains("keeping current"));
    }

    #[test]
    fn load_config_falls_back_on_invalid_file() {
        let dir = scratch("fallback");
        let path = dir.join("broken.json");
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(load_config(&path), GestureConfig::default());
    }

    #[test]
    fn snapshot_lands_in_snapshot_dir() {
        let dir = scratch("snapshot");
        let (mut app, _) = make_app(&dir);
        assert!(app.handle_command(Command::SaveSnapshot));
        let path = app.save_snapshot().unwrap();
        assert!(path.starts_with(&dir));
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("whiteboard_"));
        assert!(path.exists());
    }

    #[test]
    fn replay_source_discards_window_input() {
        let dir = scratch("replay_source");
        let replay = dir.join("empty.jsonl");
        std::fs::write(&replay, "").unwrap();
        let opts = AppOptions { replay: Some(replay), width: W, height: H, ..AppOptions::default() };
        let (source, tx) = open_source(&opts).unwrap();
        assert_eq!(source.frame_size(), (W, H));
        assert!(tx.send(SimInput::ToggleHand).is_err());
    }

    #[test]
    fn sim_source_receives_window_input() {
        let opts = AppOptions { width: W, height: H, ..AppOptions::default() };
        let (mut source, tx) = open_source(&opts).unwrap();
        tx.send(SimInput::Pointer(Some((320.0, 200.0)))).unwrap();
        assert_eq!(source.next_frame().unwrap().hands.len(), 1);
    }

    #[test]
    fn headless_rejects_mismatched_frame_size() {
        let dir = scratch("mismatch");
        let (mut app, start) = make_app(&dir);
        let mut source = ReplaySource::from_reader(std::io::Cursor::new(String::new()), W * 2, H);
        assert!(run_headless(&mut app, &mut source, start).is_err());
    }

    #[test]
    fn quit_stops_the_loop() {
        let dir = scratch("quit");
        let (mut app, _) = make_app(&dir);
        assert!(!app.handle_command(Command::Quit));
    }

    #[test]
    fn calibration_preview_shows_raw_classification() {
        let dir = scratch("preview");
        let (mut app, start) = make_app(&dir);
        app.process(&hand_at(0, SimPosture::OpenPalm, 300.0, 200.0), start);
        assert!(app.scene().preview.is_none());
        app.handle_command(Command::ToggleCalibration);
        let preview = app.scene().preview.unwrap();
        assert!(preview.starts_with("preview: OPEN_PALM"), "{}", preview);
    }
}
