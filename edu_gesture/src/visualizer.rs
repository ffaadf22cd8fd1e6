//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┬──────────────┐
//! │ GESTURE LABEL                                        │ FPS          │
//! │ Mode: DRAWING                                        │ Detection %  │
//! │                                                      │ Frames       │
//! │ ┌ calibration ┐      whiteboard + hand skeleton      │ Detected     │
//! │ │ > field     │                                      │              │
//! │ └─────────────┘                                      │              │
//! │ status bar                                                          │
//! │ key legend                                                          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The window is the same size as the landmark frame, so mouse pixels map
//! directly onto the simulated hand.

use std::sync::mpsc::Sender;
use std::time::Duration;

use gesture_engine::landmarks::HAND_CONNECTIONS;
use gesture_engine::{FrameReport, LandmarkFrame, Point};
use image::RgbImage;
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use crate::app::Command;
use crate::source::{SimInput, SimPosture};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

const SCALE:         usize = 2;            // font magnification
const GLYPH_W:       usize = 4 * SCALE;    // 3 wide + 1 gap
const LINE_H:        usize = 7 * SCALE;
const MARGIN:        usize = 10;
const PANEL_W:       usize = 300;
const STATUS_H:      usize = 2 * LINE_H + 12;
const HUD_SHADE:     f32   = 0.6;
const SKELETON:      u32   = 0xFF00C800;
const TEXT_COLOR:    u32   = 0xFFEEEEEE;
const DIM_TEXT:      u32   = 0xFF888888;
const DRAWING_COLOR: u32   = 0xFF00FF00;
const READY_COLOR:   u32   = 0xFFFFFFFF;
const PANEL_ACCENT:  u32   = 0xFFFFD700;

/// Everything the renderer needs for one frame.
pub struct Scene<'a> {
    pub board:       &'a RgbImage,
    pub hand:        Option<&'a LandmarkFrame>,
    pub report:      &'a FrameReport,
    pub dashboard:   [String; 4],
    /// Present while the calibration panel is open.
    pub calibration: Option<Vec<String>>,
    /// Raw classifier output with current thresholds, shown under the panel.
    pub preview:     Option<String>,
    pub status:      &'a str,
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:       Window,
    buf:          Vec<u32>,
    width:        usize,
    height:       usize,
    sim_tx:       Sender<SimInput>,
    last_pointer: Option<(f32, f32)>,
}

impl Visualizer {
    pub fn new(width: u32, height: u32, sim_tx: Sender<SimInput>) -> Result<Self, String> {
        let (width, height) = (width as usize, height as usize);
        let mut window = Window::new(
            "EduGesture - gesture slides & whiteboard",
            width, height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| e.to_string())?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![0xFF000000; width * height],
            width,
            height,
            sim_tx,
            last_pointer: None,
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll keyboard and mouse. Application keys come back as [`Command`]s;
    /// simulator keys and mouse motion go to the sim source channel.
    pub fn poll_input(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();
        if !self.window.is_open() {
            commands.push(Command::Quit);
            return commands;
        }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        let held     = |k: Key| self.window.is_key_pressed(k, KeyRepeat::Yes);

        for (key, cmd) in [
            (Key::Q, Command::Quit),
            (Key::C, Command::ClearBoard),
            (Key::S, Command::SaveSnapshot),
            (Key::P, Command::SaveProfile),
            (Key::L, Command::ReloadProfile),
            (Key::K, Command::ToggleCalibration),
            (Key::H, Command::HideCalibration),
        ] {
            if one_shot(key) { commands.push(cmd); }
        }
        if held(Key::Up)    { commands.push(Command::SelectPrev); }
        if held(Key::Down)  { commands.push(Command::SelectNext); }
        if held(Key::Left)  { commands.push(Command::Adjust(-1)); }
        if held(Key::Right) { commands.push(Command::Adjust(1)); }

        // ── Simulator ─────────────────────────────────────────────────────
        let mut sim = Vec::new();
        for (key, posture) in [
            (Key::Key1, SimPosture::IndexPoint),
            (Key::Key2, SimPosture::Fist),
            (Key::Key3, SimPosture::OpenPalm),
            (Key::Key4, SimPosture::Pinch),
            (Key::Key5, SimPosture::TwoFingers),
        ] {
            if one_shot(key) { sim.push(SimInput::Posture(posture)); }
        }
        if one_shot(Key::Key0) { sim.push(SimInput::ToggleHand); }

        let pointer = self.window.get_mouse_pos(MouseMode::Discard);
        if pointer != self.last_pointer {
            self.last_pointer = pointer;
            sim.push(SimInput::Pointer(pointer));
        }
        // Receiver is gone in replay mode; nothing to simulate then.
        for input in sim {
            let _ = self.sim_tx.send(input);
        }

        commands
    }

    /// Render one frame.
    pub fn render(&mut self, scene: &Scene) {
        self.blit_board(scene.board);

        if let Some(hand) = scene.hand {
            self.draw_hand(hand, rgb(scene.report.gesture.color()));
        }

        // ── Gesture + mode (top left) ─────────────────────────────────────
        let gesture = scene.report.gesture;
        self.shade_rect(0, 0, PANEL_W, 2 * LINE_H + 2 * MARGIN);
        self.draw_label(gesture.label(), MARGIN, MARGIN, rgb(gesture.color()));
        let (mode, mode_color) = if gesture.is_drawing() {
            ("Mode: DRAWING", DRAWING_COLOR)
        } else {
            ("Mode: READY", READY_COLOR)
        };
        self.draw_label(mode, MARGIN, MARGIN + LINE_H, mode_color);

        // ── Dashboard (top right) ─────────────────────────────────────────
        let dash_w = 220;
        let dash_x = self.width.saturating_sub(dash_w);
        self.shade_rect(dash_x, 0, dash_w, 4 * LINE_H + 2 * MARGIN);
        for (i, line) in scene.dashboard.iter().enumerate() {
            self.draw_label(line, dash_x + MARGIN, MARGIN + i * LINE_H, TEXT_COLOR);
        }

        // ── Calibration panel ─────────────────────────────────────────────
        if let Some(lines) = &scene.calibration {
            self.draw_calibration(lines, scene.preview.as_deref());
        }

        // ── Status bar + key legend ───────────────────────────────────────
        let status_y = self.height.saturating_sub(STATUS_H);
        self.shade_rect(0, status_y, self.width, STATUS_H);
        self.draw_label(scene.status, MARGIN, status_y + 4, TEXT_COLOR);
        self.draw_label(
            "Q=quit C=clear S=save P=profile L=reload K=calibrate H=hide  1-5=hand 0=show/hide",
            MARGIN, status_y + 4 + LINE_H, DIM_TEXT,
        );

        self.window.update_with_buffer(&self.buf, self.width, self.height).ok();
    }

    // ── Whiteboard ────────────────────────────────────────────────────────

    fn blit_board(&mut self, board: &RgbImage) {
        self.buf.fill(0xFF000000);
        let w = (board.width() as usize).min(self.width);
        let h = (board.height() as usize).min(self.height);
        for y in 0..h {
            for x in 0..w {
                self.buf[y * self.width + x] = rgb(board.get_pixel(x as u32, y as u32).0);
            }
        }
    }

    // ── Hand skeleton ─────────────────────────────────────────────────────

    fn draw_hand(&mut self, hand: &LandmarkFrame, joint_color: u32) {
        for &(a, b) in HAND_CONNECTIONS.iter() {
            self.draw_line(hand.point(a), hand.point(b), SKELETON);
        }
        for &p in hand.points() {
            self.fill_disc(p, 4, joint_color);
        }
    }

    fn draw_line(&mut self, a: Point, b: Point, color: u32) {
        if !(a.x.is_finite() && a.y.is_finite() && b.x.is_finite() && b.y.is_finite()) {
            return;
        }
        let steps = (b.x - a.x).abs().max((b.y - a.y).abs()).ceil().min(4096.0) as usize;
        for i in 0..=steps.max(1) {
            let t = i as f32 / steps.max(1) as f32;
            let x = a.x + (b.x - a.x) * t;
            let y = a.y + (b.y - a.y) * t;
            self.set_pixel_f(x, y, color);
            self.set_pixel_f(x + 1.0, y, color);
        }
    }

    fn fill_disc(&mut self, c: Point, r: i32, color: u32) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set_pixel_f(c.x + dx as f32, c.y + dy as f32, color);
                }
            }
        }
    }

    // ── Calibration ───────────────────────────────────────────────────────

    fn draw_calibration(&mut self, lines: &[String], preview: Option<&str>) {
        let x = 0;
        let y = 2 * LINE_H + 3 * MARGIN;
        let rows = lines.len() + 2 + usize::from(preview.is_some());
        let h = rows * LINE_H + 2 * MARGIN;
        self.shade_rect(x, y, PANEL_W + 120, h);
        self.draw_border(x, y, PANEL_W + 120, h, PANEL_ACCENT);

        self.draw_label("CALIBRATION  up/down=select left/right=adjust", x + MARGIN, y + MARGIN, PANEL_ACCENT);
        let mut ly = y + MARGIN + LINE_H;
        for line in lines {
            let color = if line.starts_with('>') { PANEL_ACCENT } else { TEXT_COLOR };
            self.draw_label(line, x + MARGIN, ly, color);
            ly += LINE_H;
        }
        if let Some(p) = preview {
            ly += LINE_H / 2;
            self.draw_label(p, x + MARGIN, ly, DIM_TEXT);
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    /// Darken a rectangle so text over the whiteboard stays readable.
    fn shade_rect(&mut self, x: usize, y: usize, w: usize, h: usize) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                let px = &mut self.buf[row * self.width + col];
                *px = blend(*px, 0xFF000000, HUD_SHADE);
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..(x + w).min(self.width) {
            self.set_pixel(col, y, color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..(y + h).min(self.height) {
            self.set_pixel(x, row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.buf[y * self.width + x] = color;
        }
    }

    fn set_pixel_f(&mut self, x: f32, y: f32, color: u32) {
        if x >= 0.0 && y >= 0.0 {
            self.set_pixel(x.round() as usize, y.round() as usize, color);
        }
    }

    /// 3×5 bitmap font drawn at `SCALE`.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            if cx + GLYPH_W > self.width { break; }
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) == 0 { continue; }
                    for sy in 0..SCALE {
                        for sx in 0..SCALE {
                            self.set_pixel(cx + col * SCALE + sx, y + row * SCALE + sy, color);
                        }
                    }
                }
            }
            cx += GLYPH_W;
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        '>' => [0b100, 0b010, 0b001, 0b010, 0b100],
        '<' => [0b001, 0b010, 0b100, 0b010, 0b001],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        '[' => [0b110, 0b100, 0b100, 0b100, 0b110],
        ']' => [0b011, 0b001, 0b001, 0b001, 0b011],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Pack an RGB triple as opaque ARGB.
fn rgb(c: [u8; 3]) -> u32 {
    0xFF000000 | (c[0] as u32) << 16 | (c[1] as u32) << 8 | c[2] as u32
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0-t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar,br) << 16) | (lerp(ag,bg) << 8) | lerp(ab,bb)
}
