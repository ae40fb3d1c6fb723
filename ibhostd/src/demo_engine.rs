//! # Demo Engine
//!
//! A small built-in presentation engine so the host runs without an external
//! interpreter. It loads a title and menu from the carousel, retrying while
//! the object has not arrived, and drives every surface kind.
//!
//! ## Content
//!
//! - `~/title.txt` (required): first line is the title, following lines are menu items
//! - `~/backdrop.png` (optional): tiled behind the scene
//!
//! ## Keys
//!
//! - Up/Down move the cursor, Left/Right slide the panel
//! - Digits type into the entry field, Cancel clears it, Select toggles the highlight
//! - Red/Green/Yellow switch the input register to navigation/numeric/all
//! - Blue toggles the (unrendered) video window, Text tries to tune away

use crate::context::EngineHost;
use crate::engine::PresentationEngine;
use graphics_rasterizer::{
    BitmapSurface, Canvas, Color, LineArtSurface, Point, Rect, RenderingSurface, TextSurface,
    TEXT_HEIGHT_FACTOR,
};
use input_types::{ActionCode, InputRegister};
use services_carousel::CarouselError;
use std::collections::VecDeque;
use tracing::{debug, info, warn};

pub const STARTUP_OBJECT: &str = "~/title.txt";
pub const BACKDROP_OBJECT: &str = "~/backdrop.png";

/// Delay between probes while the startup object has not arrived
pub const LOAD_RETRY_MS: i32 = 250;

const MAX_MENU_ITEMS: usize = 6;
const MAX_ENTRY_DIGITS: usize = 4;

const PANEL_Y: i32 = 60;
const PANEL_WIDTH: u32 = 400;
const PANEL_HEIGHT: u32 = 360;
const ROW_HEIGHT: i32 = 36;
const MENU_TOP: i32 = 70;
const PANEL_STEP: i32 = 20;

/// Damage covering any frame; the compositor clips it
const WHOLE_SCREEN: Rect = Rect::sized(i32::MAX as u32, i32::MAX as u32);

const INK: Color = Color::WHITE;
const ACCENT: Color = Color::rgb(255, 200, 0);
const PANEL_FILL: Color = Color::with_transparency(0, 0, 80, 64);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Booting,
    Loading { attempts: u32 },
    Running,
    Failed { reason: String },
}

/// Surfaces making up the display tree
#[derive(Debug)]
struct Scene {
    /// Static layers, back to front, at panel-relative offsets
    layers: Vec<(RenderingSurface, i32, i32)>,
    backdrop: Option<BitmapSurface>,
    cursor: LineArtSurface,
    entry: TextSurface,
    status: TextSurface,
}

/// Built-in engine
#[derive(Debug)]
pub struct DemoEngine {
    phase: Phase,
    pending: VecDeque<ActionCode>,
    title: String,
    items: Vec<String>,
    cursor: usize,
    entry: String,
    highlight: bool,
    panel_x: i32,
    status: String,
    scene: Option<Scene>,
}

impl Default for DemoEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoEngine {
    pub fn new() -> Self {
        Self {
            phase: Phase::Booting,
            pending: VecDeque::new(),
            title: String::new(),
            items: Vec::new(),
            cursor: 0,
            entry: String::new(),
            highlight: false,
            panel_x: 40,
            status: String::new(),
            scene: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn panel_area(&self) -> Rect {
        Rect::new(self.panel_x, PANEL_Y, PANEL_WIDTH, PANEL_HEIGHT)
    }

    fn load(&mut self, host: &mut dyn EngineHost) -> i32 {
        let bytes = match host.fetch(STARTUP_OBJECT) {
            Ok(bytes) => bytes,
            Err(err) => return self.not_ready(host, err),
        };
        let text = String::from_utf8_lossy(&bytes);
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
        self.title = lines.next().unwrap_or("Untitled").to_string();
        self.items = lines.take(MAX_MENU_ITEMS).map(str::to_string).collect();
        self.cursor = 0;
        self.entry.clear();
        self.status.clear();

        let backdrop = if host.probe(BACKDROP_OBJECT) {
            host.fetch(BACKDROP_OBJECT).ok().and_then(|bytes| {
                let mut bitmap = host.display().create_bitmap(true);
                match bitmap.decode_still(&bytes) {
                    Ok(()) => Some(bitmap),
                    Err(err) => {
                        warn!(error = %err, "backdrop ignored");
                        None
                    }
                }
            })
        } else {
            None
        };

        self.scene = Some(self.build_scene(host, backdrop));
        self.phase = Phase::Running;
        info!(title = %self.title, items = self.items.len(), "startup content loaded");

        host.set_input_register(InputRegister::ALL);
        host.request_redraw(WHOLE_SCREEN);
        -1
    }

    fn not_ready(&mut self, host: &mut dyn EngineHost, err: CarouselError) -> i32 {
        if err.is_retryable() {
            if let Phase::Loading { attempts } = &mut self.phase {
                *attempts += 1;
                debug!(attempts = *attempts, path = err.path(), "startup object not arrived");
            }
            return LOAD_RETRY_MS;
        }

        warn!(error = %err, "startup content unavailable");
        let reason = err.to_string();
        let mut message = host.display().create_text();
        message.set_font(20, true, false);
        message.add_text(0, 0, &reason, ACCENT);
        self.scene = Some(Scene {
            layers: vec![(message.into(), 0, 0)],
            backdrop: None,
            cursor: host.display().create_line_art(false, INK, Color::TRANSPARENT),
            entry: host.display().create_text(),
            status: host.display().create_text(),
        });
        self.phase = Phase::Failed { reason };
        host.request_redraw(Rect::sized(PANEL_WIDTH, PANEL_HEIGHT));
        -1
    }

    fn build_scene(&self, host: &dyn EngineHost, backdrop: Option<BitmapSurface>) -> Scene {
        let display = host.display();

        let mut panel = display.create_line_art(true, INK, PANEL_FILL);
        panel.set_size(PANEL_WIDTH, PANEL_HEIGHT);
        panel.set_line_width(2);
        panel.bordered_rect(0, 0, PANEL_WIDTH, PANEL_HEIGHT);
        panel.set_line_color(ACCENT);
        panel.line(10, 50, PANEL_WIDTH as i32 - 10, 50);
        panel.set_fill_color(ACCENT);
        panel.arc_or_sector(PANEL_WIDTH as i32 - 50, 10, 30, 30, 90.0, 270.0, true);
        panel.polygon(
            true,
            &[
                Point::new(10, PANEL_HEIGHT as i32 - 40),
                Point::new(30, PANEL_HEIGHT as i32 - 30),
                Point::new(10, PANEL_HEIGHT as i32 - 20),
            ],
        );

        let mut title = display.create_text();
        title.set_font(26, true, false);
        let (_, fit) = title.get_bounds(&self.title, PANEL_WIDTH - 80);
        let shown: String = self.title.chars().take(fit).collect();
        title.add_text(0, 0, &shown, INK);

        let mut menu = display.create_text();
        menu.set_font(20, false, false);
        for (row, item) in self.items.iter().enumerate() {
            let y = (MENU_TOP + row as i32 * ROW_HEIGHT) as f32 * TEXT_HEIGHT_FACTOR;
            menu.add_text(0, y.round() as i32, item, INK);
        }

        let mut cursor = display.create_line_art(false, ACCENT, Color::TRANSPARENT);
        cursor.set_line_width(2);

        let entry = display.create_text();
        let status = display.create_text();

        let mut scene = Scene {
            layers: vec![(panel.into(), 0, 0), (title.into(), 12, 12), (menu.into(), 40, 0)],
            backdrop,
            cursor,
            entry,
            status,
        };
        self.refresh(&mut scene);
        scene
    }

    /// Rebuilds the dynamic surfaces from engine state
    fn refresh(&self, scene: &mut Scene) {
        scene.cursor.clear();
        if !self.items.is_empty() {
            scene.cursor.set_fill_color(if self.highlight {
                ACCENT
            } else {
                Color::TRANSPARENT
            });
            scene.cursor.oval(0, 0, 20, 20);
        }

        scene.entry.clear();
        scene.entry.set_font(24, false, false);
        let shown = if self.entry.is_empty() { "----" } else { &self.entry };
        scene.entry.add_text(0, 0, shown, ACCENT);

        scene.status.clear();
        scene.status.set_font(16, false, true);
        scene.status.add_text(0, 0, &self.status, INK);
    }

    fn handle(&mut self, action: ActionCode, host: &mut dyn EngineHost) {
        let before = self.panel_area();
        match action {
            ActionCode::Up if !self.items.is_empty() => {
                self.cursor = (self.cursor + self.items.len() - 1) % self.items.len();
            }
            ActionCode::Down if !self.items.is_empty() => {
                self.cursor = (self.cursor + 1) % self.items.len();
            }
            ActionCode::Left => self.panel_x -= PANEL_STEP,
            ActionCode::Right => self.panel_x += PANEL_STEP,
            ActionCode::Select => self.highlight = !self.highlight,
            ActionCode::Cancel => self.entry.clear(),
            ActionCode::Red => host.set_input_register(InputRegister::NAVIGATION),
            ActionCode::Green => host.set_input_register(InputRegister::NUMERIC),
            ActionCode::Yellow => host.set_input_register(InputRegister::ALL),
            ActionCode::Blue => {
                if self.status == "video" {
                    host.stop_video();
                    self.status.clear();
                } else {
                    host.begin_video("/video", Rect::new(440, 60, 240, 180));
                    self.status = "video".to_string();
                }
            }
            ActionCode::Text => {
                let current = host.current_service_index().unwrap_or(0);
                if let Err(err) = host.tune(current.saturating_add(1)) {
                    self.status = err.to_string();
                }
            }
            other => {
                if let Some(digit) = other.as_digit() {
                    if self.entry.len() == MAX_ENTRY_DIGITS {
                        self.entry.clear();
                    }
                    self.entry.push(char::from(b'0' + digit));
                }
            }
        }

        if let Some(mut scene) = self.scene.take() {
            self.refresh(&mut scene);
            self.scene = Some(scene);
        }
        host.request_redraw(before.union(&self.panel_area()));
    }
}

impl PresentationEngine for DemoEngine {
    fn boot(&mut self) {
        self.phase = Phase::Booting;
        self.pending.clear();
        self.scene = None;
        self.highlight = false;
    }

    fn deliver_action(&mut self, action: ActionCode) {
        self.pending.push_back(action);
    }

    fn run_step(&mut self, host: &mut dyn EngineHost) -> i32 {
        match self.phase {
            Phase::Booting => {
                host.set_input_register(InputRegister::NONE);
                self.phase = Phase::Loading { attempts: 0 };
                0
            }
            Phase::Loading { .. } => {
                if host.probe(STARTUP_OBJECT) {
                    self.load(host)
                } else {
                    match host.fetch(STARTUP_OBJECT) {
                        Ok(_) => 0,
                        Err(err) => self.not_ready(host, err),
                    }
                }
            }
            Phase::Running => {
                while let Some(action) = self.pending.pop_front() {
                    self.handle(action, host);
                }
                -1
            }
            Phase::Failed { .. } => {
                self.pending.clear();
                -1
            }
        }
    }

    fn redraw(&self, canvas: &mut Canvas<'_>) {
        let Some(scene) = &self.scene else {
            return;
        };
        if let Some(backdrop) = &scene.backdrop {
            let frame = canvas.frame();
            backdrop.draw(canvas, 0, 0, frame, true);
        }

        for (surface, dx, dy) in &scene.layers {
            surface.draw(canvas, self.panel_x + dx, PANEL_Y + dy);
        }

        let cursor_y = PANEL_Y + MENU_TOP + self.cursor as i32 * ROW_HEIGHT;
        scene.cursor.draw(canvas, self.panel_x + 12, cursor_y);
        scene
            .entry
            .draw(canvas, self.panel_x + 20, PANEL_Y + PANEL_HEIGHT as i32 - 50);
        scene
            .status
            .draw(canvas, self.panel_x, PANEL_Y + PANEL_HEIGHT as i32 + 10);
    }

    fn print_state(&self) -> String {
        format!(
            "phase={:?} title={:?} cursor={}/{} entry={:?} highlight={} panel_x={} status={:?}",
            self.phase,
            self.title,
            self.cursor,
            self.items.len(),
            self.entry,
            self.highlight,
            self.panel_x,
            self.status
        )
    }
}
