//! Interactive host for the cluster animation built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the running [`Sketch`], plays
//! the role of the drawing surface through a [`FrameRecorder`], and
//! implements [`eframe::App`] to drive frames and present the controls.

use cluster_core::{config::Config, recorder::FrameRecorder, sketch::Sketch};
use eframe::App;
use glam::Vec2;
use rand::rng;

use crate::afterimage::{self, Afterimage};

/// Main application state for the viewer.
///
/// The typical per-repaint flow is:
/// 1. Handle UI interactions.
/// 2. Set up a sketch if there is none yet (first frame or after Reset),
///    sized to the central panel.
/// 3. If `running` is `true` and enough time has passed, call
///    [`Viewer::step_once`].
/// 4. Paint the retained frames from the [`Afterimage`].
///
/// ### Fields
/// - `cfg` - Settings edited in the side panel; applied on the next Reset.
/// - `active` - Last settings that passed validation; sketches are built
///   from these.
/// - `cfg_error` - Validation message for `cfg`, if any.
/// - `sketch` - The running animation, `None` until the canvas size is known.
/// - `recorder` - Canvas the sketch draws into.
/// - `afterimage` - Recent frames, replayed with fading for trails.
///
/// - `rng` - Random number generator used at setup.
///
/// - `running` - Whether frames advance automatically.
/// - `step_interval` - Target time between automatic frames (seconds).
/// - `last_step_time` - Time stamp of the last frame (egui time).
/// - `last_step_dt` - Actual time between the last two frames (display only).
/// - `hover` - Canvas position under the pointer in the last repaint.
pub struct Viewer {
    cfg: Config,
    active: Config,
    cfg_error: Option<String>,
    sketch: Option<Sketch>,
    recorder: FrameRecorder,
    afterimage: Afterimage,

    rng: rand::rngs::ThreadRng,

    running: bool,
    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,
    hover: Option<Vec2>,
}

impl Viewer {
    /// Creates a viewer that will set up a sketch from `cfg` on its first
    /// frame. Starts running at 60 frames per second.
    pub fn new(cfg: Config) -> Self {
        let afterimage = Afterimage::new(cfg.background_alpha);
        Self {
            active: cfg.clone(),
            cfg,
            cfg_error: None,
            sketch: None,
            recorder: FrameRecorder::new(Vec2::ZERO),
            afterimage,
            rng: rng(),
            running: true,
            step_interval: 1.0 / 60.0,
            last_step_time: 0.0,
            last_step_dt: 0.0,
            hover: None,
        }
    }

    /// Drops the current sketch so a fresh one is built from `cfg` on the
    /// next frame.
    ///
    /// An invalid `cfg` keeps the current sketch and records the message
    /// in `cfg_error`.
    fn reset(&mut self) {
        if let Err(e) = self.cfg.validate() {
            log::warn!("not resetting: {}", e);
            self.cfg_error = Some(e.to_string());
            return;
        }
        self.cfg_error = None;
        self.active = self.cfg.clone();
        self.sketch = None;
        self.afterimage = Afterimage::new(self.cfg.background_alpha);
        self.last_step_time = 0.0;
        self.last_step_dt = 0.0;
    }

    /// Builds a sketch for the given canvas size if none is running.
    ///
    /// Uses the last validated settings, so edits made in the side panel
    /// since the last Reset never reach setup. Settings handed to
    /// [`Viewer::new`] are checked here; if they are rejected the message is
    /// shown and the defaults are used instead.
    fn ensure_sketch(&mut self, extent: Vec2) {
        self.recorder.set_size(extent);
        if self.sketch.is_some() || extent.x <= 0.0 || extent.y <= 0.0 {
            return;
        }

        match Sketch::setup(self.active.clone(), extent, &mut self.rng) {
            Ok(sketch) => self.sketch = Some(sketch),
            Err(e) => {
                log::error!("{}; setting up with defaults", e);
                self.cfg_error = Some(e.to_string());
                self.active = Config::default();
                self.afterimage = Afterimage::new(self.active.background_alpha);
                self.sketch = Sketch::setup(self.active.clone(), extent, &mut self.rng).ok();
            }
        }
    }

    /// Draws one frame of the sketch and keeps it for display.
    fn step_once(&mut self) {
        let Some(sketch) = self.sketch.as_mut() else {
            return;
        };
        sketch.draw(&mut self.recorder);
        self.afterimage.push(self.recorder.take_primitives());
    }

    /// Converts a canvas position to screen-space. The canvas origin is the
    /// top-left corner of `rect`, y pointing down.
    fn canvas_to_screen(p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        rect.min + egui::vec2(p.x, p.y)
    }

    /// Inverse of [`Viewer::canvas_to_screen`].
    fn screen_to_canvas(p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let d = p - rect.min;
        Vec2::new(d.x, d.y)
    }

    /// Helper to draw a labeled `usize` [`egui::DragValue`].
    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, stepping, reset).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("dt target = ")
                        .range(0.005..=1.0)
                        .speed(0.001),
                );

                if ui.button("Step").clicked() {
                    let now = ctx.input(|i| i.time);
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = now - self.last_step_time;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }
            });
        });
    }

    /// Builds the bottom status bar (timing, cluster count, growth).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt target = {:.3} s", self.step_interval));
                ui.label(format!("dt last = {:.3} s", self.last_step_dt));
                ui.label(format!(
                    "trail = {}/{}",
                    self.afterimage.len(),
                    self.afterimage.depth()
                ));
                ui.separator();
                if let Some(sketch) = &self.sketch {
                    ui.label(format!("frame = {}", sketch.frame()));
                    ui.label(format!("merges = {}", sketch.field.merges()));
                    ui.label(format!("growing radius = {:.1}", sketch.field.growing().radius));
                    ui.label(format!("clusters = {}", sketch.field.count()));
                }
                if let Some(p) = self.hover {
                    ui.separator();
                    ui.label(format!("cursor = ({:.0}, {:.0})", p.x, p.y));
                }
            });
        });
    }

    /// Builds the right-hand panel for the settings used on the next Reset.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");
                ui.label("Applied on Reset.");

                ui.separator();
                ui.label("Population");
                Self::labeled_drag_usize(
                    ui,
                    "cluster_count:",
                    &mut self.cfg.cluster_count,
                    0..=200,
                    1.0,
                );
                Self::labeled_drag_f32(
                    ui,
                    "spawn_margin:",
                    &mut self.cfg.spawn_margin,
                    0.0..=500.0,
                    1.0,
                );
                Self::labeled_drag_f32(ui, "radius.min:", &mut self.cfg.radius.min, 1.0..=500.0, 1.0);
                Self::labeled_drag_f32(ui, "radius.max:", &mut self.cfg.radius.max, 1.0..=500.0, 1.0);
                Self::labeled_drag_f32(
                    ui,
                    "growing_radius.min:",
                    &mut self.cfg.growing_radius.min,
                    1.0..=500.0,
                    1.0,
                );
                Self::labeled_drag_f32(
                    ui,
                    "growing_radius.max:",
                    &mut self.cfg.growing_radius.max,
                    1.0..=500.0,
                    1.0,
                );
                Self::labeled_drag_f32(ui, "max_speed:", &mut self.cfg.max_speed, 0.1..=20.0, 0.1);
                Self::labeled_drag_f32(ui, "node_size:", &mut self.cfg.node_size, 0.0..=50.0, 0.5);

                ui.separator();
                ui.label("Merging");
                Self::labeled_drag_f32(
                    ui,
                    "hit_distance:",
                    &mut self.cfg.hit_distance,
                    1.0..=500.0,
                    1.0,
                );
                Self::labeled_drag_f32(
                    ui,
                    "growth_factor:",
                    &mut self.cfg.growth_factor,
                    0.5..=3.0,
                    0.01,
                );

                ui.separator();
                ui.label("Drawing");
                Self::labeled_drag_f32(
                    ui,
                    "link_weight:",
                    &mut self.cfg.link_weight,
                    0.0..=5.0,
                    0.05,
                );
                Self::labeled_drag_f32(
                    ui,
                    "background_alpha:",
                    &mut self.cfg.background_alpha,
                    0.0..=255.0,
                    1.0,
                );

                if let Some(msg) = &self.cfg_error {
                    ui.separator();
                    ui.colored_label(egui::Color32::LIGHT_RED, msg);
                }

                ui.separator();
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = Config::default();
                }
            });
    }

    /// Builds the central panel that hosts the canvas.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let response = ui.allocate_response(ui.available_size(), egui::Sense::hover());
                let rect = response.rect;
                let painter = ui.painter_at(rect);

                self.ensure_sketch(Vec2::new(rect.width(), rect.height()));

                // Auto-run at the target rate.
                if self.running {
                    let now = ctx.input(|i| i.time);
                    let elapsed = now - self.last_step_time;
                    if elapsed >= self.step_interval {
                        if self.last_step_time > 0.0 {
                            self.last_step_dt = elapsed;
                        }
                        self.step_once();
                        self.last_step_time = now;
                    }

                    ctx.request_repaint();
                }

                let origin = Self::canvas_to_screen(Vec2::ZERO, rect);
                let mut shapes = Vec::new();
                for (fade, frame) in self.afterimage.layers() {
                    for primitive in frame {
                        afterimage::push_shapes(&mut shapes, primitive, origin, fade);
                    }
                }
                painter.extend(shapes);

                self.hover = response.hover_pos().map(|p| Self::screen_to_canvas(p, rect));
            });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    ///
    /// Side panels are laid out before the central panel so the canvas
    /// gets the remaining space.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
