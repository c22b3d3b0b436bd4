//! Interactive 2D flocking viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the simulation [`World`]
//! and implements [`eframe::App`] to render boids, predator and optional
//! index overlay, and to turn mouse input into spawn/repulsion events.

use eframe::App;
use flock_core::config::Config;
use flock_core::world::{Repulsion, World};
use glam::Vec2;

/// Default world extent in world units.
const WORLD_WIDTH: f32 = 1200.0;
const WORLD_HEIGHT: f32 = 800.0;

/// World-space half-length of the triangle drawn for each boid.
const BOID_SIZE: f32 = 6.0;

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The simulation core: a single [`World`] value.
/// - Event queues for clicks, drained into [`World::tick`].
/// - UI configuration (pan/zoom, timing) and eframe/egui callbacks.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / input (clicks become queued events).
/// 2. If `running` is `true` and enough time has passed, call
///    [`Viewer::step_once`].
/// 3. Render boids, predator, tool hint and optional quad-tree overlay.
pub struct Viewer {
    world: World,

    pending_spawns: Vec<Vec2>,
    pending_repulsions: Vec<Repulsion>,

    running: bool,
    show_index: bool,
    zoom: f32,
    pan: egui::Vec2,

    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,
}

impl Viewer {
    /// Creates a viewer with a freshly scattered default population.
    pub fn new() -> Self {
        let cfg = Config::default();
        let mut world = World::new(WORLD_WIDTH, WORLD_HEIGHT, cfg);
        world.spawn_random(cfg.initial_boids);

        Self {
            world,
            pending_spawns: Vec::new(),
            pending_repulsions: Vec::new(),
            running: true,
            show_index: false,
            zoom: 1.0,
            pan: egui::vec2(0.0, 0.0),
            step_interval: 1.0 / 60.0,
            last_step_time: 0.0,
            last_step_dt: 0.0,
        }
    }

    /// Resets the simulation to a fresh scattered population.
    ///
    /// Keeps the current configuration and camera, discards queued
    /// events and stops auto-running.
    fn reset(&mut self) {
        let cfg = self.world.cfg;
        self.world = World::new(WORLD_WIDTH, WORLD_HEIGHT, cfg);
        self.world.spawn_random(cfg.initial_boids);
        self.pending_spawns.clear();
        self.pending_repulsions.clear();
        self.running = false;
    }

    /// Removes every boid, leaving a blank world for manual spawning.
    fn clear(&mut self) {
        self.world.boids.clear();
        self.pending_spawns.clear();
        self.pending_repulsions.clear();
    }

    /// Advances the simulation by a single tick, draining the queued
    /// click events into it.
    fn step_once(&mut self) {
        let spawns = std::mem::take(&mut self.pending_spawns);
        let repulsions = std::mem::take(&mut self.pending_repulsions);
        self.world.tick(&spawns, &repulsions);
    }

    /// Converts a world-space position to screen-space.
    ///
    /// World coordinates are centered in `rect`, scaled by `zoom` and
    /// offset by `pan`. World y grows downward, matching the screen.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        let world_center = Vec2::new(self.world.width, self.world.height) * 0.5;
        egui::pos2(
            center.x + (p.x - world_center.x) * self.zoom + self.pan.x,
            center.y + (p.y - world_center.y) * self.zoom + self.pan.y,
        )
    }

    /// Converts a screen-space position back to world-space.
    ///
    /// Inverse of [`Viewer::world_to_screen`] up to floating point
    /// rounding.
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let world_center = Vec2::new(self.world.width, self.world.height) * 0.5;
        Vec2::new(
            (p.x - center.x - self.pan.x) / self.zoom + world_center.x,
            (p.y - center.y - self.pan.y) / self.zoom + world_center.y,
        )
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

    /// Builds the top panel UI (run controls, stepping, zoom, overlay).
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
                        .range(0.001..=1.0)
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

                if ui.button("Clear").clicked() {
                    self.clear();
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.1..=10.0).text("Zoom"));
                ui.checkbox(&mut self.show_index, "Show index");
            });
        });
    }

    /// Builds the bottom status bar (timing, population, input hints).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt target = {:.3} s", self.step_interval));
                ui.label(format!("dt last = {:.3} s", self.last_step_dt));
                ui.separator();
                ui.label(format!("boids = {}", self.world.boids.len()));
                ui.separator();
                ui.label("left click: repulse · right click: spawn");
            });
        });
    }

    /// Builds the right-hand configuration panel for simulation
    /// parameters.
    ///
    /// Weights and interaction parameters apply immediately; per-boid
    /// parameters are copied at spawn time and therefore only affect new
    /// boids (use Reset to respawn the whole flock with them).
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        let cfg = &mut self.world.cfg;

        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Boids (new spawns)");
                Self::labeled_drag_f32(ui, "max_speed:", &mut cfg.max_speed, 0.0..=10.0, 0.05);
                Self::labeled_drag_f32(ui, "max_force:", &mut cfg.max_force, 0.0..=1.0, 0.005);
                Self::labeled_drag_f32(
                    ui,
                    "perception_radius:",
                    &mut cfg.perception_radius,
                    0.0..=200.0,
                    0.5,
                );

                ui.separator();
                ui.label("Flocking weights");
                Self::labeled_drag_f32(
                    ui,
                    "alignment:",
                    &mut cfg.alignment_weight,
                    0.0..=5.0,
                    0.05,
                );
                Self::labeled_drag_f32(ui, "cohesion:", &mut cfg.cohesion_weight, 0.0..=5.0, 0.05);
                Self::labeled_drag_f32(
                    ui,
                    "separation:",
                    &mut cfg.separation_weight,
                    0.0..=5.0,
                    0.05,
                );

                ui.separator();
                ui.label("Predator");
                Self::labeled_drag_f32(
                    ui,
                    "avoid_radius:",
                    &mut cfg.predator_avoid_radius,
                    0.0..=400.0,
                    1.0,
                );

                ui.separator();
                ui.label("Repulsion");
                Self::labeled_drag_f32(
                    ui,
                    "radius:",
                    &mut cfg.repulsion_radius,
                    0.0..=400.0,
                    1.0,
                );
                Self::labeled_drag_f32(
                    ui,
                    "strength:",
                    &mut cfg.repulsion_strength,
                    0.0..=10.0,
                    0.1,
                );

                ui.separator();
                ui.label("Spawning");
                Self::labeled_drag_usize(
                    ui,
                    "initial_boids:",
                    &mut cfg.initial_boids,
                    0..=5000,
                    1.0,
                );

                ui.separator();
                if ui.button("Reset cfg to default").clicked() {
                    *cfg = Config::default();
                }
            });
    }

    /// Draws a hint circle for the repulsion radius at the hovered
    /// position.
    fn ui_tool_hint(&self, painter: &egui::Painter, rect: egui::Rect, hover_world: Option<Vec2>) {
        let Some(center) = hover_world else {
            return;
        };

        let stroke = egui::Stroke::new(1.5, egui::Color32::YELLOW);
        painter.circle_stroke(
            self.world_to_screen(center, rect),
            self.world.cfg.repulsion_radius * self.zoom,
            stroke,
        );
    }

    /// Builds the central panel where the flock is drawn and interacted
    /// with.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Pan with drag.
            if response.dragged() {
                let delta = response.drag_delta();
                self.pan += delta;
            }

            let hover_world = response.hover_pos().map(|p| self.screen_to_world(p, rect));

            // Primary click queues a repulsion burst, secondary click a
            // spawn; both are drained into the next tick.
            if response.clicked()
                && let Some(center) = hover_world
            {
                self.pending_repulsions.push(Repulsion {
                    position: center,
                    radius: self.world.cfg.repulsion_radius,
                    strength: self.world.cfg.repulsion_strength,
                });
            }

            if response.secondary_clicked()
                && let Some(center) = hover_world
            {
                self.pending_spawns.push(center);
            }

            // Zoom around the mouse cursor.
            if ui.ctx().input(|i| i.raw_scroll_delta.y != 0.0) {
                let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
                if scroll != 0.0 {
                    let pointer_screen = response.hover_pos().unwrap_or(rect.center());

                    let world_before = self.screen_to_world(pointer_screen, rect);

                    let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                    let new_zoom = (self.zoom * factor).clamp(0.1, 10.0);
                    self.zoom = new_zoom;

                    let screen_after = self.world_to_screen(world_before, rect);

                    let delta = pointer_screen - screen_after;
                    self.pan += delta;
                }
            }

            // World bounds outline.
            let min = self.world_to_screen(Vec2::ZERO, rect);
            let max = self.world_to_screen(Vec2::new(self.world.width, self.world.height), rect);
            painter.rect_stroke(
                egui::Rect::from_min_max(min, max),
                egui::CornerRadius::ZERO,
                egui::Stroke::new(1.0, egui::Color32::DARK_GRAY),
                egui::StrokeKind::Middle,
            );

            // Quad-tree overlay.
            if self.show_index {
                let stroke =
                    egui::Stroke::new(1.0, egui::Color32::from_rgba_unmultiplied(255, 255, 0, 48));
                self.world.index.visit_boundaries(&mut |boundary, _depth| {
                    let min = self.world_to_screen(boundary.center - boundary.half, rect);
                    let max = self.world_to_screen(boundary.center + boundary.half, rect);
                    painter.rect_stroke(
                        egui::Rect::from_min_max(min, max),
                        egui::CornerRadius::ZERO,
                        stroke,
                        egui::StrokeKind::Middle,
                    );
                });
            }

            // Draw boids as triangles pointing along their heading.
            let boid_color = egui::Color32::from_rgb(31, 159, 171);
            for boid in &self.world.boids {
                let dir = boid.velocity.normalize_or(Vec2::X);
                let perp = dir.perp();
                let tip = self.world_to_screen(boid.position + dir * BOID_SIZE, rect);
                let left = self
                    .world_to_screen(boid.position - dir * BOID_SIZE + perp * (BOID_SIZE * 0.5), rect);
                let right = self
                    .world_to_screen(boid.position - dir * BOID_SIZE - perp * (BOID_SIZE * 0.5), rect);
                painter.add(egui::Shape::convex_polygon(
                    vec![tip, left, right],
                    boid_color,
                    egui::Stroke::NONE,
                ));
            }

            // Draw the predator: red body, two eyes offset along the
            // heading.
            let predator = &self.world.predator;
            let body = self.world_to_screen(predator.position, rect);
            painter.circle_filled(body, predator.radius * self.zoom, egui::Color32::RED);

            let angle = predator.velocity.y.atan2(predator.velocity.x);
            for offset in [-0.2f32, 0.2] {
                let eye_dir = Vec2::from_angle(angle + offset);
                let eye =
                    self.world_to_screen(predator.position + eye_dir * (predator.radius / 2.5), rect);
                painter.circle_filled(
                    eye,
                    predator.radius / 5.0 * self.zoom,
                    egui::Color32::WHITE,
                );
            }

            // Tool hint overlay.
            self.ui_tool_hint(&painter, rect, hover_world);

            // Auto-run simulation if requested.
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
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
