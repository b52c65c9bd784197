//! Main application state and per-frame driver

use std::path::{Path, PathBuf};
use std::time::Instant;

use egui::{CentralPanel, Key, Sense};
use glam::Vec2;

use super::hud::{self, HudStats};
use super::overlay;
use super::settings::Settings;
use super::viewport::Viewport;
use crate::physics::Physics;
use crate::render::{MaterialKind, TraceState};
use crate::util::{fatal, Result};
use crate::world::{persist, Placement, Scene, SceneSlot, World};

/// User requests decoded from keyboard events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SelectMaterial(MaterialKind),
    Clear,
    Dump,
    Quit,
    SaveAs,
    Open,
}

/// Key mapping. Material keys act on press; clear, dump and quit on release.
pub fn action_for_event(event: &egui::Event) -> Option<Action> {
    let egui::Event::Key {
        key,
        pressed,
        repeat,
        modifiers,
        ..
    } = event
    else {
        return None;
    };
    if *repeat {
        return None;
    }
    if modifiers.command {
        return match (key, pressed) {
            (Key::S, true) => Some(Action::SaveAs),
            (Key::O, true) => Some(Action::Open),
            _ => None,
        };
    }
    match (key, pressed) {
        (Key::Num1, true) => Some(Action::SelectMaterial(MaterialKind::Diffuse)),
        (Key::Num2, true) => Some(Action::SelectMaterial(MaterialKind::Reflective)),
        (Key::Num3, true) => Some(Action::SelectMaterial(MaterialKind::Emissive)),
        (Key::C, false) => Some(Action::Clear),
        (Key::D, false) => Some(Action::Dump),
        (Key::Escape, false) => Some(Action::Quit),
        _ => None,
    }
}

/// Main sandbox application
pub struct LumenApp {
    settings: Settings,
    viewport: Viewport,
    physics: Physics,
    world: World,
    placement: Placement,
    state: TraceState,
    /// Scene written back on exit.
    scene: SceneSlot,
    started: Instant,
    status: Option<String>,
    _trace_guard: Option<tracing_chrome::FlushGuard>,
}

impl LumenApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        settings: Settings,
        initial_scene: Option<PathBuf>,
        trace_guard: Option<tracing_chrome::FlushGuard>,
    ) -> Self {
        let physics = Physics::new(
            Vec2::from_array(settings.gravity),
            settings.physics_hz,
        );
        let mut scene = SceneSlot::new(initial_scene.unwrap_or_else(|| settings.save_file.clone()));
        let loaded = scene.load();

        let mut app = Self {
            settings,
            viewport: Viewport::new(),
            physics,
            world: World::new(),
            placement: Placement::new(),
            state: TraceState::new(),
            scene,
            started: Instant::now(),
            status: None,
            _trace_guard: trace_guard,
        };
        let path = app.scene.path().to_path_buf();
        if !app.adopt_loaded(&path, loaded) {
            app.scene.lock();
        }
        app
    }

    /// Swap a decoded scene in. Returns false when the world was left as it was.
    fn adopt_loaded(&mut self, path: &Path, loaded: Result<Option<Scene>>) -> bool {
        let restored = loaded.and_then(|scene| match scene {
            Some(scene) => self.world.restore(&mut self.physics, scene).map(|()| true),
            None => Ok(false),
        });
        match restored {
            Ok(true) => {
                self.placement.cancel();
                self.status = Some(format!("loaded {}", path.display()));
                true
            }
            Ok(false) => true,
            Err(e) => {
                tracing::warn!(path = %path.display(), "scene not loaded: {e}");
                self.status = Some(format!("load failed: {e}"));
                false
            }
        }
    }

    /// Open a scene file picked by the user. Success makes it the exit target.
    fn open_scene(&mut self, path: PathBuf) {
        let loaded = persist::load(&path);
        if self.adopt_loaded(&path, loaded) {
            self.scene.retarget(&path);
        }
    }

    fn save_scene(&mut self, path: &Path) -> bool {
        let scene = self.world.scene(&self.physics);
        match persist::save(path, &scene) {
            Ok(()) => {
                self.status = Some(format!("saved {}", path.display()));
                true
            }
            Err(e) => {
                tracing::error!(path = %path.display(), "scene not saved: {e}");
                self.status = Some(format!("save failed: {e}"));
                false
            }
        }
    }

    fn scene_dialog(&self) -> rfd::FileDialog {
        let dialog = rfd::FileDialog::new().add_filter("Scene", &["data"]);
        match self.settings.last_scene.as_ref().and_then(|p| p.parent()) {
            Some(dir) => dialog.set_directory(dir),
            None => dialog,
        }
    }

    fn apply(&mut self, ctx: &egui::Context, action: Action) {
        match action {
            Action::SelectMaterial(kind) => self.world.brush.kind = kind,
            Action::Clear => {
                self.world.clear(&mut self.physics);
                self.placement.cancel();
                self.state.clear_shapes();
            }
            Action::Dump => self.state.dump(),
            Action::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            Action::SaveAs => {
                if let Some(path) = self.scene_dialog().set_file_name("scene.data").save_file() {
                    if self.save_scene(&path) {
                        self.scene.retarget(&path);
                    }
                    self.settings.last_scene = Some(path);
                }
            }
            Action::Open => {
                if let Some(path) = self.scene_dialog().pick_file() {
                    self.settings.last_scene = Some(path.clone());
                    self.open_scene(path);
                }
            }
        }
    }

    fn place_vertex(&mut self, point: Vec2) {
        let Some(data) = self.placement.push(point, self.world.brush) else {
            return;
        };
        if let Err(e) = self.world.append(&mut self.physics, data) {
            tracing::warn!("terrain rejected: {e}");
        }
    }

    /// Rebuild tracer input from terrain, then trace and present.
    fn trace_frame(&mut self, ui: &egui::Ui, frame: &eframe::Frame, rect: egui::Rect) {
        let Some(render_state) = frame.wgpu_render_state() else {
            return;
        };
        let scale = ui.ctx().pixels_per_point();
        let size = (
            (rect.width() * scale).round().max(1.0) as u32,
            (rect.height() * scale).round().max(1.0) as u32,
        );
        if let Err(e) = self.viewport.ensure(
            render_state,
            size,
            scale,
            self.settings.quality(),
            self.settings.exposure,
        ) {
            fatal(&e);
        }

        let staged = match self.world.stage_shapes(&self.physics) {
            Ok(staged) => staged,
            Err(e) => fatal(&e),
        };
        self.state.sync_shapes(staged);

        let time = self.started.elapsed().as_secs_f32();
        self.viewport.render(&mut self.state, time);
        self.viewport.paint(ui.painter(), rect);
    }
}

impl eframe::App for LumenApp {
    fn on_exit(&mut self) {
        let scene = self.world.scene(&self.physics);
        if let Err(e) = self.scene.save(&scene) {
            tracing::error!(path = %self.scene.path().display(), "scene not saved: {e}");
        }
        self.settings.save();
        self.viewport.release(None);
    }

    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        let _span = tracing::info_span!("lumen_update").entered();

        let actions: Vec<Action> = ctx.input(|i| i.events.iter().filter_map(action_for_event).collect());
        for action in actions {
            self.apply(ctx, action);
        }

        self.physics.step();

        let stats = HudStats {
            frame_ms: ctx.input(|i| i.unstable_dt) * 1000.0,
            samples: self.state.sample_index(),
            shapes: self.state.shapes().len(),
        };
        hud::show(ctx, &mut self.world.brush, &stats);

        CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                // Clicks landing on the HUD window never reach this response.
                let response = ui.allocate_rect(rect, Sense::click());
                if response.clicked() {
                    if let Some(p) = response.interact_pointer_pos() {
                        self.place_vertex(Vec2::new(p.x, p.y));
                    }
                }

                self.trace_frame(ui, frame, rect);

                let commands = hud::overlay_commands(
                    &stats,
                    &self.world.brush,
                    self.placement.pending(),
                    response.hover_pos(),
                    self.status.as_deref(),
                    rect,
                );
                overlay::paint(ui.painter(), &overlay::compose(&commands, rect));
            });

        ctx.request_repaint();
    }
}
