//! Heads-up display: brush controls plus the per-frame annotation stream.

use egui::{pos2, vec2, Color32, Pos2, Rect, Sense};
use glam::Vec2;

use super::overlay::{Icon, OverlayCommand};
use crate::render::Material;

#[derive(Debug, Clone, Copy, Default)]
pub struct HudStats {
    pub frame_ms: f32,
    pub samples: u32,
    pub shapes: usize,
}

pub fn frame_time_label(ms: f32) -> String {
    format!("{ms:.2} ms")
}

pub fn brush_color(brush: &Material) -> Color32 {
    let c = brush.color.clamp(glam::Vec3::ZERO, glam::Vec3::ONE) * 255.0;
    Color32::from_rgb(c.x as u8, c.y as u8, c.z as u8)
}

/// Brush panel in the top-left corner. Edits `brush` in place.
pub fn show(ctx: &egui::Context, brush: &mut Material, stats: &HudStats) {
    egui::Window::new("hud")
        .title_bar(false)
        .resizable(false)
        .movable(false)
        .frame(egui::Frame::NONE)
        .fixed_pos(pos2(10.0, 10.0))
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.label(frame_time_label(stats.frame_ms));
            ui.label(brush.kind.label());
            ui.add(egui::Slider::new(&mut brush.color.x, 0.0..=1.0).text("R"));
            ui.add(egui::Slider::new(&mut brush.color.y, 0.0..=1.0).text("G"));
            ui.add(egui::Slider::new(&mut brush.color.z, 0.0..=1.0).text("B"));
            let (swatch, _) = ui.allocate_exact_size(vec2(ui.available_width(), 18.0), Sense::hover());
            ui.painter().rect_filled(swatch, 0.0, brush_color(brush));
        });
}

/// Annotations for this frame: placement markers, pointer cross, counters.
pub fn overlay_commands(
    stats: &HudStats,
    brush: &Material,
    pending: &[Vec2],
    pointer: Option<Pos2>,
    status: Option<&str>,
    screen: Rect,
) -> Vec<OverlayCommand> {
    let mut commands = vec![OverlayCommand::ClipRect { rect: screen }];

    let marker = brush_color(brush);
    commands.extend(pending.iter().map(|v| OverlayCommand::Icon {
        center: pos2(v.x, v.y),
        size: 10.0,
        icon: Icon::Marker,
        color: marker,
    }));

    if let Some(p) = pointer {
        commands.push(OverlayCommand::Icon {
            center: p,
            size: 12.0,
            icon: Icon::Cross,
            color: Color32::from_white_alpha(160),
        });
    }

    let footer = Rect::from_min_size(pos2(screen.min.x, screen.max.y - 22.0), vec2(screen.width(), 22.0));
    commands.push(OverlayCommand::ClipRect { rect: footer });
    commands.push(OverlayCommand::Rect {
        rect: footer,
        color: Color32::from_black_alpha(140),
    });
    let mut line = format!("samples {}  shapes {}", stats.samples, stats.shapes);
    if let Some(status) = status {
        line.push_str("  ");
        line.push_str(status);
    }
    commands.push(OverlayCommand::Text {
        pos: footer.min + vec2(8.0, 4.0),
        text: line,
        color: Color32::LIGHT_GRAY,
    });
    commands
}
