//! Annotation overlay drawn over the traced image.
//!
//! Commands are painted in submission order. A `ClipRect` restricts every
//! later draw until the next `ClipRect` or the end of the stream.

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    /// Ring around a pending placement vertex.
    Marker,
    /// Pointer crosshair.
    Cross,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayCommand {
    Text { pos: Pos2, text: String, color: Color32 },
    Rect { rect: Rect, color: Color32 },
    Icon { center: Pos2, size: f32, icon: Icon, color: Color32 },
    ClipRect { rect: Rect },
}

/// A draw command paired with the clip in force when it was issued.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClippedDraw<'a> {
    pub clip: Rect,
    pub command: &'a OverlayCommand,
}

/// Resolve clip state for each draw, keeping order. `ClipRect` entries are
/// consumed; the initial clip is `screen`.
pub fn compose(commands: &[OverlayCommand], screen: Rect) -> Vec<ClippedDraw<'_>> {
    let mut clip = screen;
    let mut draws = Vec::with_capacity(commands.len());
    for command in commands {
        match command {
            OverlayCommand::ClipRect { rect } => clip = rect.intersect(screen),
            OverlayCommand::Text { .. } | OverlayCommand::Rect { .. } | OverlayCommand::Icon { .. } => {
                draws.push(ClippedDraw { clip, command })
            }
        }
    }
    draws
}

pub fn paint(painter: &Painter, draws: &[ClippedDraw<'_>]) {
    for draw in draws {
        let painter = painter.with_clip_rect(draw.clip);
        match draw.command {
            OverlayCommand::Text { pos, text, color } => {
                painter.text(*pos, Align2::LEFT_TOP, text, FontId::monospace(13.0), *color);
            }
            OverlayCommand::Rect { rect, color } => {
                painter.rect_filled(*rect, 0.0, *color);
            }
            OverlayCommand::Icon { center, size, icon, color } => {
                let stroke = Stroke::new(1.5, *color);
                let r = size * 0.5;
                match icon {
                    Icon::Marker => {
                        painter.circle_stroke(*center, r, stroke);
                    }
                    Icon::Cross => {
                        painter.line_segment([*center - egui::vec2(r, 0.0), *center + egui::vec2(r, 0.0)], stroke);
                        painter.line_segment([*center - egui::vec2(0.0, r), *center + egui::vec2(0.0, r)], stroke);
                    }
                }
            }
            OverlayCommand::ClipRect { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn screen() -> Rect {
        Rect::from_min_max(pos2(0.0, 0.0), pos2(800.0, 800.0))
    }

    fn rect(color: Color32) -> OverlayCommand {
        OverlayCommand::Rect {
            rect: Rect::from_min_max(pos2(1.0, 1.0), pos2(2.0, 2.0)),
            color,
        }
    }

    #[test]
    fn test_default_clip_is_screen() {
        let commands = [rect(Color32::RED)];
        let draws = compose(&commands, screen());
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].clip, screen());
    }

    #[test]
    fn test_clip_applies_until_next_clip() {
        let a = Rect::from_min_max(pos2(10.0, 10.0), pos2(100.0, 100.0));
        let b = Rect::from_min_max(pos2(50.0, 50.0), pos2(60.0, 60.0));
        let commands = [
            rect(Color32::RED),
            OverlayCommand::ClipRect { rect: a },
            rect(Color32::GREEN),
            rect(Color32::BLUE),
            OverlayCommand::ClipRect { rect: b },
            rect(Color32::WHITE),
        ];
        let draws = compose(&commands, screen());
        let clips: Vec<_> = draws.iter().map(|d| d.clip).collect();
        assert_eq!(clips, vec![screen(), a, a, b]);

        // order preserved
        let colors: Vec<_> = draws
            .iter()
            .map(|d| match d.command {
                OverlayCommand::Rect { color, .. } => *color,
                _ => Color32::TRANSPARENT,
            })
            .collect();
        assert_eq!(colors, vec![Color32::RED, Color32::GREEN, Color32::BLUE, Color32::WHITE]);
    }

    #[test]
    fn test_clip_is_bounded_by_screen() {
        let huge = Rect::from_min_max(pos2(-50.0, -50.0), pos2(5000.0, 5000.0));
        let commands = [OverlayCommand::ClipRect { rect: huge }, rect(Color32::RED)];
        let draws = compose(&commands, screen());
        assert_eq!(draws[0].clip, screen());
    }
}
