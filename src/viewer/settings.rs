//! Persistent sandbox settings

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::render::TraceQuality;

/// Settings that persist between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window (logical points, fixed while running)
    pub window_width: f32,
    pub window_height: f32,

    // Scene loaded at startup and written on exit
    pub save_file: PathBuf,
    // Last file picked in a save/open dialog
    pub last_scene: Option<PathBuf>,

    // Tracing
    pub rays_per_sample: u32,
    pub max_bounces: u32,
    pub exposure: f32,

    // Physics
    pub gravity: [f32; 2],
    pub physics_hz: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: 800.0,
            window_height: 800.0,
            save_file: PathBuf::from("state/game.data"),
            last_scene: None,
            rays_per_sample: 16,
            max_bounces: 3,
            exposure: 1.0,
            gravity: [0.0, 10.0],
            physics_hz: 100,
        }
    }
}

impl Settings {
    /// Get settings file path
    fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("lumen2d");
            std::fs::create_dir_all(&p).ok();
            p.push("settings.json");
            p
        })
    }

    /// Load settings from file, falling back to defaults
    pub fn load() -> Self {
        let settings: Self = Self::path()
            .and_then(|p| std::fs::read_to_string(&p).ok())
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();
        settings.sanitized()
    }

    /// Save settings to file
    pub fn save(&self) {
        let Some(path) = Self::path() else {
            return;
        };
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    tracing::warn!(path = %path.display(), "settings not saved: {e}");
                }
            }
            Err(e) => tracing::warn!("settings not serialized: {e}"),
        }
    }

    /// Clamp values a hand-edited file may have pushed out of range
    pub fn sanitized(mut self) -> Self {
        let quality = self.quality();
        self.rays_per_sample = quality.rays_per_sample;
        self.max_bounces = quality.max_bounces;
        if !self.exposure.is_finite() || self.exposure <= 0.0 {
            self.exposure = 1.0;
        }
        if !(self.window_width >= 64.0 && self.window_height >= 64.0) {
            self.window_width = 800.0;
            self.window_height = 800.0;
        }
        self.physics_hz = self.physics_hz.clamp(1, 1000);
        self
    }

    pub fn quality(&self) -> TraceQuality {
        TraceQuality {
            rays_per_sample: self.rays_per_sample,
            max_bounces: self.max_bounces,
        }
        .clamped()
    }
}
