//! Runtime configuration loaded from `assets/ballpit.toml`.
//!
//! [`AppConfig`] is a Bevy [`Resource`] covering the window, the optional body
//! limit, and rendering resolution.  Physical constants (gravity, radius,
//! restitution) are not part of it; they live in [`crate::constants`] only.
//!
//! The window has to be sized before any `Startup` system runs, so `main.rs`
//! calls [`AppConfig::load_or_default`] while building the `App` and inserts
//! the result.  Missing keys fall back to the compile-time defaults, so a
//! minimal TOML can override just the values you care about:
//!
//! ```toml
//! window_width = 1024.0
//! max_bodies = 200
//! ```

use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;

use crate::constants::*;
use crate::error::{SimError, SimResult};

#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    // ── Window ────────────────────────────────────────────────────────────────
    pub window_width: f32,
    pub window_height: f32,
    pub window_title: String,
    pub resizable: bool,

    // ── Bodies ────────────────────────────────────────────────────────────────
    /// `0` = unbounded.
    pub max_bodies: usize,

    // ── Rendering ─────────────────────────────────────────────────────────────
    pub circle_sides: u32,
    pub draw_radius: f32,

    // ── Diagnostics ───────────────────────────────────────────────────────────
    /// Emit a `trace!` line with the step counters every frame.
    pub log_steps: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            window_title: WINDOW_TITLE.to_string(),
            resizable: false,
            max_bodies: MAX_BODIES,
            circle_sides: CIRCLE_SIDES,
            draw_radius: DRAW_RADIUS,
            log_steps: false,
        }
    }
}

impl AppConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str, origin: &str) -> SimResult<Self> {
        let config: Self = toml::from_str(contents).map_err(|e| SimError::ConfigParse {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path`.  `Ok(None)` when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> SimResult<Option<Self>> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents, &path.display().to_string()).map(Some),
            Err(_) => Ok(None),
        }
    }

    /// Like [`AppConfig::load`], but any failure falls back to the defaults.
    ///
    /// Runs before the log plugin is up, so it reports on stdout/stderr.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(Some(config)) => {
                println!("✓ Loaded config from {}", path.display());
                config
            }
            Ok(None) => {
                println!("ℹ No {} found; using compiled defaults", path.display());
                Self::default()
            }
            Err(err) => {
                eprintln!("⚠ {err}; using defaults");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        require_positive("window_width", self.window_width)?;
        require_positive("window_height", self.window_height)?;
        require_positive("draw_radius", self.draw_radius)?;
        if self.circle_sides < 3 {
            return Err(SimError::InvalidConfig {
                name: "circle_sides",
                value: self.circle_sides.to_string(),
                reason: "must be at least 3",
            });
        }
        Ok(())
    }
}

fn require_positive(name: &'static str, value: f32) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidConfig {
            name,
            value: value.to_string(),
            reason: "must be finite and > 0",
        })
    }
}
