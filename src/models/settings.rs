//! Player configuration with forward-compatible loading.
//!
//! Settings live in a TOML file. Loading is lenient: fields missing from
//! an older file fall back to documented defaults, and keybind layouts for
//! key counts introduced after the file was written are seeded from the
//! built-in defaults. `version` records the schema the file was written
//! with; migration runs field by field once at load time.

use crate::core::input::bindings;
use crate::models::hit_window::HitWindow;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Current settings schema version.
pub const SETTINGS_VERSION: u32 = 2;

// Files without a version field predate versioning.
fn default_version() -> u32 {
    1
}
fn default_od() -> f64 {
    5.0
}
fn default_true() -> bool {
    true
}

/// Explicit window half-widths in ms, overriding the OD-derived ones.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WindowOverride {
    pub marv_ms: f64,
    pub perfect_ms: f64,
    pub great_ms: f64,
    pub good_ms: f64,
    pub bad_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version the file was written with.
    #[serde(default = "default_version")]
    pub version: u32,

    /// osu! Overall Difficulty driving the timing windows.
    #[serde(default = "default_od")]
    pub overall_difficulty: f64,

    /// When set, replaces the OD-derived windows entirely.
    #[serde(default)]
    pub custom_windows: Option<WindowOverride>,

    /// Whether the MAX tier is surfaced or shown as a 300.
    #[serde(default = "default_true")]
    pub show_max_judgement: bool,

    /// Key layouts by key count ("4" to "10"), leftmost column first.
    #[serde(default)]
    pub keybinds: HashMap<String, Vec<String>>,
}

impl Settings {
    /// Loads settings from `path`, or returns defaults if there is no file.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            log::info!("SETTINGS: No file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let mut settings: Settings = toml::from_str(&content).map_err(|e| e.to_string())?;
        if settings.version < SETTINGS_VERSION {
            log::info!(
                "SETTINGS: Migrating file from version {} to {}",
                settings.version,
                SETTINGS_VERSION
            );
        }
        settings.migrate();
        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content = toml::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, content).map_err(|e| e.to_string())
    }

    /// Fills in everything introduced after the file's schema version.
    ///
    /// Key counts with no stored layout get the built-in one rather than
    /// failing, so new layouts never invalidate an old file.
    pub fn migrate(&mut self) {
        for (count, keys) in bindings::default_column_maps() {
            self.keybinds.entry(count.to_string()).or_insert(keys);
        }
        self.version = SETTINGS_VERSION;
    }

    /// Rejects values a session could not safely run with.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=10.0).contains(&self.overall_difficulty) {
            return Err(format!(
                "overall_difficulty {} is outside 0-10",
                self.overall_difficulty
            ));
        }
        self.hit_window().map(|_| ())
    }

    /// Resolves the timing windows these settings describe.
    pub fn hit_window(&self) -> Result<HitWindow, String> {
        let window = match self.custom_windows {
            Some(w) => {
                HitWindow::from_custom(w.marv_ms, w.perfect_ms, w.great_ms, w.good_ms, w.bad_ms)
            }
            None => HitWindow::from_osu_od(self.overall_difficulty),
        };
        if !window.is_nested() {
            return Err("timing windows must strictly widen from MAX to 50".to_string());
        }
        Ok(window)
    }
}

impl Default for Settings {
    fn default() -> Self {
        let mut settings = Self {
            version: SETTINGS_VERSION,
            overall_difficulty: default_od(),
            custom_windows: None,
            show_max_judgement: true,
            keybinds: HashMap::new(),
        };
        settings.migrate();
        settings
    }
}
