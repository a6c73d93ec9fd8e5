//! Mapping from physical key names to gameplay columns, per key count.
//!
//! Key names use the standard scancode-style spelling ("KeyD", "Space",
//! "Semicolon") so they round-trip through the settings file unchanged.

use crate::models::settings::Settings;
use std::collections::HashMap;

#[derive(Clone)]
pub struct KeyBindings {
    column_maps: HashMap<usize, Vec<String>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            column_maps: default_column_maps(),
        }
    }

    /// Overlays the user's keybinds on top of the defaults.
    ///
    /// Key counts absent from the settings keep their default layout, so a
    /// settings file written before a key count existed still plays.
    pub fn reload_from_settings(&mut self, settings: &Settings) {
        for (count_str, keys) in &settings.keybinds {
            let Ok(count) = count_str.parse::<usize>() else {
                log::warn!("INPUT: Ignoring keybind entry with key count {:?}", count_str);
                continue;
            };
            if keys.len() != count {
                log::warn!(
                    "INPUT: Keybinds for {}K list {} keys, keeping defaults",
                    count,
                    keys.len()
                );
                continue;
            }
            self.column_maps.insert(count, keys.clone());
        }
    }

    /// Resolves a key name to its column for the given key count.
    pub fn column_for(&self, key_count: usize, key: &str) -> Option<usize> {
        self.column_maps
            .get(&key_count)?
            .iter()
            .position(|bound| bound == key)
    }

    /// The bound key names for a key count, leftmost column first.
    pub fn keys_for(&self, key_count: usize) -> Option<&[String]> {
        self.column_maps.get(&key_count).map(|keys| keys.as_slice())
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

/// Default layouts for every supported key count.
///
/// Also used to seed missing entries when migrating an older settings file.
pub fn default_column_maps() -> HashMap<usize, Vec<String>> {
    let layouts: [(usize, &[&str]); 7] = [
        (4, &["KeyD", "KeyF", "KeyJ", "KeyK"]),
        (5, &["KeyD", "KeyF", "Space", "KeyJ", "KeyK"]),
        (6, &["KeyS", "KeyD", "KeyF", "KeyJ", "KeyK", "KeyL"]),
        (7, &["KeyS", "KeyD", "KeyF", "Space", "KeyJ", "KeyK", "KeyL"]),
        (8, &["KeyA", "KeyS", "KeyD", "KeyF", "KeyJ", "KeyK", "KeyL", "Semicolon"]),
        (
            9,
            &["KeyA", "KeyS", "KeyD", "KeyF", "Space", "KeyJ", "KeyK", "KeyL", "Semicolon"],
        ),
        (
            10,
            &["KeyA", "KeyS", "KeyD", "KeyF", "KeyV", "KeyN", "KeyJ", "KeyK", "KeyL", "Semicolon"],
        ),
    ];

    layouts
        .into_iter()
        .map(|(count, keys)| (count, keys.iter().map(|k| k.to_string()).collect()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_supported_key_count() {
        let bindings = KeyBindings::new();
        for count in 4..=10 {
            let keys = bindings.keys_for(count).unwrap();
            assert_eq!(keys.len(), count);
        }
    }

    #[test]
    fn column_lookup_matches_layout_order() {
        let bindings = KeyBindings::new();
        assert_eq!(bindings.column_for(4, "KeyD"), Some(0));
        assert_eq!(bindings.column_for(4, "KeyK"), Some(3));
        assert_eq!(bindings.column_for(7, "Space"), Some(3));
        assert_eq!(bindings.column_for(4, "KeyQ"), None);
    }

    #[test]
    fn settings_overlay_replaces_only_listed_counts() {
        let mut settings = Settings::default();
        settings.keybinds.insert(
            "4".to_string(),
            vec!["KeyZ", "KeyX", "Comma", "Period"]
                .into_iter()
                .map(String::from)
                .collect(),
        );

        let mut bindings = KeyBindings::new();
        bindings.reload_from_settings(&settings);

        assert_eq!(bindings.column_for(4, "KeyZ"), Some(0));
        assert_eq!(bindings.column_for(4, "KeyD"), None);
        // 7K untouched by the overlay.
        assert_eq!(bindings.column_for(7, "KeyS"), Some(0));
    }

    #[test]
    fn malformed_overlay_entries_keep_defaults() {
        let mut settings = Settings::default();
        settings
            .keybinds
            .insert("4".to_string(), vec!["KeyZ".to_string()]);

        let mut bindings = KeyBindings::new();
        bindings.reload_from_settings(&settings);

        assert_eq!(bindings.column_for(4, "KeyD"), Some(0));
    }
}
