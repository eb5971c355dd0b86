//! Persisted backdrop preferences.
//!
//! The host stores the user's choices as JSON, using the same keys the web
//! desktop kept in browser storage (`particleDensity`, `animatedBg`,
//! `accentColor`) plus the backdrop theme and optional tuning blocks.
//!
//! ```json
//! {
//!   "particleDensity": 5,
//!   "animatedBg": true,
//!   "accentColor": "#0a84ff",
//!   "theme": "field"
//! }
//! ```
//!
//! Every key is optional. The density slider wrote its value back as a
//! string, so `"particleDensity": "7"` is accepted too.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::color::Rgba;
use crate::comet::CometParams;
use crate::engine::BackdropMode;
use crate::error::SettingsError;
use crate::field::{FieldParams, DEFAULT_DENSITY};

/// Default accent color string.
pub const DEFAULT_ACCENT: &str = "#0a84ff";

/// User preferences for the backdrop.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Density slider value; mote count is `floor(density * 20)`.
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub particle_density: f32,
    /// Whether the backdrop animates at all.
    pub animated_bg: bool,
    /// CSS hex accent, used to tint the comet.
    pub accent_color: String,
    /// Which backdrop to show.
    pub theme: BackdropMode,
    /// Field tuning.
    pub field: FieldParams,
    /// Comet tuning.
    pub comet: CometParams,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            particle_density: DEFAULT_DENSITY,
            animated_bg: true,
            accent_color: DEFAULT_ACCENT.to_string(),
            theme: BackdropMode::Field,
            field: FieldParams::default(),
            comet: CometParams::default(),
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string.
    ///
    /// Tuning values that are non-finite or out of range are reset to
    /// their defaults, and the comet trail is clamped to its maximum.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Copy with both tuning blocks sanitized.
    pub fn sanitized(self) -> Self {
        Self {
            field: self.field.sanitized(),
            comet: self.comet.sanitized(),
            ..self
        }
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults when the file is missing or
    /// unreadable. A corrupt file is reported but never fatal.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
                Self::default()
            }
        }
    }

    /// Save settings as pretty-printed JSON, creating parent directories.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SettingsError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// The accent as a color. Unparseable strings fall back to the default.
    pub fn accent(&self) -> Rgba {
        Rgba::from_hex(&self.accent_color).unwrap_or_else(|| {
            tracing::warn!(accent = %self.accent_color, "invalid accent color, using default");
            Rgba::ACCENT
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f32),
    Text(String),
}

fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(test: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("motefield-{}-{}", std::process::id(), test))
    }

    #[test]
    fn test_defaults_match_web_desktop() {
        let settings = Settings::default();
        assert_eq!(settings.particle_density, 5.0);
        assert!(settings.animated_bg);
        assert_eq!(settings.accent_color, "#0a84ff");
        assert_eq!(settings.theme, BackdropMode::Field);
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let settings = Settings::from_json(r#"{ "animatedBg": false }"#).unwrap();
        assert!(!settings.animated_bg);
        assert_eq!(settings.particle_density, 5.0);
        assert_eq!(settings.field, FieldParams::default());
    }

    #[test]
    fn test_density_as_string() {
        let settings = Settings::from_json(r#"{ "particleDensity": "7" }"#).unwrap();
        assert_eq!(settings.particle_density, 7.0);

        assert!(Settings::from_json(r#"{ "particleDensity": "lots" }"#).is_err());
    }

    #[test]
    fn test_theme_and_partial_params() {
        let settings = Settings::from_json(
            r#"{ "theme": "comet", "field": { "friction": 0.9 } }"#,
        )
        .unwrap();
        assert_eq!(settings.theme, BackdropMode::Comet);
        assert_eq!(settings.field.friction, 0.9);
        assert_eq!(settings.field.link_distance, 100.0);
    }

    #[test]
    fn test_hostile_tuning_is_sanitized() {
        let settings = Settings::from_json(
            r#"{
                "comet": { "trail_length": 18446744073709551615, "easing": -4.0 },
                "field": { "friction": 7.0, "link_width": 2.0 }
            }"#,
        )
        .unwrap();

        assert_eq!(settings.comet.trail_length, 40);
        assert_eq!(settings.comet.easing, CometParams::default().easing);
        assert_eq!(settings.field.friction, 0.98);
        assert_eq!(settings.field.link_width, 2.0);

        let over_cap = Settings::from_json(r#"{ "comet": { "trail_length": 41 } }"#).unwrap();
        assert_eq!(over_cap.comet.trail_length, 40);
    }

    #[test]
    fn test_hostile_settings_still_build_an_engine() {
        use crate::engine::Engine;
        use crate::surface::DrawList;

        let settings = Settings {
            comet: CometParams {
                trail_length: usize::MAX,
                ..CometParams::default()
            },
            ..Settings::default()
        };
        let mut engine = Engine::from_settings(Some(DrawList::new(100, 100)), &settings)
            .with_mode(BackdropMode::Comet);
        let handle = engine.start().unwrap();
        for _ in 0..60 {
            engine.frame(handle);
        }
        assert_eq!(engine.comet().trail().len(), 40);
        assert_eq!(engine.field().len(), 100);
    }

    #[test]
    fn test_invalid_accent_falls_back() {
        let settings = Settings {
            accent_color: "not a color".into(),
            ..Settings::default()
        };
        assert_eq!(settings.accent(), Rgba::ACCENT);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = temp_dir("save_and_load");
        let path = dir.join("nested/settings.json");
        let settings = Settings {
            particle_density: 3.0,
            accent_color: "#ff375f".into(),
            theme: BackdropMode::Comet,
            ..Settings::default()
        };

        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_or_default_tolerates_bad_files() {
        let dir = temp_dir("load_or_default");
        assert_eq!(
            Settings::load_or_default(dir.join("does-not-exist.json")),
            Settings::default()
        );

        let path = dir.join("corrupt.json");
        fs::create_dir_all(&dir).unwrap();
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_or_default(&path), Settings::default());
        let _ = fs::remove_dir_all(&dir);
    }
}
