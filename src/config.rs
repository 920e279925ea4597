use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_WIDTH: f32 = 500.0;
pub const DEFAULT_HEIGHT: f32 = 500.0;
pub const DEFAULT_STROKE_WIDTH: f32 = 5.0;
pub const DEFAULT_STROKE_STYLE: &str = "#000";
pub const DEFAULT_FRET_ENUMERATION: u32 = 4;
pub const DEFAULT_FONT_FAMILY: &str = "Gill Sans";
pub const DEFAULT_FONT_SIZE: f32 = 36.0;

/// Fully resolved drawing settings. `Settings::default()` is the built-in
/// baseline every override is merged onto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub width: f32,
    pub height: f32,
    pub stroke_width: f32,
    pub stroke_style: String,
    pub fret_enumeration: u32,
    pub font_family: String,
    pub font_size: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            stroke_width: DEFAULT_STROKE_WIDTH,
            stroke_style: DEFAULT_STROKE_STYLE.to_string(),
            fret_enumeration: DEFAULT_FRET_ENUMERATION,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl Settings {
    /// Returns a copy with every present field of `overrides` applied.
    pub fn merged(&self, overrides: &SettingsOverride) -> Self {
        let mut settings = self.clone();
        settings.apply(overrides);
        settings
    }

    pub fn apply(&mut self, overrides: &SettingsOverride) {
        if let Some(v) = overrides.width {
            self.width = v;
        }
        if let Some(v) = overrides.height {
            self.height = v;
        }
        if let Some(v) = overrides.stroke_width {
            self.stroke_width = v;
        }
        if let Some(v) = &overrides.stroke_style {
            self.stroke_style = v.clone();
        }
        if let Some(v) = overrides.fret_enumeration {
            self.fret_enumeration = v;
        }
        if let Some(v) = &overrides.font_family {
            self.font_family = v.clone();
        }
        if let Some(v) = overrides.font_size {
            self.font_size = v;
        }
    }
}

/// Partial settings as supplied by callers, config files and chord documents.
/// An absent field keeps the underlying value; a present zero is a real zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsOverride {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub stroke_width: Option<f32>,
    pub stroke_style: Option<String>,
    pub fret_enumeration: Option<u32>,
    pub font_family: Option<String>,
    #[serde(default, deserialize_with = "deserialize_font_size")]
    pub font_size: Option<f32>,
}

impl SettingsOverride {
    /// Layers `other` on top of `self`; fields present in `other` win.
    pub fn layered(mut self, other: &SettingsOverride) -> Self {
        if other.width.is_some() {
            self.width = other.width;
        }
        if other.height.is_some() {
            self.height = other.height;
        }
        if other.stroke_width.is_some() {
            self.stroke_width = other.stroke_width;
        }
        if other.stroke_style.is_some() {
            self.stroke_style = other.stroke_style.clone();
        }
        if other.fret_enumeration.is_some() {
            self.fret_enumeration = other.fret_enumeration;
        }
        if other.font_family.is_some() {
            self.font_family = other.font_family.clone();
        }
        if other.font_size.is_some() {
            self.font_size = other.font_size;
        }
        self
    }
}

/// Accepts `36`, `36.5` or CSS-style `"36px"`.
fn deserialize_font_size<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FontSize {
        Number(f32),
        Text(String),
    }

    match Option::<FontSize>::deserialize(deserializer)? {
        None => Ok(None),
        Some(FontSize::Number(value)) => Ok(Some(value)),
        Some(FontSize::Text(text)) => {
            let trimmed = text.trim();
            let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
            number
                .parse::<f32>()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid font size `{text}`")))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub settings: SettingsOverride,
    pub background: Option<String>,
}

impl Config {
    /// Final settings for one diagram. Precedence, lowest first: built-in
    /// defaults, this config file, the chord document, command-line flags.
    pub fn resolve_settings(
        &self,
        document: &SettingsOverride,
        flags: &SettingsOverride,
    ) -> Settings {
        let overrides = self.settings.clone().layered(document).layered(flags);
        Settings::default().merged(&overrides)
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    settings: Option<SettingsOverride>,
    background: Option<String>,
}

/// Loads a JSON config file of the form
/// `{ "settings": { "strokeStyle": "#333" }, "background": "#fff" }`.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;

    if let Some(settings) = parsed.settings {
        config.settings = settings;
    }
    config.background = parsed.background;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_board() {
        let settings = Settings::default();
        assert_eq!(settings.width, 500.0);
        assert_eq!(settings.height, 500.0);
        assert_eq!(settings.stroke_width, 5.0);
        assert_eq!(settings.stroke_style, "#000");
        assert_eq!(settings.fret_enumeration, 4);
        assert_eq!(settings.font_family, "Gill Sans");
        assert_eq!(settings.font_size, 36.0);
    }

    #[test]
    fn explicit_zero_is_not_treated_as_absent() {
        let overrides = SettingsOverride {
            stroke_width: Some(0.0),
            ..Default::default()
        };
        let settings = Settings::default().merged(&overrides);
        assert_eq!(settings.stroke_width, 0.0);
        assert_eq!(settings.height, 500.0);
    }

    #[test]
    fn layered_overrides_prefer_later_values() {
        let base = SettingsOverride {
            width: Some(300.0),
            stroke_style: Some("#333".to_string()),
            ..Default::default()
        };
        let top = SettingsOverride {
            width: Some(600.0),
            ..Default::default()
        };
        let layered = base.layered(&top);
        assert_eq!(layered.width, Some(600.0));
        assert_eq!(layered.stroke_style.as_deref(), Some("#333"));
    }

    #[test]
    fn font_size_accepts_css_pixels() {
        let parsed: SettingsOverride =
            serde_json::from_str(r#"{"fontSize": "24px", "fretEnumeration": 2}"#).unwrap();
        assert_eq!(parsed.font_size, Some(24.0));
        assert_eq!(parsed.fret_enumeration, Some(2));

        let parsed: SettingsOverride = serde_json::from_str(r#"{"fontSize": 18}"#).unwrap();
        assert_eq!(parsed.font_size, Some(18.0));
    }

    #[test]
    fn missing_config_path_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.settings, SettingsOverride::default());
        assert!(config.background.is_none());
    }

    fn write_temp_config(name: &str, contents: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("fretr-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join(name);
        std::fs::write(&path, contents).expect("write config");
        path
    }

    #[test]
    fn loads_settings_and_background_from_file() {
        let path = write_temp_config(
            "load.json",
            r##"{"settings": {"strokeStyle": "#333", "fontSize": "20px"}, "background": "#fafafa"}"##,
        );
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.settings.stroke_style.as_deref(), Some("#333"));
        assert_eq!(config.settings.font_size, Some(20.0));
        assert_eq!(config.background.as_deref(), Some("#fafafa"));
    }

    #[test]
    fn config_file_rejects_unknown_keys() {
        let path = write_temp_config("typo.json", r#"{"settings": {"fretEnumaration": 2}}"#);
        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn precedence_runs_defaults_config_document_flags() {
        let path = write_temp_config(
            "layers.json",
            r##"{"settings": {"width": 300, "height": 300, "strokeStyle": "#333", "fretEnumeration": 3}}"##,
        );
        let config = load_config(Some(&path)).unwrap();
        let document = SettingsOverride {
            height: Some(400.0),
            fret_enumeration: Some(2),
            ..Default::default()
        };
        let flags = SettingsOverride {
            height: Some(600.0),
            ..Default::default()
        };

        let settings = config.resolve_settings(&document, &flags);
        assert_eq!(settings.width, 300.0);
        assert_eq!(settings.height, 600.0);
        assert_eq!(settings.fret_enumeration, 2);
        assert_eq!(settings.stroke_style, "#333");
        assert_eq!(settings.stroke_width, DEFAULT_STROKE_WIDTH);

        let without_flags = config.resolve_settings(&document, &SettingsOverride::default());
        assert_eq!(without_flags.height, 400.0);
    }
}
