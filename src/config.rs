//! Configuration persistence for snapmark editor defaults

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::Tool;

/// RGB annotation color, stored in config as a `#rrggbb` hex string
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShapeColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for ShapeColor {
    fn default() -> Self {
        // Pure red, the editor's historical default
        Self {
            r: 1.0,
            g: 0.0,
            b: 0.0,
        }
    }
}

impl ShapeColor {
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Convert to image crate RGBA format (0-255)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            255,
        ]
    }
}

/// Error returned when a color string is not `#rrggbb`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color {0:?}, expected #rrggbb")]
pub struct ParseColorError(String);

impl FromStr for ShapeColor {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseColorError(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ParseColorError(s.to_string()))
        };
        Ok(Self::from_rgb8(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for ShapeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, _] = self.to_rgba_u8();
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

impl TryFrom<String> for ShapeColor {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ShapeColor> for String {
    fn from(c: ShapeColor) -> Self {
        c.to_string()
    }
}

/// Editor configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Tool selected when a session starts
    pub default_tool: Tool,
    /// Annotation color selected when a session starts
    pub default_color: ShapeColor,
    /// Stroke size selected when a session starts
    pub default_stroke_size: f32,
    /// Smallest stroke size the size control allows
    pub min_stroke_size: f32,
    /// Largest stroke size the size control allows
    pub max_stroke_size: f32,
    /// Number of undo snapshots kept per session
    pub history_capacity: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_tool: Tool::Pen,
            default_color: ShapeColor::default(),
            default_stroke_size: 3.0,
            min_stroke_size: 1.0,
            max_stroke_size: 20.0,
            history_capacity: crate::session::history::DEFAULT_CAPACITY,
        }
    }
}

impl EditorConfig {
    /// Application directory name under the user config dir
    pub const APP_DIR: &'static str = "snapmark";
    /// Config file name
    pub const FILE_NAME: &'static str = "config.json";

    /// Default location of the config file
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::APP_DIR).join(Self::FILE_NAME))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::warn!("Could not determine config directory, using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                return Self::default();
            }
            Err(err) => {
                log::warn!("Could not read config {}: {}", path.display(), err);
                return Self::default();
            }
        };
        match serde_json::from_str::<Self>(&contents) {
            Ok(config) => config.sanitized(),
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) {
        match Self::path() {
            Some(path) => {
                if let Err(err) = self.save_to(&path) {
                    log::error!("Failed to save config: {:?}", err);
                }
            }
            None => log::error!("Could not determine config directory for saving"),
        }
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Repair out-of-range values from hand-edited files or callers
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.min_stroke_size > 0.0 && self.min_stroke_size <= self.max_stroke_size) {
            log::warn!(
                "Invalid stroke size range {}..={}, using defaults",
                self.min_stroke_size,
                self.max_stroke_size
            );
            self.min_stroke_size = defaults.min_stroke_size;
            self.max_stroke_size = defaults.max_stroke_size;
        }
        self.default_stroke_size = self
            .default_stroke_size
            .clamp(self.min_stroke_size, self.max_stroke_size);
        if self.history_capacity == 0 {
            self.history_capacity = defaults.history_capacity;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_round_trip() {
        let color: ShapeColor = "#ff8000".parse().unwrap();
        assert_eq!(color.to_rgba_u8(), [255, 128, 0, 255]);
        assert_eq!(color.to_string(), "#ff8000");
    }

    #[test]
    fn test_color_rejects_garbage() {
        assert!("#ff80".parse::<ShapeColor>().is_err());
        assert!("#gg0000".parse::<ShapeColor>().is_err());
        assert!("#+f+f+f".parse::<ShapeColor>().is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EditorConfig::load_from(&dir.path().join("nope.json"));
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapmark").join("config.json");
        let config = EditorConfig {
            default_tool: Tool::Arrow,
            default_color: ShapeColor::from_rgb8(0, 255, 0),
            default_stroke_size: 7.0,
            ..EditorConfig::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(EditorConfig::load_from(&path), config);
    }

    #[test]
    fn test_partial_file_keeps_field_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r##"{ "default_color": "#0000ff" }"##).unwrap();
        let config = EditorConfig::load_from(&path);
        assert_eq!(config.default_color, ShapeColor::from_rgb8(0, 0, 255));
        assert_eq!(config.history_capacity, 20);
        assert_eq!(config.default_tool, Tool::Pen);
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(EditorConfig::load_from(&path), EditorConfig::default());
    }

    #[test]
    fn test_out_of_range_values_are_repaired() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "default_stroke_size": 90.0, "history_capacity": 0 }"#,
        )
        .unwrap();
        let config = EditorConfig::load_from(&path);
        assert_eq!(config.default_stroke_size, 20.0);
        assert_eq!(config.history_capacity, 20);
    }
}
