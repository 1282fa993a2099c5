//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority
//! (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`SPINVIZ_SECTION__KEY`)
//!
//! Unrecognized keys anywhere in the merged configuration are reported with a
//! warning and ignored; recognized state is unaffected.

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use spinviz_math::Vec3;
use spinviz_render::{Camera, GlyphParams};
use std::path::Path;

use crate::options::ViewOptions;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Glyph shape configuration
    #[serde(default)]
    pub glyph: GlyphConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Rendering configuration
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Demo spin lattice configuration
    #[serde(default)]
    pub lattice: LatticeConfig,
}

/// Recognized sections and their keys, used for unknown-key warnings
const RECOGNIZED_KEYS: &[(&str, &[&str])] = &[
    ("window", &["title", "width", "height", "fullscreen", "vsync"]),
    (
        "glyph",
        &["level_of_detail", "cone_height", "cone_radius", "cylinder_height", "cylinder_radius"],
    ),
    (
        "camera",
        &["location", "center", "up", "vertical_fov", "allow_movement"],
    ),
    ("rendering", &["colormap", "background_color"]),
    ("lattice", &["extent", "spacing", "core_radius"]),
];

impl AppConfig {
    /// Load configuration from default locations.
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`SPINVIZ_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // SPINVIZ_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed("SPINVIZ_").split("__"));

        for key in unknown_keys(&figment) {
            log::warn!("Unrecognized configuration option '{}' ignored", key);
        }

        figment.extract().map_err(ConfigError::from)
    }

    /// Glyph shape parameters for the geometry builder
    pub fn glyph_params(&self) -> GlyphParams {
        GlyphParams {
            level_of_detail: self.glyph.level_of_detail,
            cone_height: self.glyph.cone_height,
            cone_radius: self.glyph.cone_radius,
            cylinder_height: self.glyph.cylinder_height,
            cylinder_radius: self.glyph.cylinder_radius,
        }
    }

    /// Initial camera state
    pub fn initial_camera(&self) -> Camera {
        Camera {
            location: Vec3::from(self.camera.location),
            center: Vec3::from(self.camera.center),
            up: Vec3::from(self.camera.up),
            vertical_fov: self.camera.vertical_fov,
            background: self.rendering.background_color,
        }
    }

    /// The full option set driving the render system
    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            glyph: self.glyph_params(),
            colormap: self.rendering.colormap.clone(),
            vertical_fov: self.camera.vertical_fov,
            allow_camera_movement: self.camera.allow_movement,
            camera_location: self.camera.location,
            center_location: self.camera.center,
            up_vector: self.camera.up,
            background_color: self.rendering.background_color,
        }
    }
}

/// Collect configuration keys no section recognizes.
///
/// Pure over the merged figment value so it is testable without touching the
/// process environment.
pub fn unknown_keys(figment: &Figment) -> Vec<String> {
    let mut unknown = Vec::new();
    let Ok(value) = figment.extract::<figment::value::Value>() else {
        return unknown;
    };
    let Some(dict) = value.into_dict() else {
        return unknown;
    };

    for (section, entry) in dict {
        let Some((_, keys)) = RECOGNIZED_KEYS.iter().find(|(name, _)| *name == section) else {
            unknown.push(section);
            continue;
        };
        if let Some(section_dict) = entry.into_dict() {
            for key in section_dict.into_keys() {
                if !keys.contains(&key.as_str()) {
                    unknown.push(format!("{}.{}", section, key));
                }
            }
        }
    }
    unknown
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "spinviz - Spin Field Viewer".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// Glyph shape configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlyphConfig {
    /// Angular segments per circular cross-section (minimum 3)
    pub level_of_detail: u32,
    pub cone_height: f32,
    pub cone_radius: f32,
    pub cylinder_height: f32,
    pub cylinder_radius: f32,
}

impl Default for GlyphConfig {
    fn default() -> Self {
        Self {
            level_of_detail: 20,
            cone_height: 0.6,
            cone_radius: 0.25,
            cylinder_height: 0.7,
            cylinder_radius: 0.125,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Viewpoint position [x, y, z]
    pub location: [f32; 3],
    /// Orbit center [x, y, z]
    pub center: [f32; 3],
    /// Up reference vector [x, y, z]
    pub up: [f32; 3],
    /// Vertical field of view in degrees
    pub vertical_fov: f32,
    /// Enable orbit/pan/zoom input
    pub allow_movement: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            location: [0.0, 0.0, 1.0],
            center: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
            vertical_fov: 45.0,
            allow_movement: true,
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderingConfig {
    /// Colormap name (red, redblue, hue)
    pub colormap: String,
    /// Background color [r, g, b]
    pub background_color: [f32; 3],
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            colormap: "red".to_string(),
            background_color: [0.0, 0.0, 0.0],
        }
    }
}

/// Demo spin lattice configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatticeConfig {
    /// Sites along each axis [nx, ny, nz]
    pub extent: [u32; 3],
    /// Distance between neighboring sites
    pub spacing: f32,
    /// Radius of the vortex core, in lattice units
    pub core_radius: f32,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            extent: [21, 21, 1],
            spacing: 1.0,
            core_radius: 4.0,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.glyph.level_of_detail, 20);
        assert_eq!(config.rendering.colormap, "red");
        assert!(config.camera.allow_movement);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("title"));
        assert!(toml.contains("cone_height"));
        assert!(toml.contains("colormap"));
    }

    #[test]
    fn test_glyph_params_mapping() {
        let config = AppConfig::default();
        let params = config.glyph_params();
        assert_eq!(params.cone_height, 0.6);
        assert_eq!(params.cylinder_radius, 0.125);
    }

    #[test]
    fn test_initial_camera_mapping() {
        let mut config = AppConfig::default();
        config.camera.location = [0.0, 0.0, 30.0];
        config.rendering.background_color = [0.1, 0.2, 0.3];
        let camera = config.initial_camera();
        assert_eq!(camera.location.z, 30.0);
        assert_eq!(camera.background, [0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_unknown_section_detected() {
        let figment = Figment::new().merge(Toml::string("[physics]\ngravity = -9.8\n"));
        let unknown = unknown_keys(&figment);
        assert_eq!(unknown, vec!["physics".to_string()]);
    }

    #[test]
    fn test_unknown_key_in_section_detected() {
        let figment = Figment::new().merge(Toml::string(
            "[glyph]\ncone_height = 0.5\ncone_hieght = 0.5\n",
        ));
        let unknown = unknown_keys(&figment);
        assert_eq!(unknown, vec!["glyph.cone_hieght".to_string()]);
    }

    #[test]
    fn test_recognized_config_has_no_unknown_keys() {
        let toml = toml::to_string(&AppConfig::default()).unwrap();
        let figment = Figment::new().merge(Toml::string(&toml));
        assert!(unknown_keys(&figment).is_empty());
    }
}
