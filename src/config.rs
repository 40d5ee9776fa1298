//! Startup configuration.
//!
//! The sandbox runs fine without any config file; every field has a default
//! matching the stock `./model`, `./image` and `./shader` layout. A JSON file
//! only needs the fields it wants to change.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "GLSANDBOX_CONFIG";

/// Skybox face file stems in cube map upload order (+X, -X, +Y, -Y, +Z, -Z).
pub const SKYBOX_FACES: [&str; 6] = ["right", "left", "top", "bottom", "front", "back"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// MSAA samples requested for the default framebuffer. 0 disables it.
    pub samples: u8,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "glsandbox".to_string(),
            width: 1280,
            height: 720,
            samples: 4,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub model: PathBuf,
    pub skybox_dir: PathBuf,
    pub skybox_extension: String,
    pub shader_dir: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            model: PathBuf::from("./model/helmet.obj"),
            skybox_dir: PathBuf::from("./image/skybox"),
            skybox_extension: "jpg".to_string(),
            shader_dir: PathBuf::from("./shader"),
        }
    }
}

impl AssetsConfig {
    /// The six skybox image paths in cube map order.
    pub fn skybox_faces(&self) -> [PathBuf; 6] {
        SKYBOX_FACES.map(|face| {
            self.skybox_dir
                .join(face)
                .with_extension(&self.skybox_extension)
        })
    }

    /// Path of a shader source file inside the shader directory.
    pub fn shader(&self, file: &str) -> PathBuf {
        self.shader_dir.join(file)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Translation per frame while a movement key is held.
    pub speed: f32,
    /// Degrees of yaw/pitch per pixel of mouse drag.
    pub rotate_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            speed: 0.01,
            rotate_speed: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub assets: AssetsConfig,
    pub camera: CameraConfig,
    pub log_level: LogLevel,
}

/// Wrapper so the default level survives `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogLevel(pub String);

impl Default for LogLevel {
    fn default() -> Self {
        Self("info".to_string())
    }
}

impl Config {
    /// Reads and parses a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the first config file found, or the defaults if there is none.
    ///
    /// Also returns the path the config came from, for logging.
    pub fn load() -> Result<(Self, Option<PathBuf>)> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        if let Some(path) = explicit {
            // An explicitly named file has to exist.
            return Ok((Self::from_file(&path)?, Some(path)));
        }
        for path in search_paths() {
            if path.is_file() {
                return Ok((Self::from_file(&path)?, Some(path)));
            }
        }
        Ok((Self::default(), None))
    }
}

/// Implicit config locations, most specific first.
fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("./glsandbox.json")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("glsandbox").join("config.json"));
    }
    paths
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "window": {{ "width": 800 }}, "camera": {{ "speed": 0.05 }} }}"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.camera.speed, 0.05);
        assert_eq!(config.camera.rotate_speed, 0.3);
        assert_eq!(config.log_level.0, "info");
        assert_eq!(config.assets, AssetsConfig::default());
    }

    #[test]
    fn test_round_trip() {
        let mut config = Config::default();
        config.window.title = "test".to_string();
        config.log_level = LogLevel("debug".to_string());
        let text = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            Config::from_file(file.path()),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(Config::from_file(&missing), Err(Error::Io { .. })));
    }

    #[test]
    fn test_skybox_faces_order() {
        let assets = AssetsConfig::default();
        let faces = assets.skybox_faces();
        assert_eq!(faces[0], PathBuf::from("./image/skybox/right.jpg"));
        assert_eq!(faces[3], PathBuf::from("./image/skybox/bottom.jpg"));
        assert_eq!(faces[5], PathBuf::from("./image/skybox/back.jpg"));
        assert_eq!(
            assets.shader("lighting.vs"),
            PathBuf::from("./shader/lighting.vs")
        );
    }
}
