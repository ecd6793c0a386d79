use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use gl_wrapper::ErrorPolicy;

use crate::camera::{CameraController, CameraState};

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub scene: SceneConfig,
    pub debug: DebugConfig,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub vsync: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub speed: f32,
    pub sensitivity: f32,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    #[serde(rename = "texture")]
    pub texture_path: Option<PathBuf>,
    pub tint: [f32; 4],
    pub clear_color: [f32; 3],
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct DebugConfig {
    pub error_policy: Option<PolicyName>,
}

#[derive(Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PolicyName {
    Panic,
    Log,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config structure: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;

        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Policy for device errors. Unset means panic in debug builds and log in
    /// release builds.
    pub fn error_policy(&self) -> ErrorPolicy {
        match self.debug.error_policy {
            Some(PolicyName::Panic) => ErrorPolicy::Panic,
            Some(PolicyName::Log) => ErrorPolicy::Log,
            None => ErrorPolicy::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: String::from("Cube field"),
            vsync: true,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        let camera = CameraController::default();
        let state = camera.state;

        Self {
            position: state.position.into(),
            yaw: state.yaw(),
            pitch: state.pitch(),
            fov: state.fov(),
            speed: camera.speed,
            sensitivity: camera.sensitivity,
        }
    }
}

impl CameraConfig {
    pub fn controller(&self) -> CameraController {
        let state = CameraState::new(self.position.into(), self.yaw, self.pitch, self.fov);

        CameraController::new(state, self.speed, self.sensitivity)
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            texture_path: None,
            tint: [1.0, 1.0, 1.0, 1.0],
            clear_color: [0.2, 0.3, 0.3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn partial_tables() {
        let config = Config::parse(
            r#"
            [window]
            width = 800

            [camera]
            speed = 5.0
            position = [1.0, 2.0, 3.0]

            [scene]
            texture = "res/textures/crate.png"

            [debug]
            error_policy = "log"
            "#,
        )
        .unwrap();

        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.camera.speed, 5.0);
        assert_eq!(config.camera.sensitivity, 0.1);
        assert_eq!(
            config.scene.texture_path.as_deref(),
            Some(Path::new("res/textures/crate.png"))
        );
        assert_eq!(config.error_policy(), ErrorPolicy::Log);

        let camera = config.camera.controller();
        assert_eq!(camera.speed, 5.0);
        assert_eq!(camera.state.position, Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn camera_limits_apply() {
        let config = Config::parse("[camera]\npitch = 120.0\nfov = 90.0\n").unwrap();
        let camera = config.camera.controller();

        assert_eq!(camera.state.pitch(), 89.0);
        assert_eq!(camera.state.fov(), 45.0);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(matches!(
            Config::parse("[debug]\nerror_policy = \"ignore\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }
}
