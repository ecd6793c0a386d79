use std::path::PathBuf;

use clap::Parser;

use cubefield::config::{Config, ConfigError};

#[derive(Debug, Parser)]
pub struct Args {
    /// TOML file with window, camera and scene settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// PNG image used as the cube texture
    #[arg(short, long)]
    pub texture: Option<PathBuf>,
    /// Shader file with `#shader vertex` and `#shader fragment` sections
    #[arg(long)]
    pub shader: Option<PathBuf>,
    #[arg(long)]
    pub width: Option<u32>,
    #[arg(long)]
    pub height: Option<u32>,
}

impl Args {
    /// Reads the config file if given; command line values take precedence.
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(texture) = &self.texture {
            config.scene.texture_path = Some(texture.clone());
        }

        if let Some(width) = self.width {
            config.window.width = width;
        }

        if let Some(height) = self.height {
            config.window.height = height;
        }

        Ok(config)
    }
}
