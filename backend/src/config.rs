use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid model config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub frontend_dir: PathBuf,
    pub model_config: PathBuf,
}

impl ServerConfig {
    /// Reads the process environment; call `dotenv` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_dir = lookup("CARGO_MANIFEST_DIR")
            .map(|manifest_dir| PathBuf::from(manifest_dir).join(".."))
            .unwrap_or_else(|| PathBuf::from("."));

        let port = match lookup("PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
            })?,
            None => 8081,
        };

        Ok(Self {
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            frontend_dir: lookup("FRONTEND_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| base_dir.join("frontend/dist")),
            model_config: lookup("MODEL_CONFIG")
                .map(PathBuf::from)
                .unwrap_or_else(|| base_dir.join("config/model.yaml")),
        })
    }

    pub fn bind_target(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceChoice {
    #[default]
    Auto,
    Cpu,
    Cuda,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_name")]
    pub name: String,
    pub model_path: PathBuf,
    pub labels_path: PathBuf,
    /// Width and height the image is resized to.
    #[serde(default = "default_input_size")]
    pub input_size: [u32; 2],
    #[serde(default = "default_mean")]
    pub mean: [f32; 3],
    #[serde(default = "default_std")]
    pub std: [f32; 3],
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default)]
    pub device: DeviceChoice,
}

fn default_name() -> String {
    "mobilenet_v2".to_string()
}

fn default_input_size() -> [u32; 2] {
    [224, 224]
}

fn default_mean() -> [f32; 3] {
    [0.485, 0.456, 0.406]
}

fn default_std() -> [f32; 3] {
    [0.229, 0.224, 0.225]
}

fn default_top_k() -> usize {
    3
}

impl ModelConfig {
    /// Loads the YAML file; relative paths inside it are taken relative to
    /// the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml_str(&config_str)?;
        if let Some(dir) = path.parent() {
            config.resolve_paths(dir);
        }
        Ok(config)
    }

    pub fn from_yaml_str(config_str: &str) -> Result<Self, ConfigError> {
        let config: ModelConfig = serde_yaml::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    fn resolve_paths(&mut self, dir: &Path) {
        if self.model_path.is_relative() {
            self.model_path = dir.join(&self.model_path);
        }
        if self.labels_path.is_relative() {
            self.labels_path = dir.join(&self.labels_path);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::Invalid {
                name: "top_k",
                value: self.top_k.to_string(),
            });
        }
        if self.input_size.contains(&0) {
            return Err(ConfigError::Invalid {
                name: "input_size",
                value: format!("{:?}", self.input_size),
            });
        }
        if self.std.iter().any(|s| *s <= 0.0) {
            return Err(ConfigError::Invalid {
                name: "std",
                value: format!("{:?}", self.std),
            });
        }
        Ok(())
    }
}
