use serde_json::{Map, Value};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("couldn't find directory {0}")]
    MissingParent(PathBuf),

    #[error("config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("config file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config file {0} must contain a JSON object")]
    NotAnObject(PathBuf),
}

/// The per-user settings file, read once at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    path: PathBuf,
    values: Map<String, Value>,
}

impl Config {
    pub fn new(path: impl Into<PathBuf>, values: Map<String, Value>) -> Self {
        Self {
            path: path.into(),
            values,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }
}

/// Reads the config file at `path`, creating it as `{}` when it does not
/// exist yet. The parent directory must already exist.
pub async fn load_or_create(path: &Path) -> Result<Config, ConfigError> {
    let parent = match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
        Some(parent) => parent,
        None => Path::new("/"),
    };
    match fs::metadata(parent).await {
        Ok(meta) if meta.is_dir() => {}
        _ => return Err(ConfigError::MissingParent(parent.to_path_buf())),
    }

    let io_err = |source: io::Error| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    let contents = match fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating config file {}", path.display());
            fs::write(path, "{}\n").await.map_err(io_err)?;
            return Ok(Config::new(path, Map::new()));
        }
        Err(e) => return Err(io_err(e)),
    };

    let value: Value = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(values) => {
            debug!("Loaded config {}: {}", path.display(), serde_json::Value::Object(values.clone()));
            Ok(Config::new(path, values))
        }
        _ => Err(ConfigError::NotAnObject(path.to_path_buf())),
    }
}
