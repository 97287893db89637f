use bytes::Bytes;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};

pub const STYLESHEET_FILE: &str = "all.css";

const BUILT_IN_STYLESHEET: &str = include_str!("../assets/all.css");

#[derive(Debug, Error)]
#[error("couldn't read stylesheet {}: {source}", path.display())]
pub struct AssetError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// The compiled stylesheet served at `/assets/all.css`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet(Bytes);

impl Stylesheet {
    pub fn built_in() -> Self {
        Stylesheet(Bytes::from_static(BUILT_IN_STYLESHEET.as_bytes()))
    }

    pub fn bytes(&self) -> Bytes {
        self.0.clone()
    }
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self::built_in()
    }
}

/// Loads `<assets_dir>/all.css`, or the built-in stylesheet when no assets
/// directory is configured.
pub async fn load_stylesheet(assets_dir: Option<&Path>) -> Result<Stylesheet, AssetError> {
    let Some(dir) = assets_dir else {
        debug!("Using built-in stylesheet");
        return Ok(Stylesheet::built_in());
    };
    let path = dir.join(STYLESHEET_FILE);
    let css = fs::read(&path).await.map_err(|source| AssetError {
        path: path.clone(),
        source,
    })?;
    info!("Loaded stylesheet {} ({} bytes)", path.display(), css.len());
    Ok(Stylesheet(Bytes::from(css)))
}

/// Resolves a request path below `/assets/` to a file under `assets_dir`.
/// Anything but plain file name components is refused.
pub fn asset_path(assets_dir: &Path, relative: &str) -> Option<PathBuf> {
    let decoded = urlencoding::decode(relative).ok()?;
    let relative = Path::new(decoded.as_ref());
    if relative.as_os_str().is_empty() {
        return None;
    }
    let all_normal = relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)));
    if all_normal {
        Some(assets_dir.join(relative))
    } else {
        None
    }
}

/// Reads a static asset. Missing files and directories are `None`.
pub async fn read_asset(assets_dir: &Path, relative: &str) -> io::Result<Option<Bytes>> {
    let Some(path) = asset_path(assets_dir, relative) else {
        return Ok(None);
    };
    match fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Ok(None),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    }
    fs::read(&path).await.map(|data| Some(Bytes::from(data)))
}

pub fn content_type(path: &str) -> &'static str {
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("json") => "application/json",
        Some("html") => "text/html; charset=utf-8",
        _ => "application/octet-stream",
    }
}
