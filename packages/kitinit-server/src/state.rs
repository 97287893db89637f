use std::path::PathBuf;
use std::sync::Arc;

use kitinit_config::{load_or_create, Config, ConfigError, GITHUB_TOKEN_KEY};
use kitinit_release::{ReleaseFetcher, DEFAULT_REPOSITORY, GITHUB_API_URL};
use kitinit_wizard::{Finalizer, ScaffoldFinalizer};
use thiserror::Error;
use tracing::info;

use crate::assets::{load_stylesheet, AssetError, Stylesheet};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Assets(#[from] AssetError),
}

/// Everything a request handler needs. Built once at startup and shared
/// read-only between connections.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub fetcher: ReleaseFetcher,
    /// Where the Location step starts browsing.
    pub home: PathBuf,
    pub stylesheet: Stylesheet,
    pub assets_dir: Option<PathBuf>,
    pub finalizer: Arc<dyn Finalizer>,
}

impl AppState {
    pub fn new(config: Config, fetcher: ReleaseFetcher, home: PathBuf) -> Self {
        Self {
            config,
            fetcher,
            home,
            stylesheet: Stylesheet::built_in(),
            assets_dir: None,
            finalizer: Arc::new(ScaffoldFinalizer),
        }
    }

    pub fn with_assets(mut self, stylesheet: Stylesheet, assets_dir: Option<PathBuf>) -> Self {
        self.stylesheet = stylesheet;
        self.assets_dir = assets_dir;
        self
    }

    pub fn with_finalizer(mut self, finalizer: Arc<dyn Finalizer>) -> Self {
        self.finalizer = finalizer;
        self
    }
}

#[derive(Debug, Clone)]
pub struct StartupOptions {
    pub config_file: PathBuf,
    pub assets_dir: Option<PathBuf>,
    pub api_url: String,
    pub repository: String,
    pub home: PathBuf,
}

impl StartupOptions {
    pub fn new(config_file: PathBuf, home: PathBuf) -> Self {
        Self {
            config_file,
            assets_dir: None,
            api_url: GITHUB_API_URL.to_string(),
            repository: DEFAULT_REPOSITORY.to_string(),
            home,
        }
    }
}

/// Loads the config file and the stylesheet concurrently. Either failing
/// aborts startup.
pub async fn prepare(options: StartupOptions) -> Result<AppState, StartupError> {
    let (config, stylesheet) = tokio::try_join!(
        async { load_or_create(&options.config_file).await.map_err(StartupError::from) },
        async {
            load_stylesheet(options.assets_dir.as_deref())
                .await
                .map_err(StartupError::from)
        },
    )?;

    let token = config.get_str(GITHUB_TOKEN_KEY).map(str::to_string);
    if token.is_some() {
        info!("Using GitHub token from {}", config.path().display());
    }
    let fetcher = ReleaseFetcher::new(options.api_url, options.repository).with_token(token);
    Ok(AppState::new(config, fetcher, options.home).with_assets(stylesheet, options.assets_dir))
}
