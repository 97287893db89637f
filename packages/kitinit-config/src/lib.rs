pub mod config_file;
pub mod utils;

// Re-export commonly used types
pub use config_file::{load_or_create, Config, ConfigError};
pub use utils::{config_file_path, home_dir, CONFIG_FILE_ENV, CONFIG_FILE_NAME};

/// Config key holding an optional GitHub token, sent with release requests.
pub const GITHUB_TOKEN_KEY: &str = "githubToken";
