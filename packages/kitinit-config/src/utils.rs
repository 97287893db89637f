use std::{env, io, path::PathBuf};

/// Overrides the location of the config file when set.
pub const CONFIG_FILE_ENV: &str = "GOVUK_PROTOTYPE_KIT_INIT_CONFIG_FILE";
pub const CONFIG_FILE_NAME: &str = ".govuk-prototype-kit-init.config.json";

#[cfg(not(target_family = "windows"))]
const HOME_ENV: &str = "HOME";

#[cfg(target_family = "windows")]
const HOME_ENV: &str = "USERPROFILE";

pub fn home_dir() -> Result<PathBuf, io::Error> {
    env::var_os(HOME_ENV)
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{} not found", HOME_ENV)))
}

pub fn config_file_path() -> Result<PathBuf, io::Error> {
    match env::var_os(CONFIG_FILE_ENV).filter(|path| !path.is_empty()) {
        Some(path) => Ok(PathBuf::from(path)),
        None => Ok(home_dir()?.join(CONFIG_FILE_NAME)),
    }
}
