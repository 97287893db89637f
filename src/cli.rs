use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;

use kitinit_config::CONFIG_FILE_ENV;
use kitinit_release::{DEFAULT_REPOSITORY, GITHUB_API_URL};

#[derive(Debug, Parser)]
#[command(name = "kitinit")]
#[command(about = "Create a new GOV.UK prototype from your browser")]
#[command(version)]
pub struct Cli {
    /// Port to listen on, 0 picks a free one
    #[arg(long, env = "PORT", default_value_t = 0)]
    pub port: u16,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Config file path [default: ~/.govuk-prototype-kit-init.config.json]
    #[arg(long, env = CONFIG_FILE_ENV)]
    pub config: Option<PathBuf>,

    /// Directory holding all.css and other static assets
    #[arg(long)]
    pub assets_dir: Option<PathBuf>,

    /// GitHub API base URL
    #[arg(long, default_value = GITHUB_API_URL)]
    pub api_url: String,

    /// Repository releases are read from
    #[arg(long, default_value = DEFAULT_REPOSITORY)]
    pub repository: String,

    /// Don't open a browser
    #[arg(long)]
    pub no_open: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["kitinit"]).unwrap();
        assert_eq!(cli.host.to_string(), "127.0.0.1");
        assert_eq!(cli.api_url, GITHUB_API_URL);
        assert_eq!(cli.repository, DEFAULT_REPOSITORY);
        assert!(!cli.no_open);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "kitinit",
            "--port",
            "3000",
            "--config",
            "/tmp/kit.json",
            "--assets-dir",
            "/srv/assets",
            "--repository",
            "me/fork",
            "--no-open",
        ])
        .unwrap();
        assert_eq!(cli.port, 3000);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/kit.json")));
        assert_eq!(cli.assets_dir, Some(PathBuf::from("/srv/assets")));
        assert_eq!(cli.repository, "me/fork");
        assert!(cli.no_open);
    }

    #[test]
    fn test_rejects_bad_port() {
        assert!(Cli::try_parse_from(["kitinit", "--port", "70000"]).is_err());
    }
}
