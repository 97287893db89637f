use std::io;
use std::process::{Command, Stdio};

#[cfg(target_os = "macos")]
fn opener(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "windows")]
fn opener(url: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", url]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}

/// Opens `url` in the default browser without waiting for it to exit.
pub fn open(url: &str) -> io::Result<()> {
    opener(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opener_passes_url() {
        let cmd = opener("http://localhost:1234/");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args.last().and_then(|a| a.to_str()), Some("http://localhost:1234/"));
    }
}
