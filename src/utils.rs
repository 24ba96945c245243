use anyhow::{bail, Context, Result};
use std::net::SocketAddr;
use std::process::Command;

/// Address the map page is served from.
pub fn map_url(addr: SocketAddr) -> String {
    format!("http://{}/", addr)
}

/// Platform launcher for `url`, or `None` where no launcher is known.
fn launcher_for(url: &str) -> Option<Command> {
    let (program, leading): (&str, &[&str]) = if cfg!(target_os = "macos") {
        ("open", &[])
    } else if cfg!(target_os = "windows") {
        // `start` treats the first quoted argument as a window title
        ("cmd", &["/C", "start", ""])
    } else if cfg!(unix) {
        ("xdg-open", &[])
    } else {
        return None;
    };

    let mut command = Command::new(program);
    command.args(leading).arg(url);
    Some(command)
}

/// Hands the map page to the desktop's default browser without waiting for it.
pub fn open_browser(url: &str) -> Result<()> {
    let Some(mut command) = launcher_for(url) else {
        bail!("no browser launcher for {}", std::env::consts::OS);
    };
    command
        .spawn()
        .with_context(|| format!("Failed to launch {:?}", command.get_program()))?;
    tracing::debug!("Opened {} in the default browser", url);
    Ok(())
}
