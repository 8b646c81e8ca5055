//! Hand a rendered file to the desktop viewer

use std::path::Path;
use std::process::{Command, Stdio};

use knowmap_core::{KnowMapError, Result};

/// Platform launcher and its leading arguments
fn launcher() -> (&'static str, &'static [&'static str]) {
    const NO_ARGS: &[&str] = &[];
    const WINDOWS_START: &[&str] = &["/C", "start", ""];

    if cfg!(target_os = "macos") {
        ("open", NO_ARGS)
    } else if cfg!(target_os = "windows") {
        ("cmd", WINDOWS_START)
    } else {
        ("xdg-open", NO_ARGS)
    }
}

/// Open `path` with the system's default application
///
/// Blocks until the launcher returns. A missing launcher or a non-zero exit
/// is reported as a render error; callers usually log it and carry on since
/// the file itself has already been written.
pub fn open_path(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let (program, args) = launcher();

    let status = Command::new(program)
        .args(args)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| KnowMapError::Render(format!("failed to launch {program}: {e}")))?;

    if !status.success() {
        return Err(KnowMapError::Render(format!(
            "{program} exited with {status} for {}",
            path.display()
        )));
    }

    tracing::debug!(path = %path.display(), launcher = program, "opened in viewer");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launcher_known() {
        let (program, _) = launcher();
        assert!(["open", "cmd", "xdg-open"].contains(&program));
    }
}
