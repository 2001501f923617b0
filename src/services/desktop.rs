//! Desktop application packaging
//!
//! Wraps the running web endpoint into a native desktop artifact with
//! nativefier, then places it in the OS-specific location:
//! /Applications on macOS, /usr/local/bin on Linux,
//! Program Files plus a desktop shortcut on Windows.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use crate::config::StackConfig;
use crate::domain::platform::{self, OsFamily};
use crate::error::{BootstrapError, BootstrapResult};
use crate::infra::command::CommandRunner;

/// nativefier builds can be slow (electron download on first run)
const PACKAGE_TIMEOUT: Duration = Duration::from_secs(1800);

/// Package the web endpoint into a desktop app and install it
pub async fn package_desktop_app(config: &StackConfig) -> BootstrapResult<()> {
    let os = OsFamily::current()
        .ok_or_else(|| BootstrapError::UnsupportedPlatform(std::env::consts::OS.to_string()))?;

    let staging = std::env::temp_dir().join("chatstack-desktop");
    tokio::fs::create_dir_all(&staging).await?;
    let staging_str = staging.to_string_lossy().to_string();

    let url = format!("http://localhost:{}", config.native_port);
    let args = [
        "--name",
        config.app_name.as_str(),
        url.as_str(),
        "--platform",
        os.nativefier_platform(),
        "--overwrite",
        staging_str.as_str(),
    ];

    info!(">>> nativefier {}", args.join(" "));
    let result = CommandRunner::run_streamed("nativefier", &args, Some(PACKAGE_TIMEOUT)).await?;
    if !result.status.success() {
        return Err(BootstrapError::command_failed(
            "nativefier",
            format!("exit code {}", result.status.code().unwrap_or(-1)),
        ));
    }

    let bundle = find_bundle(&staging, &config.app_name).await?;
    info!(bundle = %bundle.display(), "Desktop bundle built");

    let root = platform::is_root();
    for (program, args) in placement_commands(os, &bundle, &config.app_name, root) {
        info!(">>> {} {}", program, args.join(" "));
        let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
        let output = CommandRunner::run(&program, &arg_refs, Some(Duration::from_secs(120))).await?;
        if !output.status.success() {
            return Err(BootstrapError::command_failed(
                program,
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
    }

    info!(app = %config.app_name, "Desktop application installed");
    Ok(())
}

/// Locate the bundle directory nativefier produced
/// (named `<AppName>-<platform>-<arch>`)
async fn find_bundle(staging: &Path, app_name: &str) -> BootstrapResult<PathBuf> {
    let mut entries = tokio::fs::read_dir(staging).await?;
    while let Some(entry) = entries.next_entry().await? {
        let file_type = entry.file_type().await?;
        if file_type.is_dir()
            && entry
                .file_name()
                .to_string_lossy()
                .starts_with(app_name)
        {
            return Ok(entry.path());
        }
    }
    Err(BootstrapError::command_failed(
        "nativefier",
        format!("no bundle for {} found in {}", app_name, staging.display()),
    ))
}

/// Build the placement command sequence per OS family
fn placement_commands(
    os: OsFamily,
    bundle: &Path,
    app_name: &str,
    root: bool,
) -> Vec<(String, Vec<String>)> {
    match os {
        OsFamily::MacOs => {
            let app = bundle.join(format!("{}.app", app_name));
            vec![(
                "cp".to_string(),
                vec![
                    "-R".to_string(),
                    app.to_string_lossy().to_string(),
                    "/Applications/".to_string(),
                ],
            )]
        }
        OsFamily::Linux => {
            let binary = bundle.join(app_name).to_string_lossy().to_string();
            let dest = format!("/usr/local/bin/{}", app_name);
            let cmd = ["install", "-m", "755", binary.as_str(), dest.as_str()];
            let (program, args) = platform::elevate(os, root, &cmd);
            vec![(
                program.to_string(),
                args.into_iter().map(String::from).collect(),
            )]
        }
        OsFamily::Windows => {
            let program_files =
                std::env::var("ProgramFiles").unwrap_or_else(|_| "C:\\Program Files".to_string());
            let dest = format!("{}\\{}", program_files, app_name);
            let copy = format!(
                "Copy-Item -Recurse -Force '{}' '{}'",
                bundle.display(),
                dest
            );
            let shortcut = format!(
                "$s = (New-Object -ComObject WScript.Shell).CreateShortcut(\
                 [Environment]::GetFolderPath('Desktop') + '\\{name}.lnk'); \
                 $s.TargetPath = '{dest}\\{name}.exe'; $s.Save()",
                name = app_name,
                dest = dest,
            );
            vec![
                (
                    "powershell".to_string(),
                    vec!["-NoProfile".to_string(), "-Command".to_string(), copy],
                ),
                (
                    "powershell".to_string(),
                    vec!["-NoProfile".to_string(), "-Command".to_string(), shortcut],
                ),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macos_placement() {
        let bundle = PathBuf::from("/tmp/stage/ChatStack-darwin-arm64");
        let commands = placement_commands(OsFamily::MacOs, &bundle, "ChatStack", false);
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].0, "cp");
        assert!(commands[0].1[1].ends_with("ChatStack.app"));
        assert_eq!(commands[0].1[2], "/Applications/");
    }

    #[test]
    fn test_linux_placement_uses_sudo_when_not_root() {
        let bundle = PathBuf::from("/tmp/stage/ChatStack-linux-x64");
        let commands = placement_commands(OsFamily::Linux, &bundle, "ChatStack", false);
        assert_eq!(commands[0].0, "sudo");
        assert!(commands[0].1.contains(&"/usr/local/bin/ChatStack".to_string()));

        let commands = placement_commands(OsFamily::Linux, &bundle, "ChatStack", true);
        assert_eq!(commands[0].0, "install");
    }

    #[test]
    fn test_windows_placement_copies_and_creates_shortcut() {
        let bundle = PathBuf::from("C:\\stage\\ChatStack-windows-x64");
        let commands = placement_commands(OsFamily::Windows, &bundle, "ChatStack", false);
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].0, "powershell");
        assert!(commands[0].1[2].contains("Copy-Item"));
        assert!(commands[1].1[2].contains("CreateShortcut"));
        assert!(commands[1].1[2].contains("ChatStack.lnk"));
    }
}
