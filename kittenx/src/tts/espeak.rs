//! espeak-ng discovery and environment repair.
//!
//! A bundled espeak-ng install shipped next to the executable takes
//! precedence over whatever the system provides; both the native bindings
//! and the subprocess tier read `ESPEAK_DATA_PATH`, so pointing it at the
//! bundled data directory fixes the whole chain at once.

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// How long a single espeak subprocess may run before it is killed.
const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Candidate binary names, preferred first.
const EXE_NAMES: &[&str] = &["espeak-ng", "espeak"];
const DATA_NAMES: &[&str] = &["espeak-ng-data", "espeak-data"];

#[derive(Debug, Clone)]
pub struct EspeakInstall {
    pub exe: PathBuf,
    pub data: Option<PathBuf>,
}

/// A bundled espeak install shipped next to the current executable, or an
/// explicit `ESPEAK_EXE` override.
pub fn locate_bundled() -> Option<EspeakInstall> {
    if let Some(exe) = env::var_os("ESPEAK_EXE") {
        let exe = PathBuf::from(exe);
        if exe.is_file() {
            let data = env::var_os("ESPEAK_DATA_PATH")
                .map(PathBuf::from)
                .filter(|p| p.is_dir())
                .or_else(|| exe.parent().and_then(data_near));
            return Some(EspeakInstall { exe, data });
        }
    }

    let exe_dir = env::current_exe().ok()?.parent()?.to_path_buf();
    for dir in [
        exe_dir.clone(),
        exe_dir.join("espeak"),
        exe_dir.join("espeak-ng"),
    ] {
        if let Some(exe) = exe_in_dir(&dir) {
            let data = data_near(&dir);
            return Some(EspeakInstall { exe, data });
        }
    }

    None
}

/// Best available espeak executable: the bundled install first, then
/// whatever `PATH` resolves.
pub fn locate() -> Option<EspeakInstall> {
    if let Some(install) = locate_bundled() {
        return Some(install);
    }

    for name in EXE_NAMES {
        let probe = Command::new(name)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        if probe.is_ok() {
            return Some(EspeakInstall {
                exe: PathBuf::from(name),
                data: None,
            });
        }
    }

    None
}

/// Point the process environment at the bundled install, when there is one:
/// export its data directory and rebuild `PATH` so the bundled binary
/// shadows any system espeak. Returns the install that was activated.
pub fn repair_environment() -> Option<EspeakInstall> {
    let install = locate_bundled()?;

    if let Some(data) = &install.data {
        env::set_var("ESPEAK_DATA_PATH", data);
    }

    if let Some(dir) = install.exe.parent() {
        let current = env::var_os("PATH").unwrap_or_default();
        let mut parts: Vec<PathBuf> = vec![dir.to_path_buf()];
        parts.extend(env::split_paths(&current).filter(|p| {
            !p.to_string_lossy().to_lowercase().contains("espeak")
        }));
        if let Ok(joined) = env::join_paths(parts) {
            env::set_var("PATH", joined);
        }
    }

    Some(install)
}

/// Run the espeak executable to turn text into IPA. Blocking, with a fixed
/// timeout; any failure mode (spawn error, non-zero exit, empty output,
/// timeout) is reported as an error string for the caller to degrade on.
pub fn ipa_via_command(install: &EspeakInstall, text: &str) -> Result<String, String> {
    let mut cmd = Command::new(&install.exe);
    cmd.arg("-q").arg("--ipa");
    if let Some(data) = &install.data {
        cmd.arg("--path").arg(data);
    }
    cmd.arg(text)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd
        .spawn()
        .map_err(|e| format!("failed to spawn {}: {}", install.exe.display(), e))?;

    let deadline = Instant::now() + COMMAND_TIMEOUT;
    loop {
        match child.try_wait() {
            Ok(Some(_)) => break,
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(format!(
                        "espeak timed out after {}s",
                        COMMAND_TIMEOUT.as_secs()
                    ));
                }
                std::thread::sleep(Duration::from_millis(25));
            }
            Err(e) => return Err(format!("failed to wait for espeak: {}", e)),
        }
    }

    let output = child
        .wait_with_output()
        .map_err(|e| format!("failed to collect espeak output: {}", e))?;

    if !output.status.success() {
        return Err(format!("espeak exited with {}", output.status));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let ipa = stdout.split_whitespace().collect::<Vec<_>>().join(" ");
    if ipa.is_empty() {
        return Err("espeak produced no output".to_string());
    }

    Ok(ipa)
}

fn exe_in_dir(dir: &Path) -> Option<PathBuf> {
    for name in EXE_NAMES {
        let mut candidate = dir.join(name);
        if cfg!(windows) {
            candidate.set_extension("exe");
        }
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

fn data_near(dir: &Path) -> Option<PathBuf> {
    DATA_NAMES.iter().map(|n| dir.join(n)).find(|p| p.is_dir())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn finds_exe_and_data_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(exe_in_dir(dir.path()).is_none());
        assert!(data_near(dir.path()).is_none());

        let exe_name = if cfg!(windows) { "espeak-ng.exe" } else { "espeak-ng" };
        fs::write(dir.path().join(exe_name), b"").unwrap();
        fs::create_dir(dir.path().join("espeak-ng-data")).unwrap();

        assert!(exe_in_dir(dir.path()).is_some());
        assert_eq!(
            data_near(dir.path()),
            Some(dir.path().join("espeak-ng-data"))
        );
    }

    #[test]
    fn prefers_espeak_ng_binary() {
        let dir = tempfile::tempdir().unwrap();
        let (ng, plain) = if cfg!(windows) {
            ("espeak-ng.exe", "espeak.exe")
        } else {
            ("espeak-ng", "espeak")
        };
        fs::write(dir.path().join(plain), b"").unwrap();
        fs::write(dir.path().join(ng), b"").unwrap();

        let found = exe_in_dir(dir.path()).unwrap();
        assert_eq!(found, dir.path().join(ng));
    }
}
