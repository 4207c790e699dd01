use std::path::Path;
use std::process::Command;

const SEARCH_PATHS: &[&str] = &[
    "/lib",
    "/lib64",
    "/usr/lib",
    "/usr/lib64",
    "/usr/local/lib",
    "/usr/lib/x86_64-linux-gnu",
];

// espeak-ng pulls in sonic and pcaudio on some distros; espeak-rs then
// needs them on the link line.
fn has_shared_lib(name: &str) -> bool {
    let soname = format!("lib{}.so", name);

    let in_ldconfig = Command::new("ldconfig")
        .arg("-p")
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).contains(&soname))
        .unwrap_or(false);
    if in_ldconfig {
        return true;
    }

    SEARCH_PATHS
        .iter()
        .any(|dir| Path::new(dir).join(&soname).exists())
}

fn main() {
    if cfg!(target_os = "linux") {
        for lib in ["sonic", "pcaudio"] {
            if has_shared_lib(lib) {
                println!("cargo:rustc-link-lib={}", lib);
            }
        }
    }
}
