// Build script for entryroot-core.
// Exports the short git hash for `version_string()` when built from a checkout.

use std::process::Command;

fn main() {
    println!("cargo:rerun-if-env-changed=ENTRYROOT_BUILD_GIT_HASH");

    if std::env::var_os("ENTRYROOT_BUILD_GIT_HASH").is_some() {
        return;
    }

    let hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
        .unwrap_or_default();

    if !hash.is_empty() {
        println!("cargo:rustc-env=ENTRYROOT_BUILD_GIT_HASH={hash}");
    }
}
