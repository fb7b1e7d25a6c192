//! Build identification for pdm-web
//!
//! Exposes `GIT_HASH`, `BUILD_TIMESTAMP` and `BUILD_PROFILE` to the crate.
//! `PDM_GIT_HASH` overrides the hash for builds outside a git checkout
//! (source tarballs, container builds without `.git`).

use std::process::Command;

const UNKNOWN: &str = "unknown";

fn git_hash() -> String {
    if let Ok(hash) = std::env::var("PDM_GIT_HASH") {
        if !hash.trim().is_empty() {
            return hash.trim().to_string();
        }
    }

    let Ok(output) = Command::new("git").args(["rev-parse", "--short=8", "HEAD"]).output() else {
        return UNKNOWN.to_string();
    };
    if !output.status.success() {
        return UNKNOWN.to_string();
    }
    match String::from_utf8(output.stdout) {
        Ok(hash) if !hash.trim().is_empty() => hash.trim().to_string(),
        _ => UNKNOWN.to_string(),
    }
}

fn main() {
    let stamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| UNKNOWN.to_string());

    for (key, value) in [
        ("GIT_HASH", git_hash()),
        ("BUILD_TIMESTAMP", stamp),
        ("BUILD_PROFILE", profile),
    ] {
        println!("cargo:rustc-env={}={}", key, value);
    }
}
