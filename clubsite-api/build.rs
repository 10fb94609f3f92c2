//! Build script for clubsite-api
//!
//! Exposes GIT_HASH, BUILD_TIMESTAMP and BUILD_PROFILE to the crate for the
//! startup banner and `/api/buildinfo`.

use std::process::Command;

const UNKNOWN: &str = "unknown";

fn git_short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8(output.stdout).ok()?;
    Some(hash.trim().to_string()).filter(|h| !h.is_empty())
}

fn main() {
    let git_hash = git_short_hash().unwrap_or_else(|| UNKNOWN.to_string());
    let built_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| UNKNOWN.to_string());

    for (key, value) in [
        ("GIT_HASH", git_hash),
        ("BUILD_TIMESTAMP", built_at),
        ("BUILD_PROFILE", profile),
    ] {
        println!("cargo:rustc-env={}={}", key, value);
    }
}
