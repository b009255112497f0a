// SPDX-License-Identifier: GPL-3.0-only

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-changed=.git/refs/tags");

    // Packagers can pin the version
    let version = std::env::var("PETAL_VERSION").unwrap_or_else(|_| describe_version());
    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// "0.1.0" on a tag, "0.1.0-dirty-abcdef1" past it, the crate version without git
fn describe_version() -> String {
    let fallback = std::env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "unknown".to_string());
    let Some(described) = git(&["describe", "--tags", "--always", "--match", "v*"]) else {
        return fallback;
    };
    let described = described.strip_prefix('v').unwrap_or(&described);

    let parts: Vec<&str> = described.rsplitn(3, '-').collect();
    match parts.as_slice() {
        [hash, _commits, base] => {
            format!("{}-dirty-{}", base, hash.strip_prefix('g').unwrap_or(hash))
        }
        // Bare hash: no release tag yet
        [_] if !described.contains('.') => format!("{}-{}", fallback, described),
        _ => described.to_string(),
    }
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
