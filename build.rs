#![allow(missing_docs)]

use std::{path::Path, process::Command};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    // Absent from a packaged crate
    for watched in [".git/HEAD", ".git/index"] {
        if Path::new(watched).exists() {
            println!("cargo:rerun-if-changed={watched}");
        }
    }
    let version = version_string(env!("CARGO_PKG_VERSION"), git_revision().as_deref());
    println!("cargo:rustc-env=SSHDCONF_VERSION_STRING={version}");
}

/// `1.2.3` when built from a packaged crate, `1.2.3+gabcdef12` from a checkout
fn version_string(cargo_version: &str, revision: Option<&str>) -> String {
    match revision {
        Some(rev) => format!("{cargo_version}+g{rev}"),
        None => cargo_version.into(),
    }
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Short hash of HEAD, with `.dirty` appended if tracked files have uncommitted changes
fn git_revision() -> Option<String> {
    let hash = git(&["rev-parse", "--short=8", "HEAD"]).filter(|h| !h.is_empty())?;
    let dirty = git(&["status", "--porcelain", "--untracked-files=no"])
        .is_some_and(|s| !s.is_empty());
    Some(if dirty { format!("{hash}.dirty") } else { hash })
}
