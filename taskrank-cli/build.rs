use std::path::{Path, PathBuf};
use std::process::Command;

/// `git describe` of the enclosing checkout, e.g. `3f9c2ab` or `3f9c2ab-dirty`.
fn describe(repo: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(["describe", "--always", "--dirty", "--abbrev=7"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let text = String::from_utf8(out.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn main() {
    let repo = std::env::var_os("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .and_then(|dir| dir.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from(".."));

    let head = repo.join(".git").join("HEAD");
    if head.exists() {
        println!("cargo:rerun-if-changed={}", head.display());
    }

    let build = describe(&repo).unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=TASKRANK_BUILD={build}");
}
