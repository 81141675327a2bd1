use std::process::Command;

/// Runs a git command and returns its trimmed stdout, or an empty string outside a checkout.
fn git(args: &[&str]) -> String {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let hash = git(&["rev-parse", "--short", "HEAD"]);

    // A release build sits exactly on a version tag with a clean tree
    let version = env!("CARGO_PKG_VERSION");
    let tags = git(&["tag", "--points-at", "HEAD"]);
    let tagged = tags
        .lines()
        .any(|tag| tag == version || tag == format!("v{}", version));
    let dirty = !git(&["status", "--porcelain"]).is_empty();

    println!("cargo:rustc-env=ROWZ_GIT_HASH={}", hash);
    println!("cargo:rustc-env=ROWZ_IS_RELEASE={}", tagged && !dirty);
}
