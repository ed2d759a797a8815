use std::path::PathBuf;
use std::process::Command;

/// Runs `git <args>` in the workspace root, "unknown" when git is unavailable.
fn git(root: &PathBuf, args: &[&str]) -> String {
    Command::new("git")
        .args(args)
        .current_dir(root)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap_or_default());
    let workspace_root = manifest_dir.parent().map(PathBuf::from).unwrap_or(manifest_dir);

    let build_time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=GIT_HASH={}", git(&workspace_root, &["rev-parse", "HEAD"]));
    println!("cargo:rustc-env=GIT_BRANCH={}", git(&workspace_root, &["rev-parse", "--abbrev-ref", "HEAD"]));
    println!("cargo:rustc-env=GIT_TAG={}", git(&workspace_root, &["describe", "--tags", "--abbrev=0"]));
    println!("cargo:rustc-env=BUILD_TIME={}", build_time);
    println!("cargo:rustc-env=CARGO_CFG_TARGET_OS={}", target_os);
}
