use std::process::Command;

fn main() {
    let version = env!("CARGO_PKG_VERSION");

    // Check if release mode
    let profile = std::env::var("PROFILE").unwrap_or_default();
    let is_release = profile == "release";

    let version_str = if is_release {
        version.to_string()
    } else {
        // Get git hash
        let git_hash = Command::new("git")
            .args(["rev-parse", "--short", "HEAD"])
            .output()
            .ok()
            .and_then(|output| {
                if output.status.success() {
                    String::from_utf8(output.stdout).ok()
                } else {
                    None
                }
            })
            .unwrap_or_else(|| "unknown".to_string())
            .trim()
            .to_string();

        format!("{}+{}", version, git_hash)
    };

    println!("cargo:rustc-env=EMBERHOOK_VERSION={}", version_str);
}
