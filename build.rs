//! Build script: embeds the version string as `DOTFILES_VERSION`.
use std::process::Command;

fn main() {
    // A release pipeline may pin the version through DOTFILES_VERSION; local
    // builds describe the checkout instead.
    if let Ok(version) = std::env::var("DOTFILES_VERSION") {
        println!("cargo:rustc-env=DOTFILES_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !version.is_empty() {
            println!("cargo:rustc-env=DOTFILES_VERSION={version}");
        }
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-changed=conf/default.dotconfig");
    println!("cargo:rerun-if-env-changed=DOTFILES_VERSION");
}
