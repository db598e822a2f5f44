// src/commands/version.rs

use std::process::ExitCode;

use crate::frontend::codec::FORMAT_VERSION;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn make_version_string() -> String {
    let profile = if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    };
    let target = format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH);
    // 0.1.0 (release linux-x86_64)
    format!("{VERSION} ({profile} {target})")
}

pub fn version_string() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(make_version_string)
}

pub fn print_version() -> ExitCode {
    println!("neo {}", version_string());
    println!("ast format: {}", FORMAT_VERSION);
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_package_version() {
        assert!(version_string().starts_with(VERSION));
        assert!(version_string().contains(std::env::consts::OS));
    }
}
