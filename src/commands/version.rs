//! Command: print version information.

/// Version stamped at build time, or the package version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("DTB_SELECTOR_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the selector version to stdout.
pub fn run() {
    println!("dtb-selector {}", version());
}
