//! Command: print version information.

/// Version string injected by `build.rs`, falling back to the package
/// version.
#[must_use]
pub const fn version() -> &'static str {
    match option_env!("DOTLINK_VERSION") {
        Some(v) => v,
        None => env!("CARGO_PKG_VERSION"),
    }
}

/// Print the dotlink version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("dotlink {}", version());
}
