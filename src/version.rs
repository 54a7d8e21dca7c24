// Build-time identity from Cargo.toml

/// Package version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name (from Cargo.toml).
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Plain-text banner served on `/`.
pub fn banner(metrics_path: &str) -> String {
    format!("{} {}: scrape {}", NAME, VERSION, metrics_path)
}
