//! Tracing subscriber setup for the server binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const CRATE_TARGETS: [&str; 5] = [
    "parlor",
    "parlor_transport",
    "parlor_protocol",
    "parlor_room",
    "parlor_session",
];

/// Installs a fmt subscriber filtered by `RUST_LOG`, or, when that is
/// unset, by `default_level` for the parlor crates and the binary.
pub fn init_tracing(binary_name: &str, default_level: &str) {
    let binary_target = binary_name.replace('-', "_");
    let fallback = CRATE_TARGETS
        .iter()
        .copied()
        .chain(std::iter::once(binary_target.as_str()))
        .map(|target| format!("{target}={default_level}"))
        .collect::<Vec<_>>()
        .join(",");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
