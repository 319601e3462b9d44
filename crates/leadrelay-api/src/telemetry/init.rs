use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const CRATE_TARGETS: [&str; 4] = [
    "leadrelay_api",
    "leadrelay_core",
    "leadrelay_storage",
    "tower_http",
];

/// Filter directives for a `DEBUG_LEVEL` value. `disable` turns logging off.
pub fn default_directives(debug_level: &str) -> String {
    let level = match debug_level {
        "disable" | "off" => return "off".to_string(),
        "trace" | "debug" | "info" | "warn" | "error" => debug_level,
        "warning" => "warn",
        _ => "info",
    };
    CRATE_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize tracing. `RUST_LOG` takes precedence over `DEBUG_LEVEL`.
pub fn init_telemetry(debug_level: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(debug_level)));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        // Console: compact format without timestamps
        let console_fmt = tracing_subscriber::fmt::layer().event_format(
            Format::default()
                .compact()
                .with_target(false)
                .without_time(),
        );
        tracing_subscriber::registry()
            .with(filter)
            .with(console_fmt)
            .try_init()?;
    }

    tracing::info!(debug_level, json, "Tracing initialized");
    Ok(())
}
