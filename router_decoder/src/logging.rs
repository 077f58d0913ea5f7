use std::str::FromStr;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Turn a bare level ("debug") into a filter scoped to this crate.
/// Directive strings containing ',' or '=' pass through untouched.
pub fn filter_spec(log_level: &str) -> String {
    let normalized = log_level.trim();
    if normalized.contains(',') || normalized.contains('=') {
        normalized.to_string()
    } else {
        format!("warn,router_decoder={normalized},router_decode={normalized}")
    }
}

/// Install the global subscriber. Events go to stderr so stdout stays
/// machine-readable.
pub fn setup_logging(log_level: &str, json_format: bool) {
    let filter_spec = filter_spec(log_level);
    let filter = EnvFilter::from_str(&filter_spec).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry().with(filter);

    if json_format {
        let json_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_current_span(false);
        subscriber.with(json_layer).init();
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .compact();
        subscriber.with(fmt_layer).init();
    }

    tracing::debug!(
        filter = %filter_spec,
        format = if json_format { "json" } else { "compact" },
        "logging initialized"
    );
}
