use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Crates of this workspace that emit the service's own events.
const SERVICE_CRATES: [&str; 3] = ["products_api", "domain_products", "axum_helpers"];

/// Install color-eyre for `main`'s error reports.
///
/// Shows the failing location and omits the environment section. Repeated
/// calls are ignored.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Default directives when `RUST_LOG` is unset.
///
/// Service crates and request traces log at info in production and debug in
/// development. Dependencies stay at warn so only their problems show up.
pub fn default_directives(environment: &Environment) -> String {
    let level = if environment.is_production() {
        "info"
    } else {
        "debug"
    };

    let mut directives = vec!["warn".to_string(), format!("tower_http={level}")];
    directives.extend(SERVICE_CRATES.iter().map(|name| format!("{name}={level}")));
    directives.join(",")
}

/// `RUST_LOG` when set and valid, otherwise [`default_directives`].
pub fn env_filter(environment: &Environment) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(environment)))
}

/// Install the global subscriber.
///
/// Production writes flattened JSON lines; development writes the pretty
/// multi-line format with targets. Both carry an `ErrorLayer` so eyre reports
/// include the active span trace, such as the product `id` of a failed stock
/// adjustment. A second call leaves the first subscriber in place.
pub fn init_tracing(environment: &Environment) {
    let filter = env_filter(environment);

    let result = if environment.is_production() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(()) => info!(environment = ?environment, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized"),
    }
}
