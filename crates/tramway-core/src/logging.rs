//! Logging integration for the tramway framework.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for creating per-request
//! routing spans.

use crate::settings::Settings;

/// Target of the events emitted while routing requests.
pub const ROUTING_TARGET: &str = "tramway_routing";

/// Sets up the global tracing subscriber based on the given settings.
///
/// The filter comes from [`routing_filter`]. In debug mode a pretty,
/// human-readable format is used; otherwise a structured JSON format that
/// attaches the current routing span to each event. Installing a second
/// subscriber is silently ignored.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;

    let filter = routing_filter(settings);

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .try_init()
            .ok();
    }
}

/// Builds the subscriber filter for `settings`.
///
/// `log_level` is parsed as an `EnvFilter` directive string, falling back
/// to `info` when it does not parse. In debug mode routing decisions are
/// shown at `debug` unless `log_level` already names the routing target.
pub fn routing_filter(settings: &Settings) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::filter::Directive;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    if !settings.debug || settings.log_level.contains(ROUTING_TARGET) {
        return filter;
    }
    match format!("{ROUTING_TARGET}=debug").parse::<Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Creates a tracing span for routing one request.
///
/// The routing stage enters this span for the duration of a traversal so
/// that every template push and path match is attributed to its request.
///
/// # Examples
///
/// ```
/// use tramway_core::logging::routing_span;
///
/// let span = routing_span("GET", "/users/42");
/// let _guard = span.enter();
/// tracing::debug!("routing request");
/// ```
pub fn routing_span(method: &str, path: &str) -> tracing::Span {
    tracing::debug_span!(target: ROUTING_TARGET, "routing", method = method, path = path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_logging_twice_does_not_panic() {
        let settings = Settings {
            log_level: "not a valid filter ===".to_string(),
            ..Settings::default()
        };
        setup_logging(&settings);
        setup_logging(&Settings::default());
    }

    #[test]
    fn test_routing_filter_debug_raises_routing_target() {
        let filter = routing_filter(&Settings::default()).to_string();
        assert!(filter.contains("tramway_routing=debug"));
        assert!(filter.contains("info"));
    }

    #[test]
    fn test_routing_filter_respects_explicit_target() {
        let settings = Settings {
            log_level: "warn,tramway_routing=trace".to_string(),
            ..Settings::default()
        };
        let filter = routing_filter(&settings).to_string();
        assert!(filter.contains("tramway_routing=trace"));
        assert!(!filter.contains("tramway_routing=debug"));
    }

    #[test]
    fn test_routing_filter_production() {
        let settings = Settings {
            debug: false,
            ..Settings::default()
        };
        let filter = routing_filter(&settings).to_string();
        assert!(!filter.contains(ROUTING_TARGET));
    }
}
