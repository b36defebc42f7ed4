//! Settings for the tramway framework.
//!
//! This module provides the [`Settings`] struct, which holds routing
//! configuration, and [`LazySettings`], a globally-accessible,
//! lazily-initialized settings instance.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// The complete set of framework settings.
///
/// Use [`SETTINGS`] to access the global instance, or pass a `Settings`
/// value explicitly to the routing stage.
///
/// # Examples
///
/// ```
/// use tramway_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(!settings.strict_template_ordering);
/// assert_eq!(settings.max_routing_depth, 64);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled.
    pub debug: bool,

    // ── Routing ──────────────────────────────────────────────────────

    /// Reject template pushes that have no preceding path match.
    ///
    /// When disabled, the router tree is trusted to place template pushes
    /// after the path match they describe.
    pub strict_template_ordering: bool,
    /// Maximum depth of a single routing traversal.
    pub max_routing_depth: usize,
    /// Percent-decode the request path before matching it.
    pub decode_path: bool,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log level (e.g. "info", "debug", "warn").
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Core
            debug: true,

            // Routing
            strict_template_ordering: false,
            max_routing_depth: 64,
            decode_path: true,

            // Logging
            log_level: "info".to_string(),
        }
    }
}

/// A lazily-initialized, globally-accessible settings container.
///
/// Call [`configure`](LazySettings::configure) once at startup to set the
/// settings, then use [`get`](LazySettings::get) to access them.
///
/// # Panics
///
/// [`get`](LazySettings::get) panics if settings have not been configured.
/// [`configure`](LazySettings::configure) panics if called more than once.
pub struct LazySettings {
    inner: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates a new, unconfigured `LazySettings`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Configures the global settings. Must be called exactly once.
    ///
    /// # Panics
    ///
    /// Panics if settings have already been configured.
    pub fn configure(&self, settings: Settings) {
        self.inner
            .set(settings)
            .expect("Settings have already been configured");
    }

    /// Returns a reference to the configured settings.
    ///
    /// # Panics
    ///
    /// Panics if settings have not been configured.
    pub fn get(&self) -> &Settings {
        self.inner
            .get()
            .expect("Settings have not been configured. Call SETTINGS.configure() first.")
    }

    /// Returns the configured settings, or `None` before configuration.
    pub fn try_get(&self) -> Option<&Settings> {
        self.inner.get()
    }

    /// Returns `true` if settings have been configured.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// The global settings instance.
pub static SETTINGS: LazySettings = LazySettings::new();
