//! Core error types for the tramway framework.
//!
//! Routing defines no checked failures of its own: every error here is one
//! that aborts the traversal of a single request and propagates to whatever
//! drives the router tree. [`RoutingError::status_code`] tells that driver
//! which HTTP status to answer with.

use thiserror::Error;

/// The primary error type for the tramway framework.
#[derive(Error, Debug)]
pub enum RoutingError {
    // ── Request scope ────────────────────────────────────────────────

    /// The context provider could not resolve a routing context for the
    /// request currently being processed.
    #[error("Routing context unavailable: {0}")]
    ContextUnavailable(String),

    /// A router ran before the step it depends on: path matching before the
    /// path was seeded, or (with strict template ordering) a template push
    /// with no path match recorded for it.
    #[error("Router ordering violation: {0}")]
    OrderingViolation(String),

    // ── Router tree ──────────────────────────────────────────────────

    /// A URI template has invalid syntax or compiles to an invalid regex.
    #[error("Invalid URI template: {0}")]
    InvalidTemplate(String),

    /// Traversal descended deeper than the configured maximum.
    #[error("Routing depth is {depth}, but maximum allowed is {max}")]
    DepthExceeded {
        /// Depth at which traversal was aborted.
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },

    /// No endpoint was reached for the request path.
    #[error("Not found: {0}")]
    NotFound(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl RoutingError {
    /// Returns the HTTP status code a routing driver should respond with.
    ///
    /// - `NotFound` -> 404
    /// - Everything else -> 500
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::ContextUnavailable(_)
            | Self::OrderingViolation(_)
            | Self::InvalidTemplate(_)
            | Self::DepthExceeded { .. }
            | Self::ConfigurationError(_)
            | Self::IoError(_) => 500,
        }
    }

    /// Returns `true` for errors caused by how the router tree or its
    /// collaborators were wired, as opposed to the incoming request.
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::ContextUnavailable(_)
                | Self::OrderingViolation(_)
                | Self::InvalidTemplate(_)
                | Self::ConfigurationError(_)
        )
    }
}

/// A convenience type alias for `Result<T, RoutingError>`.
pub type RoutingResult<T> = Result<T, RoutingError>;
