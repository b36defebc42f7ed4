//! # tramway
//!
//! Request routing over compiled URI templates.
//!
//! This is the meta-crate that re-exports the sub-crates for convenient
//! access. Depend on `tramway` to get everything, or on the individual
//! crates for finer-grained control.
//!
//! ```
//! use std::sync::Arc;
//! use tramway::prelude::*;
//!
//! let provider: SharedContextProvider = Arc::new(RequestScopedProvider);
//! let templates = PushMatchedTemplateRouterBuilder::new(Arc::clone(&provider));
//! let users = Arc::new(UriTemplate::new("/users").unwrap());
//!
//! let users_route = Route::exact(
//!     Arc::clone(&users),
//!     [
//!         Arc::new(templates.build(users)) as SharedRouter,
//!         Arc::new(EndpointRouter::new("list-users")) as SharedRouter,
//!     ],
//! );
//! let matcher = PathMatchingRouter::new(Arc::clone(&provider), [users_route]);
//! let root = MatchResultInitializerRouter::new(
//!     Arc::clone(&provider),
//!     true,
//!     [Arc::new(matcher) as SharedRouter],
//! );
//!
//! let stage = RoutingStage::new(Arc::new(root), provider, &Settings::default());
//! let outcome = stage.route(RoutingRequest::builder().path("/users").build()).unwrap();
//! assert_eq!(outcome.endpoint(), Some("list-users"));
//! assert_eq!(outcome.context().matched_template_path(), "/users");
//! ```

/// Settings, errors, and logging setup.
pub use tramway_core as core;

/// URI templates, the router chain, and the routing stage.
#[cfg(feature = "routing")]
pub use tramway_routing as routing;

pub use http;
pub use tokio;
pub use tracing;

/// Everything needed to assemble and run a router tree.
pub mod prelude {
    pub use tramway_core::logging::setup_logging;
    pub use tramway_core::settings_loader;
    pub use tramway_core::{RoutingError, RoutingResult, Settings, SETTINGS};

    #[cfg(feature = "routing")]
    pub use tramway_routing::prelude::*;
}
