//! # tramway-routing
//!
//! The router chain of the tramway framework. A router tree is assembled
//! once from [`Router`](router::Router) nodes and shared by every request;
//! routing a request walks it, recording which path segments, URIs, and
//! URI templates matched in a per-request [`RoutingContext`](context::RoutingContext).
//!
//! ## Modules
//!
//! - [`template`] - URI templates and path matching
//! - [`request`] - The request being routed
//! - [`context`] - The per-request ledger of matches
//! - [`provider`] - Resolution of the current request's context
//! - [`router`] - The routers that make up a tree
//! - [`stage`] - The depth-first traversal driver

pub mod context;
pub mod provider;
pub mod request;
pub mod router;
pub mod stage;
pub mod template;

/// Re-exports of the types needed to assemble and run a router tree.
pub mod prelude {
    pub use crate::context::RoutingContext;
    pub use crate::provider::{
        ContextProvider, RequestScopedProvider, SharedContextProvider, TaskLocalProvider,
    };
    pub use crate::request::RoutingRequest;
    pub use crate::router::{
        Continuation, EndpointRouter, MatchResultInitializerRouter, PathMatchingRouter,
        PushMatchedTemplateRouter, PushMatchedTemplateRouterBuilder, PushMatchedUriRouter, Route,
        Router, SharedRouter,
    };
    pub use crate::stage::{RoutingOutcome, RoutingStage};
    pub use crate::template::{TemplateMatch, UriTemplate};
    pub use tramway_core::{RoutingError, RoutingResult, Settings};
}
