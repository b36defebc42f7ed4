//! The router chain.
//!
//! A router tree is assembled once and shared by every request. Routing a
//! request walks it depth first: each [`Router`] consumes the request, may
//! record decisions in the request's [`RoutingContext`](crate::context::RoutingContext),
//! and returns a [`Continuation`] naming the routers to try next.
//!
//! - [`initializer`]: seeds the context with the request path
//! - [`path_matching`]: matches URI templates against the remaining path
//! - [`push_uri`]: records matched URIs
//! - [`push_template`]: records matched templates
//! - [`endpoint`]: marks a leaf that handles the request

pub mod endpoint;
pub mod initializer;
pub mod path_matching;
pub mod push_template;
pub mod push_uri;

use std::fmt;
use std::sync::Arc;

use tramway_core::RoutingResult;

use crate::request::RoutingRequest;

pub use endpoint::EndpointRouter;
pub use initializer::MatchResultInitializerRouter;
pub use path_matching::{PathMatchingRouter, Route};
pub use push_template::{PushMatchedTemplateRouter, PushMatchedTemplateRouterBuilder};
pub use push_uri::PushMatchedUriRouter;

/// A router shared between tree positions' parents and every request.
pub type SharedRouter = Arc<dyn Router>;

/// One step in the routing chain.
///
/// Implementations hold configuration only: all per-request state lives in
/// the request or its routing context, so one instance serves any number of
/// concurrent requests.
pub trait Router: Send + Sync + fmt::Debug {
    /// Processes `request` and says what happens next.
    ///
    /// # Errors
    ///
    /// No error is recovered inside the chain; whatever is returned here
    /// aborts routing of the request.
    fn apply(&self, request: RoutingRequest) -> RoutingResult<Continuation>;

    /// Returns the endpoint name if this router is a leaf that handles the
    /// request.
    fn endpoint(&self) -> Option<&Arc<str>> {
        None
    }
}

/// The result of one routing step.
///
/// Carries the request onward together with the routers to try next, in
/// order. A continuation without successors ends this branch of the traversal.
#[derive(Debug)]
pub struct Continuation {
    request: RoutingRequest,
    next: Vec<SharedRouter>,
}

impl Continuation {
    /// Ends this branch, carrying `request` back to the driver.
    pub const fn of(request: RoutingRequest) -> Self {
        Self {
            request,
            next: Vec::new(),
        }
    }

    /// Continues routing `request` with `next`, tried in order.
    pub fn with_next(request: RoutingRequest, next: impl IntoIterator<Item = SharedRouter>) -> Self {
        Self {
            request,
            next: next.into_iter().collect(),
        }
    }

    /// Returns the request being carried.
    pub const fn request(&self) -> &RoutingRequest {
        &self.request
    }

    /// Returns the routers to try next.
    pub fn next(&self) -> &[SharedRouter] {
        &self.next
    }

    /// Returns `true` if no routers follow.
    pub fn is_terminal(&self) -> bool {
        self.next.is_empty()
    }

    /// Splits the continuation into its request and successors.
    pub fn into_parts(self) -> (RoutingRequest, Vec<SharedRouter>) {
        (self.request, self.next)
    }
}
