//! Leaf routers.

use std::sync::Arc;

use tramway_core::RoutingResult;

use crate::request::RoutingRequest;
use crate::router::{Continuation, Router};

/// A named leaf of the router tree. Reaching it ends routing successfully.
#[derive(Debug, Clone)]
pub struct EndpointRouter {
    name: Arc<str>,
}

impl EndpointRouter {
    /// Creates an endpoint called `name`.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the endpoint's name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Router for EndpointRouter {
    fn apply(&self, request: RoutingRequest) -> RoutingResult<Continuation> {
        Ok(Continuation::of(request))
    }

    fn endpoint(&self) -> Option<&Arc<str>> {
        Some(&self.name)
    }
}
