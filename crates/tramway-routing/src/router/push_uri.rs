//! Recording matched URIs.

use tramway_core::RoutingResult;

use crate::provider::SharedContextProvider;
use crate::request::RoutingRequest;
use crate::router::{Continuation, Router};

/// Pushes the part of the request path matched so far onto the routing
/// context's matched URIs. Placed right after a path match, like
/// [`PushMatchedTemplateRouter`](super::PushMatchedTemplateRouter).
#[derive(Debug)]
pub struct PushMatchedUriRouter {
    provider: SharedContextProvider,
}

impl PushMatchedUriRouter {
    /// Creates a router resolving contexts through `provider`.
    pub fn new(provider: SharedContextProvider) -> Self {
        Self { provider }
    }
}

impl Router for PushMatchedUriRouter {
    fn apply(&self, mut request: RoutingRequest) -> RoutingResult<Continuation> {
        self.provider.with_context(&mut request, &mut |context| {
            context.push_left_hand_path();
            Ok(())
        })?;
        Ok(Continuation::of(request))
    }
}
