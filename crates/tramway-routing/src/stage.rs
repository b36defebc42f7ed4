//! Driving a request through a router tree.
//!
//! [`RoutingStage`] walks the tree depth first. After a router is applied,
//! its successors are tried in order, each receiving the request as the
//! previous sibling left it. The first branch that reaches an endpoint ends
//! the walk; a router's own endpoint is only considered once none of its
//! successors produced one.

use std::sync::Arc;

use tramway_core::logging::routing_span;
use tramway_core::{RoutingError, RoutingResult, Settings};

use crate::context::RoutingContext;
use crate::provider::SharedContextProvider;
use crate::request::RoutingRequest;
use crate::router::SharedRouter;

/// Routes requests through one router tree.
#[derive(Debug, Clone)]
pub struct RoutingStage {
    root: SharedRouter,
    provider: SharedContextProvider,
    max_depth: usize,
}

impl RoutingStage {
    /// Creates a stage over `root`.
    ///
    /// `provider` must be the provider the tree's routers were built with.
    pub fn new(root: SharedRouter, provider: SharedContextProvider, settings: &Settings) -> Self {
        Self {
            root,
            provider,
            max_depth: settings.max_routing_depth,
        }
    }

    /// Returns the root router.
    pub const fn root(&self) -> &SharedRouter {
        &self.root
    }

    /// Routes `request` inside a fresh routing context.
    ///
    /// Not reaching an endpoint is not an error here; see
    /// [`RoutingOutcome::require_endpoint`].
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a router, or
    /// [`RoutingError::DepthExceeded`] when the tree nests deeper than
    /// `max_routing_depth`.
    pub fn route(&self, request: RoutingRequest) -> RoutingResult<RoutingOutcome> {
        let span = routing_span(request.method().as_str(), request.path());
        let _guard = span.enter();

        let mut endpoint = None;
        let (request, context) = self.provider.scoped(request, &mut |request| {
            let (mut request, reached) = self.traverse(request, &self.root, 1)?;
            if let Some(name) = &reached {
                self.provider.with_context(&mut request, &mut |context| {
                    context.set_endpoint(Arc::clone(name));
                    Ok(())
                })?;
            }
            endpoint = reached;
            Ok(request)
        })?;

        match &endpoint {
            Some(name) => tracing::debug!(
                endpoint = %name,
                template = %context.matched_template_path(),
                "request routed"
            ),
            None => tracing::warn!(path = request.path(), "no endpoint matched request"),
        }

        Ok(RoutingOutcome {
            request,
            endpoint,
            context,
        })
    }

    fn traverse(
        &self,
        request: RoutingRequest,
        router: &SharedRouter,
        depth: usize,
    ) -> RoutingResult<(RoutingRequest, Option<Arc<str>>)> {
        if depth > self.max_depth {
            return Err(RoutingError::DepthExceeded {
                depth,
                max: self.max_depth,
            });
        }

        let (mut request, next) = router.apply(request)?.into_parts();
        for child in &next {
            let (returned, reached) = self.traverse(request, child, depth + 1)?;
            if reached.is_some() {
                return Ok((returned, reached));
            }
            request = returned;
        }
        Ok((request, router.endpoint().map(Arc::clone)))
    }
}

/// The result of routing one request.
#[derive(Debug)]
pub struct RoutingOutcome {
    request: RoutingRequest,
    endpoint: Option<Arc<str>>,
    context: RoutingContext,
}

impl RoutingOutcome {
    /// Returns the request as the traversal left it.
    pub const fn request(&self) -> &RoutingRequest {
        &self.request
    }

    /// Returns the name of the endpoint reached, if any.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Returns the routing context accumulated during the traversal.
    pub const fn context(&self) -> &RoutingContext {
        &self.context
    }

    /// Fails with [`RoutingError::NotFound`] when no endpoint was reached.
    ///
    /// # Errors
    ///
    /// See above.
    pub fn require_endpoint(self) -> RoutingResult<Self> {
        if self.endpoint.is_some() {
            Ok(self)
        } else {
            Err(RoutingError::NotFound(self.request.path().to_string()))
        }
    }

    /// Splits the outcome into its parts.
    pub fn into_parts(self) -> (RoutingRequest, Option<Arc<str>>, RoutingContext) {
        (self.request, self.endpoint, self.context)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::provider::RequestScopedProvider;
    use crate::router::{Continuation, EndpointRouter, Router};

    /// Records its label when applied, then continues with `next`.
    #[derive(Debug)]
    struct Probe {
        label: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
        next: Vec<SharedRouter>,
        endpoint: Option<Arc<str>>,
    }

    impl Router for Probe {
        fn apply(&self, request: RoutingRequest) -> RoutingResult<Continuation> {
            self.log.lock().unwrap().push(self.label);
            Ok(Continuation::with_next(request, self.next.iter().map(Arc::clone)))
        }

        fn endpoint(&self) -> Option<&Arc<str>> {
            self.endpoint.as_ref()
        }
    }

    fn probe(
        label: &'static str,
        log: &Arc<Mutex<Vec<&'static str>>>,
        next: Vec<SharedRouter>,
    ) -> SharedRouter {
        Arc::new(Probe {
            label,
            log: Arc::clone(log),
            next,
            endpoint: None,
        })
    }

    fn stage(root: SharedRouter, settings: &Settings) -> RoutingStage {
        RoutingStage::new(root, Arc::new(RequestScopedProvider), settings)
    }

    #[test]
    fn test_depth_first_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let b = probe("b", &log, vec![probe("b1", &log, vec![])]);
        let c = probe("c", &log, vec![]);
        let root = probe("a", &log, vec![b, c]);

        let outcome = stage(root, &Settings::default())
            .route(RoutingRequest::builder().build())
            .unwrap();
        assert!(outcome.endpoint().is_none());
        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "b1", "c"]);
    }

    #[test]
    fn test_first_endpoint_wins() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let first: SharedRouter = Arc::new(EndpointRouter::new("first"));
        let after = probe("after", &log, vec![]);
        let root = probe("root", &log, vec![first, after]);

        let outcome = stage(root, &Settings::default())
            .route(RoutingRequest::builder().build())
            .unwrap();
        assert_eq!(outcome.endpoint(), Some("first"));
        assert_eq!(outcome.context().endpoint(), Some("first"));
        assert_eq!(*log.lock().unwrap(), vec!["root"]);
    }

    #[test]
    fn test_own_endpoint_checked_after_children() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let root: SharedRouter = Arc::new(Probe {
            label: "root",
            log: Arc::clone(&log),
            next: vec![probe("child", &log, vec![])],
            endpoint: Some(Arc::from("root-endpoint")),
        });

        let outcome = stage(root, &Settings::default())
            .route(RoutingRequest::builder().build())
            .unwrap();
        assert_eq!(outcome.endpoint(), Some("root-endpoint"));
        assert_eq!(*log.lock().unwrap(), vec!["root", "child"]);
    }

    #[test]
    fn test_depth_exceeded() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let leaf: SharedRouter = Arc::new(EndpointRouter::new("deep"));
        let root = probe("a", &log, vec![probe("b", &log, vec![leaf])]);
        let settings = Settings {
            max_routing_depth: 2,
            ..Settings::default()
        };

        let err = stage(root, &settings)
            .route(RoutingRequest::builder().build())
            .unwrap_err();
        assert!(matches!(err, RoutingError::DepthExceeded { depth: 3, max: 2 }));
    }

    #[test]
    fn test_require_endpoint() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let stage = stage(probe("a", &log, vec![]), &Settings::default());

        let err = stage
            .route(RoutingRequest::builder().path("/missing").build())
            .unwrap()
            .require_endpoint()
            .unwrap_err();
        assert!(matches!(err, RoutingError::NotFound(ref path) if path == "/missing"));
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_context_removed_from_request_after_routing() {
        let leaf: SharedRouter = Arc::new(EndpointRouter::new("leaf"));
        let outcome = stage(leaf, &Settings::default())
            .route(RoutingRequest::builder().build())
            .unwrap();
        assert!(outcome.request().extensions().get::<RoutingContext>().is_none());
        let (_, endpoint, context) = outcome.into_parts();
        assert_eq!(endpoint.as_deref(), Some("leaf"));
        assert_eq!(context.endpoint(), Some("leaf"));
    }
}
