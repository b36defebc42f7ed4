//! Matching URI templates against the remaining request path.

use std::sync::Arc;

use tramway_core::{RoutingError, RoutingResult};

use crate::provider::SharedContextProvider;
use crate::request::RoutingRequest;
use crate::router::{Continuation, Router, SharedRouter};
use crate::template::UriTemplate;

/// A template together with the routers to continue with when it matches.
#[derive(Debug, Clone)]
pub struct Route {
    template: Arc<UriTemplate>,
    exact: bool,
    routers: Vec<SharedRouter>,
}

impl Route {
    /// A route whose template may match a prefix of the remaining path,
    /// leaving the rest to routers further down (resources, locators).
    pub fn of(template: Arc<UriTemplate>, routers: impl IntoIterator<Item = SharedRouter>) -> Self {
        Self {
            template,
            exact: false,
            routers: routers.into_iter().collect(),
        }
    }

    /// A route whose template must consume the whole remaining path, up to
    /// a single trailing `/` (resource and sub-resource methods).
    pub fn exact(template: Arc<UriTemplate>, routers: impl IntoIterator<Item = SharedRouter>) -> Self {
        Self {
            template,
            exact: true,
            routers: routers.into_iter().collect(),
        }
    }

    /// Returns the route's template.
    pub const fn template(&self) -> &Arc<UriTemplate> {
        &self.template
    }

    /// Returns the routers continued with on a match.
    pub fn routers(&self) -> &[SharedRouter] {
        &self.routers
    }
}

/// Tries its routes in order against the part of the path not yet matched.
///
/// The first matching route wins: its match result is pushed onto the
/// routing context and routing continues with that route's routers. When no
/// route matches, this branch ends.
#[derive(Debug)]
pub struct PathMatchingRouter {
    provider: SharedContextProvider,
    routes: Vec<Route>,
}

impl PathMatchingRouter {
    /// Creates a router over `routes`, tried in the given order.
    pub fn new(provider: SharedContextProvider, routes: impl IntoIterator<Item = Route>) -> Self {
        Self {
            provider,
            routes: routes.into_iter().collect(),
        }
    }

    /// Returns the routes in match order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

impl Router for PathMatchingRouter {
    fn apply(&self, mut request: RoutingRequest) -> RoutingResult<Continuation> {
        let mut selected: Option<&Route> = None;

        self.provider.with_context(&mut request, &mut |context| {
            let path = context
                .final_match_group()
                .ok_or_else(|| {
                    RoutingError::OrderingViolation(
                        "path matching ran before the request path was seeded".to_string(),
                    )
                })?
                .to_string();

            for route in &self.routes {
                let result = if route.exact {
                    route.template.full_match(&path)
                } else {
                    route.template.match_path(&path)
                };
                if let Some(result) = result {
                    tracing::trace!(template = %route.template, path = %path, "path matched");
                    context.push_match_result(result);
                    selected = Some(route);
                    break;
                }
            }
            Ok(())
        })?;

        match selected {
            Some(route) => Ok(Continuation::with_next(
                request,
                route.routers.iter().map(Arc::clone),
            )),
            None => Ok(Continuation::of(request)),
        }
    }
}
