//! Seeding the routing context with the request path.

use std::sync::Arc;

use percent_encoding::percent_decode_str;

use tramway_core::RoutingResult;

use crate::provider::SharedContextProvider;
use crate::request::RoutingRequest;
use crate::router::{Continuation, Router, SharedRouter};

/// Root of a router tree.
///
/// Records the request path as the initial right-hand path, which the
/// first [`PathMatchingRouter`](super::PathMatchingRouter) below it consumes,
/// then continues with its root routers.
#[derive(Debug)]
pub struct MatchResultInitializerRouter {
    provider: SharedContextProvider,
    decode_path: bool,
    root_routers: Vec<SharedRouter>,
}

impl MatchResultInitializerRouter {
    /// Creates an initializer continuing with `root_routers`.
    ///
    /// With `decode_path`, percent-encoded octets in the request path are
    /// decoded before matching; invalid UTF-8 is replaced lossily.
    pub fn new(
        provider: SharedContextProvider,
        decode_path: bool,
        root_routers: impl IntoIterator<Item = SharedRouter>,
    ) -> Self {
        Self {
            provider,
            decode_path,
            root_routers: root_routers.into_iter().collect(),
        }
    }

    fn initial_path(&self, path: &str) -> String {
        let path = if self.decode_path {
            percent_decode_str(path).decode_utf8_lossy().into_owned()
        } else {
            path.to_string()
        };
        if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        }
    }
}

impl Router for MatchResultInitializerRouter {
    fn apply(&self, mut request: RoutingRequest) -> RoutingResult<Continuation> {
        let path = self.initial_path(request.path());
        self.provider.with_context(&mut request, &mut |context| {
            context.seed(&path);
            Ok(())
        })?;
        Ok(Continuation::with_next(
            request,
            self.root_routers.iter().map(Arc::clone),
        ))
    }
}
