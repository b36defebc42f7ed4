//! Resolution of the current request's routing context.
//!
//! Routers are built once and shared by every request, so they cannot hold
//! a [`RoutingContext`]. Instead they are given a [`ContextProvider`] that
//! resolves the context of whichever request is being routed when they run.
//!
//! Two providers are available:
//!
//! - [`RequestScopedProvider`] keeps the context in the request's extensions
//!   and passes it explicitly along the chain.
//! - [`TaskLocalProvider`] keeps it in a `tokio` task-local slot that is
//!   entered around each traversal.
//!
//! Either way, each traversal observes its own context instance; concurrent
//! requests never share one.

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tramway_core::{RoutingError, RoutingResult};

use crate::context::RoutingContext;
use crate::request::RoutingRequest;

/// An operation applied to the current request's routing context.
pub type ContextOp<'a> = dyn FnMut(&mut RoutingContext) -> RoutingResult<()> + 'a;

/// A traversal of the router tree for one request.
pub type Traversal<'a> = dyn FnMut(RoutingRequest) -> RoutingResult<RoutingRequest> + 'a;

/// A provider shared by every router in a tree.
pub type SharedContextProvider = Arc<dyn ContextProvider>;

/// Resolves the routing context of the request currently being routed.
pub trait ContextProvider: Send + Sync + fmt::Debug {
    /// Runs `op` against the context of the request being routed.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::ContextUnavailable`] if no context is in scope
    /// for `request`, or whatever error `op` returns.
    fn with_context(&self, request: &mut RoutingRequest, op: &mut ContextOp<'_>) -> RoutingResult<()>;

    /// Runs `traversal` inside a fresh request scope and returns the routed
    /// request together with the context it accumulated.
    ///
    /// # Errors
    ///
    /// Propagates any error from `traversal`.
    fn scoped(
        &self,
        request: RoutingRequest,
        traversal: &mut Traversal<'_>,
    ) -> RoutingResult<(RoutingRequest, RoutingContext)>;
}

/// Keeps the routing context in the request's extensions.
///
/// # Examples
///
/// ```
/// use tramway_routing::context::RoutingContext;
/// use tramway_routing::provider::{ContextProvider, RequestScopedProvider};
/// use tramway_routing::request::RoutingRequest;
///
/// let provider = RequestScopedProvider;
/// let mut request = RoutingRequest::builder().path("/a").build();
/// request.extensions_mut().insert(RoutingContext::new());
///
/// provider
///     .with_context(&mut request, &mut |context| {
///         context.seed("/a");
///         Ok(())
///     })
///     .unwrap();
///
/// let context = request.extensions().get::<RoutingContext>().unwrap();
/// assert_eq!(context.final_match_group(), Some("/a"));
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestScopedProvider;

impl ContextProvider for RequestScopedProvider {
    fn with_context(&self, request: &mut RoutingRequest, op: &mut ContextOp<'_>) -> RoutingResult<()> {
        let context = request
            .extensions_mut()
            .get_mut::<RoutingContext>()
            .ok_or_else(|| {
                RoutingError::ContextUnavailable(
                    "request carries no routing context in its extensions".to_string(),
                )
            })?;
        op(context)
    }

    fn scoped(
        &self,
        mut request: RoutingRequest,
        traversal: &mut Traversal<'_>,
    ) -> RoutingResult<(RoutingRequest, RoutingContext)> {
        // A context left over from an earlier pass is replaced.
        request.extensions_mut().insert(RoutingContext::new());
        let mut request = traversal(request)?;
        let context = request
            .extensions_mut()
            .remove::<RoutingContext>()
            .ok_or_else(|| {
                RoutingError::ContextUnavailable(
                    "routing context was removed from the request during traversal".to_string(),
                )
            })?;
        Ok((request, context))
    }
}

tokio::task_local! {
    static ROUTING_CONTEXT: RefCell<RoutingContext>;
}

/// Keeps the routing context in a `tokio` task-local slot.
///
/// The slot is only populated inside [`TaskLocalProvider::sync_scope`],
/// [`TaskLocalProvider::scope`], or a traversal started through
/// [`ContextProvider::scoped`]. Outside of those, resolving the context fails
/// with [`RoutingError::ContextUnavailable`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TaskLocalProvider;

impl TaskLocalProvider {
    /// Runs `f` with `context` as the current routing context and returns
    /// its result together with the context as `f` left it.
    ///
    /// Scopes nest: an inner scope shadows the outer one until it returns.
    pub fn sync_scope<R>(context: RoutingContext, f: impl FnOnce() -> R) -> (R, RoutingContext) {
        ROUTING_CONTEXT.sync_scope(RefCell::new(context), || {
            let result = f();
            let context = ROUTING_CONTEXT.with(RefCell::take);
            (result, context)
        })
    }

    /// Async counterpart of [`sync_scope`](Self::sync_scope): the context is
    /// current whenever `future` is being polled.
    pub async fn scope<F: Future>(context: RoutingContext, future: F) -> (F::Output, RoutingContext) {
        ROUTING_CONTEXT
            .scope(RefCell::new(context), async {
                let output = future.await;
                let context = ROUTING_CONTEXT.with(RefCell::take);
                (output, context)
            })
            .await
    }
}

impl ContextProvider for TaskLocalProvider {
    fn with_context(&self, _request: &mut RoutingRequest, op: &mut ContextOp<'_>) -> RoutingResult<()> {
        ROUTING_CONTEXT
            .try_with(|cell| {
                let mut context = cell.try_borrow_mut().map_err(|_| {
                    RoutingError::ContextUnavailable(
                        "routing context is already borrowed in this scope".to_string(),
                    )
                })?;
                op(&mut *context)
            })
            .map_err(|_| {
                RoutingError::ContextUnavailable(
                    "no routing context in the current task scope".to_string(),
                )
            })?
    }

    fn scoped(
        &self,
        request: RoutingRequest,
        traversal: &mut Traversal<'_>,
    ) -> RoutingResult<(RoutingRequest, RoutingContext)> {
        let (result, context) = Self::sync_scope(RoutingContext::new(), || traversal(request));
        result.map(|request| (request, context))
    }
}
