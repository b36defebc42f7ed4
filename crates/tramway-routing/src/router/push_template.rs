//! Recording which templates matched.
//!
//! A [`PushMatchedTemplateRouter`] sits right after the path-matching step
//! that matched its templates. It performs no matching of its own: it
//! trusts that the templates it was built with are the ones that just
//! matched, and appends them to the request's matched-template ledger.
//!
//! Instances are created through a [`PushMatchedTemplateRouterBuilder`],
//! which owns the context provider so that code assembling the router tree
//! only has to name templates.

use std::sync::Arc;

use tramway_core::{RoutingError, RoutingResult, Settings};

use crate::provider::SharedContextProvider;
use crate::request::RoutingRequest;
use crate::router::{Continuation, Router};
use crate::template::UriTemplate;

/// Pushes the URI template of a matched resource, and optionally of a
/// matched sub-resource method or locator, onto the routing context.
///
/// The router never rewrites the request and never ends routing by itself:
/// it returns the request unchanged with no successors, leaving the driver
/// to continue with the next sibling in the tree.
#[derive(Debug)]
pub struct PushMatchedTemplateRouter {
    provider: SharedContextProvider,
    resource_template: Arc<UriTemplate>,
    method_template: Option<Arc<UriTemplate>>,
    strict_ordering: bool,
}

impl PushMatchedTemplateRouter {
    /// Returns the resource template this router pushes.
    pub const fn resource_template(&self) -> &Arc<UriTemplate> {
        &self.resource_template
    }

    /// Returns the method or locator template this router pushes, if any.
    pub const fn method_template(&self) -> Option<&Arc<UriTemplate>> {
        self.method_template.as_ref()
    }

    /// Number of ledger entries one application adds.
    fn template_count(&self) -> usize {
        1 + usize::from(self.method_template.is_some())
    }
}

impl Router for PushMatchedTemplateRouter {
    fn apply(&self, mut request: RoutingRequest) -> RoutingResult<Continuation> {
        let resource = &self.resource_template;
        let method = self.method_template.as_ref();
        let needed = self.template_count();

        self.provider.with_context(&mut request, &mut |context| {
            let pending = context.levels_pending_template();
            if pending < needed {
                if self.strict_ordering {
                    return Err(RoutingError::OrderingViolation(format!(
                        "pushing {needed} template(s) for '{resource}' with only {pending} unrecorded path match(es)"
                    )));
                }
                tracing::debug!(
                    resource = %resource,
                    needed,
                    pending,
                    "template push without a matching path match"
                );
            }
            context.push_templates(resource, method);
            Ok(())
        })?;

        tracing::trace!(
            resource = %resource,
            method = ?method.map(|m| m.template()),
            "pushed matched templates"
        );
        Ok(Continuation::of(request))
    }
}

/// Creates [`PushMatchedTemplateRouter`]s bound to one context provider.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tramway_routing::provider::RequestScopedProvider;
/// use tramway_routing::router::PushMatchedTemplateRouterBuilder;
/// use tramway_routing::template::UriTemplate;
///
/// let builder = PushMatchedTemplateRouterBuilder::new(Arc::new(RequestScopedProvider));
/// let users = Arc::new(UriTemplate::new("/users").unwrap());
/// let by_id = Arc::new(UriTemplate::new("/{id}").unwrap());
///
/// let resource_router = builder.build(Arc::clone(&users));
/// let sub_resource_router = builder.build_with_method(users, by_id);
/// assert!(resource_router.method_template().is_none());
/// assert!(sub_resource_router.method_template().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct PushMatchedTemplateRouterBuilder {
    provider: SharedContextProvider,
    strict_ordering: bool,
}

impl PushMatchedTemplateRouterBuilder {
    /// Creates a builder whose routers resolve contexts through `provider`.
    pub fn new(provider: SharedContextProvider) -> Self {
        Self {
            provider,
            strict_ordering: false,
        }
    }

    /// Creates a builder configured from `settings`.
    pub fn from_settings(provider: SharedContextProvider, settings: &Settings) -> Self {
        Self::new(provider).strict_ordering(settings.strict_template_ordering)
    }

    /// Makes built routers fail with [`RoutingError::OrderingViolation`]
    /// when no unrecorded path match precedes their push.
    #[must_use]
    pub fn strict_ordering(mut self, strict: bool) -> Self {
        self.strict_ordering = strict;
        self
    }

    /// Builds a router pushing only `resource_template`.
    ///
    /// Use this when a resource method matched directly and only the
    /// resource path was matched.
    pub fn build(&self, resource_template: Arc<UriTemplate>) -> PushMatchedTemplateRouter {
        self.make(resource_template, None)
    }

    /// Builds a router pushing `resource_template` followed by
    /// `method_template`.
    ///
    /// Use this for sub-resource methods and locators, where both the
    /// resource path and the method path were matched.
    pub fn build_with_method(
        &self,
        resource_template: Arc<UriTemplate>,
        method_template: Arc<UriTemplate>,
    ) -> PushMatchedTemplateRouter {
        self.make(resource_template, Some(method_template))
    }

    fn make(
        &self,
        resource_template: Arc<UriTemplate>,
        method_template: Option<Arc<UriTemplate>>,
    ) -> PushMatchedTemplateRouter {
        PushMatchedTemplateRouter {
            provider: Arc::clone(&self.provider),
            resource_template,
            method_template,
            strict_ordering: self.strict_ordering,
        }
    }
}
