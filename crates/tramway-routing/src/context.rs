//! The per-request routing ledger.
//!
//! A [`RoutingContext`] is created when routing of a request starts and is
//! dropped (or handed to the caller) when it ends. Routers append to it as
//! the traversal descends from the root of the router tree to a leaf; nothing
//! is ever reordered or removed mid-request, so every sequence it exposes is
//! in root-to-leaf order.

use std::collections::HashMap;
use std::sync::Arc;

use crate::template::{TemplateMatch, UriTemplate};

/// Routing decisions accumulated for a single request.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tramway_routing::context::RoutingContext;
/// use tramway_routing::template::UriTemplate;
///
/// let resource = Arc::new(UriTemplate::new("/users").unwrap());
/// let method = Arc::new(UriTemplate::new("/{id}").unwrap());
///
/// let mut context = RoutingContext::new();
/// context.push_templates(&resource, Some(&method));
/// assert_eq!(context.matched_template_path(), "/users/{id}");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoutingContext {
    /// Path match results, seed first
    match_results: Vec<TemplateMatch>,
    /// Templates responsible for the matches, root first
    matched_templates: Vec<Arc<UriTemplate>>,
    /// Matched URI prefixes, root first
    matched_uris: Vec<String>,
    /// Number of template-driven path matches recorded
    matched_levels: usize,
    /// Value of `matched_levels` at the most recent template push
    matched_levels_at_push: usize,
    endpoint: Option<Arc<str>>,
}

impl RoutingContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Path matching ────────────────────────────────────────────────

    /// Seeds the context with the full request path.
    ///
    /// The seed is the right-hand path the first path-matching router
    /// consumes. It does not count as a matched level.
    pub fn seed(&mut self, path: &str) {
        self.match_results.push(TemplateMatch::unmatched(path));
    }

    /// Records the result of matching a template against the current
    /// right-hand path.
    pub fn push_match_result(&mut self, result: TemplateMatch) {
        self.match_results.push(result);
        self.matched_levels += 1;
    }

    /// Returns every recorded match result, seed first.
    pub fn match_results(&self) -> &[TemplateMatch] {
        &self.match_results
    }

    /// Returns the most recent match result.
    pub fn last_match(&self) -> Option<&TemplateMatch> {
        self.match_results.last()
    }

    /// Returns the part of the path not yet consumed by any match, or `None`
    /// if the context was never seeded.
    pub fn final_match_group(&self) -> Option<&str> {
        self.last_match().map(TemplateMatch::final_group)
    }

    /// Returns the parameters captured so far. A parameter captured at a
    /// deeper level overrides one with the same name captured above it.
    pub fn path_parameters(&self) -> HashMap<String, String> {
        let mut parameters = HashMap::new();
        for result in &self.match_results {
            for (name, value) in result.parameters() {
                parameters.insert(name.clone(), value.clone());
            }
        }
        parameters
    }

    // ── Matched templates ────────────────────────────────────────────

    /// Appends `resource`, then `method` if present, to the matched
    /// template ledger.
    ///
    /// Calls accumulate: each call corresponds to a distinct resolution
    /// level, so pushing the same templates twice yields two entries.
    pub fn push_templates(&mut self, resource: &Arc<UriTemplate>, method: Option<&Arc<UriTemplate>>) {
        self.matched_templates.push(Arc::clone(resource));
        if let Some(method) = method {
            self.matched_templates.push(Arc::clone(method));
        }
        self.matched_levels_at_push = self.matched_levels;
    }

    /// Returns the matched templates, root first.
    pub fn matched_templates(&self) -> &[Arc<UriTemplate>] {
        &self.matched_templates
    }

    /// Returns the matched template texts joined root to leaf, e.g.
    /// `/users/{id}/orders`.
    pub fn matched_template_path(&self) -> String {
        self.matched_templates
            .iter()
            .map(|t| t.template())
            .collect()
    }

    /// Returns how many path matches have been recorded since the most
    /// recent template push (or since seeding, before any push).
    ///
    /// A push consumes every match before it, so a later push with no new
    /// match of its own sees zero.
    pub const fn levels_pending_template(&self) -> usize {
        self.matched_levels.saturating_sub(self.matched_levels_at_push)
    }

    // ── Matched URIs ─────────────────────────────────────────────────

    /// Records the part of the request path matched so far as a matched URI.
    pub fn push_left_hand_path(&mut self) {
        let left_hand: String = self
            .match_results
            .iter()
            .map(TemplateMatch::matched)
            .collect();
        self.matched_uris.push(left_hand);
    }

    /// Returns the matched URIs, root first.
    pub fn matched_uris(&self) -> &[String] {
        &self.matched_uris
    }

    /// Returns the most specific matched URI.
    pub fn matched_uri(&self) -> Option<&str> {
        self.matched_uris.last().map(String::as_str)
    }

    // ── Endpoint ─────────────────────────────────────────────────────

    /// Records the endpoint routing resolved to.
    pub fn set_endpoint(&mut self, endpoint: Arc<str>) {
        self.endpoint = Some(endpoint);
    }

    /// Returns the endpoint routing resolved to, if any.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }
}
