//! The request value carried through the router chain.
//!
//! [`RoutingRequest`] holds what routers need to make decisions: the method,
//! the target path, the query string, headers, and a typed extension map.
//! Routers receive it by value and hand it on inside a
//! [`Continuation`](crate::router::Continuation).

use http::{Extensions, HeaderMap, HeaderName, HeaderValue, Method};

/// A request being routed.
///
/// The target path is fixed at construction; routers may enrich the
/// extensions but never rewrite the path.
///
/// # Examples
///
/// ```
/// use tramway_routing::request::RoutingRequest;
///
/// let request = RoutingRequest::builder()
///     .method(http::Method::GET)
///     .path("/users/42")
///     .query_string("expand=orders")
///     .build();
///
/// assert_eq!(request.method(), &http::Method::GET);
/// assert_eq!(request.path(), "/users/42");
/// assert_eq!(request.query_string(), "expand=orders");
/// ```
#[derive(Debug)]
pub struct RoutingRequest {
    method: Method,
    path: String,
    query_string: String,
    headers: HeaderMap,
    extensions: Extensions,
}

impl RoutingRequest {
    /// Creates a new [`RoutingRequestBuilder`].
    pub fn builder() -> RoutingRequestBuilder {
        RoutingRequestBuilder::default()
    }

    /// Creates a `RoutingRequest` from the parts of an [`http::Request`].
    ///
    /// The request's extensions are carried over, so a routing context
    /// inserted upstream remains visible to routers.
    pub fn from_parts(parts: http::request::Parts) -> Self {
        let path = parts.uri.path().to_string();
        let query_string = parts.uri.query().unwrap_or("").to_string();

        Self {
            method: parts.method,
            path,
            query_string,
            headers: parts.headers,
            extensions: parts.extensions,
        }
    }

    /// Returns the HTTP method.
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the target path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the raw query string (without the leading `?`).
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    /// Returns the request headers.
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the request extensions.
    pub const fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Returns the request extensions mutably.
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}

/// Builder for [`RoutingRequest`].
#[derive(Debug, Default)]
pub struct RoutingRequestBuilder {
    method: Method,
    path: Option<String>,
    query_string: String,
    headers: HeaderMap,
}

impl RoutingRequestBuilder {
    /// Sets the HTTP method (defaults to `GET`).
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the target path (defaults to `/`).
    #[must_use]
    pub fn path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    /// Sets the query string.
    #[must_use]
    pub fn query_string(mut self, query_string: &str) -> Self {
        self.query_string = query_string.to_string();
        self
    }

    /// Adds a header. Invalid names or values are skipped.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// Builds the request.
    pub fn build(self) -> RoutingRequest {
        RoutingRequest {
            method: self.method,
            path: self.path.unwrap_or_else(|| "/".to_string()),
            query_string: self.query_string,
            headers: self.headers,
            extensions: Extensions::new(),
        }
    }
}
