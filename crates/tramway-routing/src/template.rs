//! Compiled URI templates.
//!
//! A [`UriTemplate`] is built once from a template string such as
//! `/users/{id}` or `/files/{name: [a-z]+\.txt}` and then shared, via `Arc`,
//! by every router that refers to it. Matching is a prefix match: whatever
//! the template does not consume is returned as the right-hand path for the
//! next level of the router tree.

use std::fmt;
use std::fmt::Write as _;
use std::hash::{Hash, Hasher};

use regex::Regex;

use tramway_core::{RoutingError, RoutingResult};

/// Regex used for a `{name}` parameter without an explicit pattern.
const DEFAULT_PARAMETER_REGEX: &str = "[^/]+";

/// Name of the capture group holding the unmatched remainder of the path.
const FINAL_GROUP: &str = "final";

/// A compiled URI path template.
///
/// Two templates are equal when their normalized template text is equal;
/// use [`std::sync::Arc::ptr_eq`] on shared templates for identity.
///
/// # Examples
///
/// ```
/// use tramway_routing::template::UriTemplate;
///
/// let template = UriTemplate::new("/users/{id}").unwrap();
/// let m = template.match_path("/users/42/orders").unwrap();
/// assert_eq!(m.parameter("id"), Some("42"));
/// assert_eq!(m.matched(), "/users/42");
/// assert_eq!(m.final_group(), "/orders");
/// ```
pub struct UriTemplate {
    /// The normalized template text (leading `/`, no trailing `/`)
    template: String,
    /// Whether the original text ended with `/`
    ends_with_slash: bool,
    /// Compiled matcher; parameter `i` is captured as group `p{i}`
    regex: Regex,
    /// Parameter names, in order of appearance
    parameter_names: Vec<String>,
}

impl fmt::Debug for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UriTemplate")
            .field("template", &self.template)
            .field("regex", &self.regex.as_str())
            .field("parameter_names", &self.parameter_names)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

impl PartialEq for UriTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.template == other.template
    }
}

impl Eq for UriTemplate {}

impl Hash for UriTemplate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.template.hash(state);
    }
}

impl UriTemplate {
    /// Compiles a template string.
    ///
    /// A missing leading `/` is added and a trailing `/` is dropped, so
    /// `users`, `/users` and `/users/` compile to the same template. The
    /// empty template (and `/`) matches every path.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::InvalidTemplate`] for unbalanced braces, empty
    /// or duplicate parameter names, or a parameter regex that does not compile.
    pub fn new(template: &str) -> RoutingResult<Self> {
        let ends_with_slash = template.len() > 1 && template.ends_with('/');
        let normalized = normalize(template);
        let (regex_str, parameter_names) = parse_template(&normalized)?;
        let regex = Regex::new(&regex_str).map_err(|e| {
            RoutingError::InvalidTemplate(format!("'{template}' compiles to an invalid regex: {e}"))
        })?;

        Ok(Self {
            template: normalized,
            ends_with_slash,
            regex,
            parameter_names,
        })
    }

    /// Returns the normalized template text.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the parameter names in order of appearance.
    pub fn parameter_names(&self) -> &[String] {
        &self.parameter_names
    }

    /// Returns `true` if the template was written with a trailing `/`.
    pub const fn ends_with_slash(&self) -> bool {
        self.ends_with_slash
    }

    /// Returns the compiled regex.
    pub const fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Matches the template against the start of `path`.
    ///
    /// The match must end on a segment boundary: the remainder is either
    /// empty or starts with `/`. Returns `None` if the path does not match.
    pub fn match_path(&self, path: &str) -> Option<TemplateMatch> {
        let captures = self.regex.captures(path)?;

        let parameters = self
            .parameter_names
            .iter()
            .enumerate()
            .filter_map(|(i, name)| {
                captures
                    .name(&format!("p{i}"))
                    .map(|m| (name.clone(), m.as_str().to_string()))
            })
            .collect();

        let final_group = captures
            .name(FINAL_GROUP)
            .map_or_else(String::new, |m| m.as_str().to_string());
        let matched = path[..path.len() - final_group.len()].to_string();

        Some(TemplateMatch {
            matched,
            parameters,
            final_group,
        })
    }

    /// Matches the whole of `path`, allowing at most a single trailing `/`
    /// as remainder.
    pub fn full_match(&self, path: &str) -> Option<TemplateMatch> {
        self.match_path(path)
            .filter(|m| m.final_group.is_empty() || m.final_group == "/")
    }
}

/// The result of matching a [`UriTemplate`] against a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMatch {
    matched: String,
    parameters: Vec<(String, String)>,
    final_group: String,
}

impl TemplateMatch {
    /// Creates a match that consumed nothing, leaving `path` as the remainder.
    ///
    /// Used to seed a routing context with the full request path.
    pub fn unmatched(path: impl Into<String>) -> Self {
        Self {
            matched: String::new(),
            parameters: Vec::new(),
            final_group: path.into(),
        }
    }

    /// Returns the part of the path consumed by the template.
    pub fn matched(&self) -> &str {
        &self.matched
    }

    /// Returns the captured parameters, in template order.
    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// Returns the value captured for `name`, if any.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the unmatched remainder of the path.
    pub fn final_group(&self) -> &str {
        &self.final_group
    }
}

fn normalize(template: &str) -> String {
    let trimmed = template.trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Parses a normalized template into an anchored regex string and the list
/// of parameter names.
fn parse_template(template: &str) -> RoutingResult<(String, Vec<String>)> {
    // `.` in the remainder group must also cover decoded newlines.
    let mut regex_parts = String::from("(?s)^");
    let mut names: Vec<String> = Vec::new();
    let mut remaining = template;

    while !remaining.is_empty() {
        if let Some(start) = remaining.find('{') {
            let prefix = &remaining[..start];
            if prefix.contains('}') {
                return Err(RoutingError::InvalidTemplate(format!(
                    "Unmatched '}}' in template: {template}"
                )));
            }
            regex_parts.push_str(&regex::escape(prefix));

            let end = find_closing_brace(&remaining[start..]).ok_or_else(|| {
                RoutingError::InvalidTemplate(format!("Unclosed '{{' in template: {template}"))
            })? + start;

            let (name, pattern) = parse_name_and_pattern(&remaining[start + 1..end]);
            if name.is_empty() {
                return Err(RoutingError::InvalidTemplate(format!(
                    "Empty parameter name in template: {template}"
                )));
            }
            if names.iter().any(|n| n == name) {
                return Err(RoutingError::InvalidTemplate(format!(
                    "Duplicate parameter '{name}' in template: {template}"
                )));
            }

            write!(regex_parts, "(?P<p{}>{pattern})", names.len()).ok();
            names.push(name.to_string());

            remaining = &remaining[end + 1..];
        } else {
            if remaining.contains('}') {
                return Err(RoutingError::InvalidTemplate(format!(
                    "Unmatched '}}' in template: {template}"
                )));
            }
            regex_parts.push_str(&regex::escape(remaining));
            break;
        }
    }

    write!(regex_parts, "(?P<{FINAL_GROUP}>/.*)?$").ok();
    Ok((regex_parts, names))
}

/// Returns the byte offset of the `}` closing the `{` at the start of `s`,
/// allowing nested braces inside parameter regexes (e.g. `[0-9]{4}`).
fn find_closing_brace(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits `name: pattern` (or plain `name`) into its parts.
fn parse_name_and_pattern(inner: &str) -> (&str, &str) {
    inner.find(':').map_or((inner.trim(), DEFAULT_PARAMETER_REGEX), |pos| {
        (inner[..pos].trim(), inner[pos + 1..].trim())
    })
}
