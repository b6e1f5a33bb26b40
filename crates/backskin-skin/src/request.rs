//! Per-request inputs and outputs of skin resolution.

use std::collections::HashMap;
use std::time::Duration;

/// Query parameter that force-selects a skin.
pub const SKIN_QUERY_PARAM: &str = "_skin";

/// Cookie remembering a force-selected skin.
pub const SKIN_COOKIE: &str = "backend_skin";

/// Lifetime of the skin cookie.
pub const SKIN_COOKIE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// A cookie queued for the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub max_age: Duration,
}

/// Request-scoped view of query parameters and cookies, plus the cookie
/// changes resolution wants applied to the response.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    query: HashMap<String, String>,
    cookies: HashMap<String, String>,
    queued: Vec<Cookie>,
    forgotten: Vec<String>,
    partial: bool,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, name: &str, value: &str) -> Self {
        self.query.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.insert(name.to_string(), value.to_string());
        self
    }

    /// Mark the request as a partial (AJAX) request.
    pub fn with_partial(mut self, partial: bool) -> Self {
        self.partial = partial;
        self
    }

    /// Non-empty query parameter value.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Non-empty cookie value.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn is_partial(&self) -> bool {
        self.partial
    }

    pub fn queue_cookie(&mut self, cookie: Cookie) {
        self.queued.retain(|c| c.name != cookie.name);
        self.queued.push(cookie);
    }

    pub fn forget_cookie(&mut self, name: &str) {
        self.queued.retain(|c| c.name != name);
        if !self.forgotten.iter().any(|n| n == name) {
            self.forgotten.push(name.to_string());
        }
    }

    pub fn queued_cookies(&self) -> &[Cookie] {
        &self.queued
    }

    pub fn forgotten_cookies(&self) -> &[String] {
        &self.forgotten
    }
}
