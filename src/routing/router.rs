//! Route lookup.
//!
//! # Responsibilities
//! - Store compiled routes in declaration order
//! - Look up the matching route for a path
//! - Fall back to the default route when nothing matches
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) path prefix scan (acceptable for typical route counts)
//! - The default route is a separate field, so there is always exactly one

use std::borrow::Cow;

use crate::config::schema::{DefaultRouteConfig, ProxyConfig, RouteConfig};
use crate::routing::destination::Destination;
use crate::routing::matcher::PathPrefixMatcher;
use crate::routing::RouteError;

/// A compiled routing rule.
#[derive(Debug, Clone)]
pub struct Route {
    name: String,
    matcher: PathPrefixMatcher,
    strip_prefix: bool,
    destination: Destination,
}

impl Route {
    pub fn new(
        name: impl Into<String>,
        prefix: impl Into<String>,
        strip_prefix: bool,
        destination: Destination,
    ) -> Self {
        Self {
            name: name.into(),
            matcher: PathPrefixMatcher::new(prefix),
            strip_prefix,
            destination,
        }
    }

    pub fn from_config(config: &RouteConfig) -> Result<Self, RouteError> {
        let destination = Destination::from_config(&config.name, &config.destination)?;
        let strip_prefix = config
            .strip_prefix
            .unwrap_or_else(|| config.destination.strips_by_default());
        Ok(Self::new(&config.name, &config.prefix, strip_prefix, destination))
    }

    /// The fallback route: empty prefix, path forwarded as is.
    pub fn fallback_from_config(config: &DefaultRouteConfig) -> Result<Self, RouteError> {
        let destination = Destination::from_config(&config.name, &config.destination)?;
        Ok(Self {
            name: config.name.clone(),
            matcher: PathPrefixMatcher::any(),
            strip_prefix: false,
            destination,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> &str {
        self.matcher.prefix()
    }

    pub fn strip_prefix(&self) -> bool {
        self.strip_prefix
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn matches(&self, path: &str) -> bool {
        self.matcher.matches(path)
    }

    /// Path to send to the destination.
    ///
    /// With `strip_prefix` the prefix is removed and the remainder keeps or
    /// gains a leading `/`. Otherwise the path is untouched.
    pub fn forward_path<'a>(&self, path: &'a str) -> Cow<'a, str> {
        if !self.strip_prefix {
            return Cow::Borrowed(path);
        }
        match self.matcher.strip(path) {
            Some(rest) if rest.starts_with('/') => Cow::Borrowed(rest),
            Some(rest) => Cow::Owned(format!("/{}", rest)),
            None => Cow::Borrowed(path),
        }
    }
}

/// Ordered, immutable route set with a mandatory fallback.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
    fallback: Route,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>, fallback: Route) -> Self {
        Self { routes, fallback }
    }

    /// Compile the route table, failing on the first invalid destination.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, RouteError> {
        let routes = config
            .routes
            .iter()
            .map(Route::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        let fallback = Route::fallback_from_config(&config.default_route)?;

        for route in &routes {
            tracing::debug!(
                route = %route.name(),
                prefix = %route.prefix(),
                destination = route.destination().kind(),
                strip_prefix = route.strip_prefix(),
                "Route compiled"
            );
        }

        Ok(Self::new(routes, fallback))
    }

    /// First route whose prefix matches `path`, else the fallback.
    pub fn match_path(&self, path: &str) -> &Route {
        self.routes
            .iter()
            .find(|route| route.matches(path))
            .unwrap_or(&self.fallback)
    }

    /// Non-default routes in match order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn fallback(&self) -> &Route {
        &self.fallback
    }
}
