//! Locale-aware routing.
//!
//! Routes match an absolute path offset inside the request path and report
//! how many bytes they consumed, so they compose inside nested trees. Matching
//! never touches the locale registry directly: a match carries the locale it
//! detected and the caller applies it to the request-scoped registry (see
//! `Routing::apply_to`).
//!
//! - `literal`, `segment`, `part`, `tree`: ordinary route building blocks
//! - `locale_segment`: a route node for a single `/<locale>/` prefix
//! - `stack`: the top-level router that strips and re-prepends the prefix
//! - `listener`: applies routing results and derives response headers

mod listener;
mod literal;
mod locale_segment;
mod part;
mod segment;
mod stack;
mod tree;

pub use listener::{content_language, Routing};
pub use literal::Literal;
pub use locale_segment::LocaleRouteSegment;
pub use part::Part;
pub use segment::Segment;
pub use stack::LocaleAwareRouteStack;
pub use tree::RouteStack;

use crate::error::RouteError;
use crate::i18n::LocaleRegistry;
use std::collections::BTreeMap;
use url::Url;

/// Reserved match parameter holding the locale found by `LocaleRouteSegment`.
pub const LOCALE_PARAM: &str = "__LOCALE__";

/// Match parameter that always carries the effective canonical locale.
pub const LOCALE: &str = "locale";

pub type Params = BTreeMap<String, String>;

/// The parts of an inbound request routing needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    uri: Url,
    base_url: String,
}

impl RouteRequest {
    pub fn new(uri: Url) -> Self {
        Self {
            uri,
            base_url: String::new(),
        }
    }

    pub fn parse(uri: &str) -> Result<Self, url::ParseError> {
        Url::parse(uri).map(Self::new)
    }

    /// Path prefix under which the application is mounted (e.g. `/app`).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn host(&self) -> Option<&str> {
        self.uri.host_str()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The request URI with a `/` appended to its path.
    pub(crate) fn with_trailing_slash(&self) -> String {
        let mut uri = self.uri.clone();
        let path = format!("{}/", uri.path());
        uri.set_path(&path);
        uri.to_string()
    }
}

/// Everything a route sees while matching.
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    pub request: &'a RouteRequest,
    pub registry: Option<&'a LocaleRegistry>,
}

impl<'a> MatchContext<'a> {
    pub fn new(request: &'a RouteRequest, registry: Option<&'a LocaleRegistry>) -> Self {
        Self { request, registry }
    }
}

/// A successful match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMatch {
    length: usize,
    params: Params,
    matched_route_name: Option<String>,
    locale: Option<String>,
}

impl RouteMatch {
    pub fn new(params: Params, length: usize) -> Self {
        Self {
            length,
            params,
            ..Self::default()
        }
    }

    /// Attach a locale detected while matching. The caller is expected to
    /// make it current on the request registry.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Bytes of path consumed by the match.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn set_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.insert(name.into(), value.into());
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn matched_route_name(&self) -> Option<&str> {
        self.matched_route_name.as_deref()
    }

    /// Set the route name, prefixing any name already set by a nested route
    /// (`parent/child`).
    pub fn set_matched_route_name(&mut self, name: &str) {
        self.matched_route_name = Some(match self.matched_route_name.take() {
            Some(child) => format!("{}/{}", name, child),
            None => name.to_string(),
        });
    }

    /// Fold a child match into this one.
    pub fn merge(&mut self, other: RouteMatch) {
        self.params.extend(other.params);
        self.length += other.length;
        if other.matched_route_name.is_some() {
            self.matched_route_name = other.matched_route_name;
        }
        if other.locale.is_some() {
            self.locale = other.locale;
        }
    }
}

/// A permanent redirect issued instead of a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Absolute target URI for the `Location` header.
    pub location: String,
    /// Locale detected in the path that triggered the redirect.
    pub locale: String,
}

/// Result of a route that recognised the path.
///
/// `Redirect` is terminal: the response is the redirect and no further
/// routes may be tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Match(RouteMatch),
    Redirect(Redirect),
}

/// Options for URL assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Route name, `parent/child` for nested routes.
    pub name: Option<String>,
    /// Target locale; the registry's current locale when unset.
    pub locale: Option<String>,
    /// Emit the prefix even for the default locale.
    pub display_default_locale: bool,
    pub query: Option<String>,
    pub fragment: Option<String>,
    /// Produce an absolute URI using the request's scheme and host.
    pub force_canonical: bool,
    /// Absolute target URI whose scheme, host and port are used.
    pub uri: Option<Url>,
    /// Remove dot segments from the assembled path.
    pub normalize_path: bool,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            name: None,
            locale: None,
            display_default_locale: false,
            query: None,
            fragment: None,
            force_canonical: false,
            uri: None,
            normalize_path: true,
        }
    }
}

impl AssembleOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_display_default_locale(mut self, display: bool) -> Self {
        self.display_default_locale = display;
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }

    pub fn with_force_canonical(mut self, force: bool) -> Self {
        self.force_canonical = force;
        self
    }

    pub fn with_uri(mut self, uri: Url) -> Self {
        self.uri = Some(uri);
        self
    }

    pub fn with_normalize_path(mut self, normalize: bool) -> Self {
        self.normalize_path = normalize;
        self
    }
}

/// Context for assembly: both parts are optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssembleContext<'a> {
    pub request: Option<&'a RouteRequest>,
    pub registry: Option<&'a LocaleRegistry>,
}

impl<'a> AssembleContext<'a> {
    pub fn new(request: Option<&'a RouteRequest>, registry: Option<&'a LocaleRegistry>) -> Self {
        Self { request, registry }
    }
}

/// A node in the route tree.
pub trait Route: Send + Sync {
    /// Match the request path starting at byte `offset`.
    fn match_path(&self, cx: &MatchContext<'_>, offset: usize) -> Option<MatchOutcome>;

    /// Assemble this route's part of a path.
    fn assemble(
        &self,
        params: &Params,
        options: &AssembleOptions,
        registry: Option<&LocaleRegistry>,
    ) -> Result<String, RouteError>;

    /// Child routes, for routes that nest others.
    fn children(&self) -> Option<&RouteStack> {
        None
    }
}
