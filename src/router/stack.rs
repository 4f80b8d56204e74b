//! Top-level locale-aware router.
//!
//! Wraps an ordinary `RouteStack`. Matching strips a leading `/<locale>`
//! segment before the child routes see the path; assembly puts it back
//! according to the default-locale visibility policy.

use crate::error::RouteError;
use crate::i18n::{codec, LocaleRegistry};
use crate::router::{
    AssembleContext, AssembleOptions, MatchContext, MatchOutcome, Params, Redirect, Route,
    RouteRequest, RouteStack, Routing, LOCALE,
};
use tracing::debug;
use url::{Position, Url};

/// Locale prefix found at the start of the routed path.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DetectedLocale {
    locale: String,
    /// Bytes consumed: the leading slash plus the segment.
    length: usize,
    trailing_slash: bool,
}

#[derive(Default)]
pub struct LocaleAwareRouteStack {
    routes: RouteStack,
    base_url: Option<String>,
    default_params: Params,
}

impl LocaleAwareRouteStack {
    pub fn new(routes: RouteStack) -> Self {
        Self {
            routes,
            ..Self::default()
        }
    }

    /// Fix the base URL instead of taking it from each request.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    /// Parameter merged into every match that does not set it itself.
    pub fn with_default_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_params.insert(name.into(), value.into());
        self
    }

    pub fn add_route(&mut self, name: impl Into<String>, route: impl Route + 'static) {
        self.routes.add_route(name, route);
    }

    pub fn routes(&self) -> &RouteStack {
        &self.routes
    }

    fn base_url<'a>(&'a self, request: Option<&'a RouteRequest>) -> &'a str {
        self.base_url
            .as_deref()
            .or_else(|| request.map(RouteRequest::base_url))
            .unwrap_or_default()
    }

    /// Look for a locale prefix at `offset`.
    ///
    /// Only a registered locale written exactly in `language[-REGION]` form
    /// counts; `/es-es/` or `/es_ES/` are left to the child routes.
    fn detect_locale(
        &self,
        path: &str,
        offset: usize,
        registry: &LocaleRegistry,
    ) -> Option<DetectedLocale> {
        let rest = path.get(offset..)?.strip_prefix('/')?;
        let next_slash = rest.find('/');
        let segment = &rest[..next_slash.unwrap_or(rest.len())];

        if !registry.has_locale(segment) {
            return None;
        }

        let expected = codec::format(segment, true).ok()?;
        if segment != expected {
            debug!("Locale segment {:?} is not in canonical form, ignoring", segment);
            return None;
        }

        Some(DetectedLocale {
            locale: expected,
            length: segment.len() + 1,
            trailing_slash: next_slash.is_some(),
        })
    }

    /// Route a request.
    ///
    /// The first child route whose match covers the whole remaining path
    /// wins. A locale prefix without trailing slash yields a redirect to the
    /// slash-terminated URI and no child is tried.
    pub fn match_request(
        &self,
        request: &RouteRequest,
        registry: Option<&LocaleRegistry>,
    ) -> Routing {
        let path = request.path();
        let base_url = self.base_url(Some(request));

        let within_base = path
            .strip_prefix(base_url)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));
        if !within_base {
            debug!("Path {} is outside base URL {}", path, base_url);
            return Routing::default();
        }

        let mut offset = base_url.len();
        let mut path_locale = None;

        if let Some(registry) = registry {
            if let Some(detected) = self.detect_locale(path, offset, registry) {
                if !detected.trailing_slash {
                    debug!("Redirecting {} to add a trailing slash", path);
                    return Routing {
                        path_locale: Some(detected.locale.clone()),
                        outcome: Some(MatchOutcome::Redirect(Redirect {
                            location: request.with_trailing_slash(),
                            locale: detected.locale,
                        })),
                    };
                }

                debug!("Detected locale {} in path {}", detected.locale, path);
                offset += detected.length;
                path_locale = Some(detected.locale);
            }
        }

        let remaining = path.len() - offset;
        let cx = MatchContext::new(request, registry);

        let outcome = match self.routes.match_at(&cx, offset, Some(remaining)) {
            Some(MatchOutcome::Match(mut route_match)) => {
                for (name, value) in &self.default_params {
                    if route_match.param(name).is_none() {
                        route_match.set_param(name.clone(), value.clone());
                    }
                }

                if let Some(registry) = registry {
                    if route_match.param(LOCALE).is_none() {
                        let locale = route_match
                            .locale()
                            .or(path_locale.as_deref())
                            .unwrap_or(registry.locale())
                            .to_string();
                        route_match.set_param(LOCALE, locale);
                    }
                }

                Some(MatchOutcome::Match(route_match))
            }
            other => other,
        };

        Routing {
            path_locale,
            outcome,
        }
    }

    /// Assemble a URL for the route named in `options`.
    ///
    /// The locale prefix is emitted when the target locale is not the
    /// default, when it is the locale the current request was addressed
    /// with, or when `display_default_locale` is set.
    pub fn assemble(
        &self,
        params: &Params,
        options: &AssembleOptions,
        cx: &AssembleContext<'_>,
    ) -> Result<String, RouteError> {
        if options.name.is_none() {
            return Err(RouteError::MissingName);
        }

        let mut params = params.clone();
        for (name, value) in &self.default_params {
            params.entry(name.clone()).or_insert_with(|| value.clone());
        }

        let mut options = options.clone();
        let mut prefix = String::new();

        if let Some(registry) = cx.registry {
            let locale = codec::canonicalize(
                options.locale.as_deref().unwrap_or(registry.locale()),
            )?;

            let from_path = registry
                .path_locale()
                .is_some_and(|path_locale| codec::equivalent(path_locale, &locale));

            if !registry.is_default_locale(&locale) || from_path || options.display_default_locale
            {
                prefix = format!("/{}", codec::format(&locale, true)?);
            }

            options.locale = Some(locale);
        }

        let child_path = self.routes.assemble(&params, &options, cx.registry)?;
        let path = format!("{}{}{}", self.base_url(cx.request), prefix, child_path);

        compose_uri(&path, &options, cx.request)
    }
}

/// Attach query and fragment, and make the URI absolute when asked to.
fn compose_uri(
    path: &str,
    options: &AssembleOptions,
    request: Option<&RouteRequest>,
) -> Result<String, RouteError> {
    if options.force_canonical || options.uri.is_some() {
        let mut uri = match (&options.uri, request) {
            (Some(uri), _) => uri.clone(),
            (None, Some(request)) => request.uri().clone(),
            (None, None) => return Err(RouteError::RequestUriMissing),
        };
        uri.set_path(path);
        uri.set_query(options.query.as_deref());
        uri.set_fragment(options.fragment.as_deref());
        return Ok(uri.to_string());
    }

    if options.normalize_path {
        let mut uri = Url::parse("http://localhost/")?;
        uri.set_path(path);
        uri.set_query(options.query.as_deref());
        uri.set_fragment(options.fragment.as_deref());
        return Ok(uri[Position::BeforePath..].to_string());
    }

    let mut uri = path.to_string();
    if let Some(query) = &options.query {
        uri.push('?');
        uri.push_str(query);
    }
    if let Some(fragment) = &options.fragment {
        uri.push('#');
        uri.push_str(fragment);
    }
    Ok(uri)
}
