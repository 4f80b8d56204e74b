//! HTTP front end.
//!
//! Every request gets its own `LocaleRegistry` built from the shared config,
//! is routed through the shared `LocaleAwareRouteStack`, and answers with the
//! match as JSON, a permanent redirect, or a 404. All routed responses carry
//! `Content-Language`.

use crate::config::Config;
use crate::i18n::{LanguageHelper, LocaleCatalog, LocaleRegistry, SystemLocale, Translator};
use crate::router::{
    content_language, AssembleContext, AssembleOptions, Literal, LocaleAwareRouteStack,
    MatchOutcome, Params, Part, RouteMatch, RouteRequest, RouteStack, Segment, LOCALE_PARAM,
};
use axum::extract::State;
use axum::http::uri::Authority;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::{Json, Router};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub routes: Arc<LocaleAwareRouteStack>,
    pub catalog: Arc<dyn LocaleCatalog>,
    pub system: Arc<dyn SystemLocale>,
}

impl AppState {
    pub fn new(
        config: Config,
        routes: LocaleAwareRouteStack,
        catalog: Arc<dyn LocaleCatalog>,
        system: Arc<dyn SystemLocale>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            routes: Arc::new(routes),
            catalog,
            system,
        }
    }

    /// Registry for one request. A broken locale configuration degrades to
    /// an empty registry on the platform default instead of failing the
    /// request.
    fn registry_for(&self, host: Option<&str>) -> LocaleRegistry {
        self.config
            .build_registry(
                Arc::clone(&self.catalog),
                Arc::clone(&self.system),
                &[],
                host,
            )
            .unwrap_or_else(|e| {
                warn!("Falling back to default locale for host {:?}: {:#}", host, e);
                LocaleRegistry::new(Arc::clone(&self.catalog), Arc::clone(&self.system))
            })
    }
}

/// Routes served by the binary.
pub fn demo_routes() -> LocaleAwareRouteStack {
    LocaleAwareRouteStack::new(
        RouteStack::new()
            .with_route("home", Literal::new("/"))
            .with_route("about", Literal::new("/about").with_default("page", "about"))
            .with_route("post", Segment::new("/post/:slug"))
            .with_route(
                "docs",
                Part::new(Literal::new("/docs"), true).with_child("page", Segment::new("/:page")),
            ),
    )
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .fallback(handle_request)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn handle_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let Some(absolute) = absolute_uri(&headers, &uri) else {
        warn!("Rejecting request {} with invalid Host header", uri);
        return StatusCode::BAD_REQUEST.into_response();
    };

    match RouteRequest::parse(&absolute) {
        Ok(request) => respond(&state, request),
        Err(e) => {
            warn!("Rejecting unparseable request URI {}: {}", uri, e);
            StatusCode::BAD_REQUEST.into_response()
        }
    }
}

/// Absolute URI of the request, taking the authority from the `Host` header.
///
/// Returns `None` when the header is not a bare `host[:port]`, so that it
/// cannot smuggle path, query, fragment or userinfo into the routed URI.
fn absolute_uri(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    let authority = match headers.get(header::HOST) {
        Some(value) => value.to_str().ok()?.parse::<Authority>().ok()?,
        None => match uri.authority() {
            Some(authority) => authority.clone(),
            None => Authority::from_static("localhost"),
        },
    };

    if authority.as_str().contains(['@', '/', '?', '#']) || authority.host().is_empty() {
        return None;
    }

    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    Some(format!("http://{}{}", authority, path_and_query))
}

#[derive(Debug, Serialize)]
struct MatchBody {
    route: Option<String>,
    locale: String,
    language: String,
    params: Params,
    /// Canonical URL of the same route in every available locale.
    alternates: BTreeMap<String, String>,
}

/// Route one request and build the response.
pub fn respond(state: &AppState, request: RouteRequest) -> Response {
    let request = request.with_base_url(state.config.base_url.as_str());
    let mut registry = state.registry_for(request.host());

    let helper = Arc::new(LanguageHelper::new(registry.default_locale()));
    let translator: Arc<dyn Translator> = helper.clone();
    registry.add_translator(Some(translator));

    let mut routing = state.routes.match_request(&request, Some(&registry));
    if let Err(e) = routing.apply_to(&mut registry) {
        warn!("Could not apply locale for {}: {}", request.path(), e);
    }

    let language = content_language(&registry);

    match routing.outcome {
        Some(MatchOutcome::Redirect(redirect)) => {
            debug!("Redirecting {} to {}", request.path(), redirect.location);
            let body = format!(
                "<!DOCTYPE html><html><body><a href=\"{0}\">{0}</a></body></html>",
                redirect.location
            );
            (
                StatusCode::MOVED_PERMANENTLY,
                [
                    (header::LOCATION, redirect.location),
                    (header::CONTENT_LANGUAGE, language),
                ],
                Html(body),
            )
                .into_response()
        }
        Some(MatchOutcome::Match(route_match)) => {
            let body = MatchBody {
                route: route_match.matched_route_name().map(str::to_string),
                locale: registry.locale().to_string(),
                language: helper.language(false),
                alternates: alternates(state, &request, &registry, &route_match),
                params: route_match
                    .params()
                    .iter()
                    .filter(|(name, _)| name.as_str() != LOCALE_PARAM)
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect(),
            };
            ([(header::CONTENT_LANGUAGE, language)], Json(body)).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_LANGUAGE, language)],
            Json(serde_json::json!({ "error": "not found", "path": request.path() })),
        )
            .into_response(),
    }
}

fn alternates(
    state: &AppState,
    request: &RouteRequest,
    registry: &LocaleRegistry,
    route_match: &RouteMatch,
) -> BTreeMap<String, String> {
    let Some(name) = route_match.matched_route_name() else {
        return BTreeMap::new();
    };
    let cx = AssembleContext::new(Some(request), Some(registry));

    registry
        .available_locales()
        .into_iter()
        .filter_map(|locale| {
            let options = AssembleOptions::named(name)
                .with_locale(locale)
                .with_force_canonical(true);
            match state.routes.assemble(route_match.params(), &options, &cx) {
                Ok(url) => Some((locale.to_string(), url)),
                Err(e) => {
                    warn!("Could not assemble {} for {}: {}", name, locale, e);
                    None
                }
            }
        })
        .collect()
}
