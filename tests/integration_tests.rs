//! Integration tests for the locale router
//!
//! These tests drive the public API end to end: a request-scoped registry is
//! built, a request is routed and the result applied, and URLs are assembled
//! back, the same way the HTTP front end does it.

use axum::body::to_bytes;
use axum::http::{header, StatusCode};
use locale_router::config::{parse_domains, Config};
use locale_router::error::{LocaleError, RouteError};
use locale_router::i18n::{
    codec, LanguageHelper, LocaleCatalog, LocaleRegistry, StaticCatalog, SystemLocale, Translator,
};
use locale_router::router::{
    AssembleContext, AssembleOptions, Literal, LocaleAwareRouteStack, LocaleRouteSegment,
    MatchContext, MatchOutcome, Params, Part, Redirect, Route, RouteRequest, RouteStack, Segment,
    LOCALE,
};
use locale_router::server::{self, AppState};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ==================== Test Helpers ====================

/// Platform hook that accepts everything and remembers what was activated
#[derive(Default)]
struct RecordingSystem {
    activated: Mutex<Vec<String>>,
}

impl SystemLocale for RecordingSystem {
    fn activate(&self, locale: &str) -> bool {
        self.activated.lock().unwrap().push(locale.to_string());
        true
    }

    fn default_locale(&self) -> Option<String> {
        None
    }
}

#[derive(Default)]
struct RecordingTranslator {
    locales: Mutex<Vec<String>>,
}

impl Translator for RecordingTranslator {
    fn set_locale(&self, locale: &str) {
        self.locales.lock().unwrap().push(locale.to_string());
    }
}

/// Route that never matches and counts how often it was asked
struct CountingRoute {
    calls: Arc<AtomicUsize>,
}

impl Route for CountingRoute {
    fn match_path(&self, _cx: &MatchContext<'_>, _offset: usize) -> Option<MatchOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        None
    }

    fn assemble(
        &self,
        _params: &Params,
        _options: &AssembleOptions,
        _registry: Option<&LocaleRegistry>,
    ) -> Result<String, RouteError> {
        Ok(String::new())
    }
}

fn catalog() -> Arc<dyn LocaleCatalog> {
    Arc::new(StaticCatalog::new(["en", "en-US", "es", "es-ES", "fr", "fr-FR"]))
}

/// Registry with {es, fr, en-US} available and `fr` as default
fn registry() -> LocaleRegistry {
    let mut registry = LocaleRegistry::new(catalog(), Arc::new(RecordingSystem::default()));
    registry.add_locales(["es", "fr", "en_US"]).unwrap();
    registry.set_default_locale("fr").unwrap();
    registry
}

fn routes() -> LocaleAwareRouteStack {
    LocaleAwareRouteStack::new(
        RouteStack::new()
            .with_route("home", Literal::new("/"))
            .with_route("page", Literal::new("/page"))
            .with_route("post", Segment::new("/post/:slug"))
            // Only the shop is localized when the stack sees no prefix
            .with_route(
                "shop",
                Part::new(Literal::new("/shop"), false).with_child(
                    "localized",
                    Part::new(LocaleRouteSegment::new(), true)
                        .with_child("cart", Literal::new("cart")),
                ),
            ),
    )
}

fn request(path: &str) -> RouteRequest {
    RouteRequest::parse(&format!("http://example.com{}", path)).unwrap()
}

// ==================== Codec Tests ====================

#[test]
fn test_canonical_forms() {
    assert_eq!(codec::canonicalize("EN_us").unwrap(), "en-US");
    assert_eq!(codec::canonicalize("es-419").unwrap(), "es-419");
    assert!(codec::equivalent("es-ES", "ES_es"));
    assert!(matches!(
        codec::canonicalize("english"),
        Err(LocaleError::Malformed(_))
    ));
}

// ==================== Registry Tests ====================

#[test]
fn test_has_locale_is_exact_but_add_locale_falls_back() {
    let mut registry = LocaleRegistry::new(catalog(), Arc::new(RecordingSystem::default()));

    // Catalog only knows "es"; es-MX resolves through prefix fallback
    registry.add_locale("es").unwrap();
    assert!(!registry.has_locale("es-MX"));
    registry.add_locale("es_MX").unwrap();
    assert!(registry.has_locale("es-MX"));
}

#[test]
fn test_set_locale_activates_and_notifies() {
    let system = Arc::new(RecordingSystem::default());
    let translator = Arc::new(RecordingTranslator::default());
    let mut registry = LocaleRegistry::new(catalog(), system.clone());
    registry.add_translator(Some(translator.clone()));

    registry.set_locale("EN-us").unwrap();

    assert_eq!(registry.locale(), "en-US");
    assert_eq!(*system.activated.lock().unwrap(), vec!["en-US"]);
    assert_eq!(*translator.locales.lock().unwrap(), vec!["en-US"]);
}

#[test]
fn test_unsupported_default_keeps_previous() {
    let mut registry = registry();
    let result = registry.set_default_locale("de");
    assert_eq!(result, Err(LocaleError::Unsupported("de".to_string())));
    assert_eq!(registry.default_locale(), "fr");
}

// ==================== Routing Tests ====================

#[test]
fn test_prefixed_request_switches_locale() {
    let mut registry = registry();
    let helper = Arc::new(LanguageHelper::new(registry.default_locale()));
    registry.add_translator(Some(helper.clone()));

    let mut routing = routes().match_request(&request("/es/page"), Some(&registry));
    routing.apply_to(&mut registry).unwrap();

    let Some(MatchOutcome::Match(route_match)) = &routing.outcome else {
        panic!("expected a match, got {:?}", routing.outcome);
    };
    assert_eq!(route_match.matched_route_name(), Some("page"));
    assert_eq!(route_match.param(LOCALE), Some("es"));
    assert_eq!(registry.locale(), "es");
    assert_eq!(registry.path_locale(), Some("es"));
    assert_eq!(helper.language(true), "es");
}

#[test]
fn test_missing_trailing_slash_redirects() {
    let mut registry = registry();
    let mut routing = routes().match_request(&request("/es"), Some(&registry));

    assert!(routing.is_redirect());
    let Some(MatchOutcome::Redirect(redirect)) = &routing.outcome else {
        panic!("expected a redirect");
    };
    assert_eq!(redirect.location, "http://example.com/es/");

    routing.apply_to(&mut registry).unwrap();
    assert_eq!(registry.locale(), "es");
}

#[test]
fn test_unknown_prefix_goes_to_children() {
    let registry = registry();

    let routing = routes().match_request(&request("/xx/page"), Some(&registry));
    assert_eq!(routing.path_locale, None);
    assert!(routing.outcome.is_none());

    let routing = routes().match_request(&request("/post/es"), Some(&registry));
    let Some(MatchOutcome::Match(route_match)) = &routing.outcome else {
        panic!("expected a match");
    };
    assert_eq!(route_match.param("slug"), Some("es"));
}

#[test]
fn test_locale_segment_inside_tree() {
    let mut registry = registry();
    let mut routing = routes().match_request(&request("/shop/en-US/cart"), Some(&registry));
    assert_eq!(routing.path_locale, None);

    routing.apply_to(&mut registry).unwrap();

    let Some(MatchOutcome::Match(route_match)) = &routing.outcome else {
        panic!("expected a match");
    };
    assert_eq!(route_match.matched_route_name(), Some("shop/localized/cart"));
    assert_eq!(route_match.param(LOCALE), Some("en-US"));
    assert_eq!(registry.locale(), "en-US");
    assert_eq!(registry.path_locale(), None);
}

#[test]
fn test_nested_locale_segment_redirects() {
    let mut registry = registry();
    let mut routing = routes().match_request(&request("/shop/es?x=1"), Some(&registry));

    assert_eq!(routing.path_locale, None);
    assert_eq!(
        routing.outcome,
        Some(MatchOutcome::Redirect(Redirect {
            location: "http://example.com/shop/es/?x=1".to_string(),
            locale: "es".to_string(),
        }))
    );

    routing.apply_to(&mut registry).unwrap();
    assert_eq!(registry.locale(), "es");
}

#[test]
fn test_redirect_stops_sibling_routes() {
    let registry = registry();
    let calls = Arc::new(AtomicUsize::new(0));
    let routes = LocaleAwareRouteStack::new(
        RouteStack::new()
            .with_route(
                "shop",
                Part::new(Literal::new("/shop"), false)
                    .with_child("localized", LocaleRouteSegment::new())
                    .with_child("after", CountingRoute { calls: calls.clone() }),
            )
            .with_route("catch_all", Segment::new("/shop/:rest"))
            .with_route("counted", CountingRoute { calls: calls.clone() }),
    );

    let routing = routes.match_request(&request("/shop/es"), Some(&registry));

    assert!(routing.is_redirect());
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    // Without the redirect the same siblings are tried in order
    let routing = routes.match_request(&request("/shop/de"), Some(&registry));
    let Some(MatchOutcome::Match(route_match)) = &routing.outcome else {
        panic!("expected a match, got {:?}", routing.outcome);
    };
    assert_eq!(route_match.matched_route_name(), Some("catch_all"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

// ==================== Assembly Tests ====================

#[test]
fn test_default_locale_visibility() {
    let registry = registry();
    let cx = AssembleContext::new(None, Some(&registry));
    let routes = routes();

    let hidden = routes
        .assemble(&Params::new(), &AssembleOptions::named("page"), &cx)
        .unwrap();
    assert_eq!(hidden, "/page");

    let shown = routes
        .assemble(
            &Params::new(),
            &AssembleOptions::named("page").with_display_default_locale(true),
            &cx,
        )
        .unwrap();
    assert_eq!(shown, "/fr/page");
}

#[test]
fn test_round_trip_through_request() {
    let mut registry = registry();
    let routes = routes();
    let request = request("/en-US/post/hello");

    let mut routing = routes.match_request(&request, Some(&registry));
    routing.apply_to(&mut registry).unwrap();
    let Some(MatchOutcome::Match(route_match)) = &routing.outcome else {
        panic!("expected a match");
    };

    let cx = AssembleContext::new(Some(&request), Some(&registry));
    let url = routes
        .assemble(
            route_match.params(),
            &AssembleOptions::named("post").with_force_canonical(true),
            &cx,
        )
        .unwrap();
    assert_eq!(url, "http://example.com/en-US/post/hello");

    let spanish = routes
        .assemble(
            route_match.params(),
            &AssembleOptions::named("post").with_locale("es"),
            &cx,
        )
        .unwrap();
    assert_eq!(spanish, "/es/post/hello");
}

// ==================== Server Tests ====================

fn app_state() -> AppState {
    AppState::new(
        Config {
            default_locale: Some("en".to_string()),
            available_locales: vec!["en".to_string(), "es".to_string()],
            domains: parse_domains("example.es=es").unwrap(),
            port: 8080,
            ..Config::default()
        },
        server::demo_routes(),
        catalog(),
        Arc::new(RecordingSystem::default()),
    )
}

#[tokio::test]
async fn test_server_match_response() {
    let response = server::respond(
        &app_state(),
        RouteRequest::parse("http://localhost/es/about").unwrap(),
    );

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_LANGUAGE).unwrap(),
        "es"
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["route"], "about");
    assert_eq!(body["alternates"]["en"], "http://localhost/about");
}

#[tokio::test]
async fn test_server_redirect_and_not_found() {
    let state = app_state();

    let redirect = server::respond(&state, RouteRequest::parse("http://localhost/es").unwrap());
    assert_eq!(redirect.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        redirect.headers().get(header::LOCATION).unwrap(),
        "http://localhost/es/"
    );

    let missing = server::respond(&state, RouteRequest::parse("http://example.es/nope").unwrap());
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(missing.headers().get(header::CONTENT_LANGUAGE).unwrap(), "es");
}
