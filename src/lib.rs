//! Locale-aware URL routing.
//!
//! A request path like `/es/page` is routed as `/page` with `es` made the
//! current locale of a request-scoped [`i18n::LocaleRegistry`]; assembling
//! the route again re-prepends the prefix unless the locale is the default.

pub mod config;
pub mod error;
pub mod i18n;
pub mod router;
pub mod server;
