//! Applying routing results to the request-scoped registry.

use crate::error::LocaleError;
use crate::i18n::{codec, LocaleRegistry};
use crate::router::{MatchOutcome, LOCALE, LOCALE_PARAM};
use tracing::debug;

/// Result of routing one request through a `LocaleAwareRouteStack`.
///
/// Routing itself does not mutate the registry; call `apply_to` with the
/// request's registry before acting on `outcome`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Routing {
    /// Locale prefix found in the request path.
    pub path_locale: Option<String>,
    /// `None` when no route matched.
    pub outcome: Option<MatchOutcome>,
}

impl Routing {
    pub fn is_redirect(&self) -> bool {
        matches!(self.outcome, Some(MatchOutcome::Redirect(_)))
    }

    /// Make the detected locales current on `registry`.
    ///
    /// The path locale is applied first and recorded as such; a locale found
    /// deeper in the route tree then takes over. On a match the `locale`
    /// parameter is set to the resulting current locale, unless a child
    /// route already captured one of its own.
    pub fn apply_to(&mut self, registry: &mut LocaleRegistry) -> Result<(), LocaleError> {
        if let Some(locale) = &self.path_locale {
            registry.set_path_locale(locale)?;
        }

        let path_locale = self.path_locale.as_deref();
        match &mut self.outcome {
            Some(MatchOutcome::Match(route_match)) => {
                if let Some(locale) = route_match.locale().map(str::to_string) {
                    if Some(locale.as_str()) != path_locale {
                        registry.set_locale(&locale)?;
                    }
                }

                if let Some(locale) = route_match.param(LOCALE_PARAM).map(str::to_string) {
                    route_match.set_param(LOCALE, codec::canonicalize(&locale)?);
                } else if route_match.param(LOCALE).is_none()
                    && (route_match.locale().is_some() || path_locale.is_some())
                {
                    route_match.set_param(LOCALE, registry.locale());
                }
            }
            Some(MatchOutcome::Redirect(redirect)) => {
                if Some(redirect.locale.as_str()) != path_locale {
                    registry.set_locale(&redirect.locale)?;
                }
            }
            None => {}
        }

        debug!("Routing applied, current locale {}", registry.locale());
        Ok(())
    }
}

/// Value for the `Content-Language` response header.
pub fn content_language(registry: &LocaleRegistry) -> String {
    let locale = registry.locale();
    codec::format(locale, true).unwrap_or_else(|_| locale.to_string())
}
