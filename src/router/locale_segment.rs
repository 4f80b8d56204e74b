//! Route node for a single `/<locale>/` path prefix.
//!
//! Used as the parent of a `Part` when only part of a route tree is
//! localized. An unrecognised first segment is not an error: the node then
//! matches just the leading `/` and lets its children deal with the rest.

use crate::error::RouteError;
use crate::i18n::{codec, LocaleRegistry};
use crate::router::{
    AssembleOptions, MatchContext, MatchOutcome, Params, Redirect, Route, RouteMatch,
    LOCALE_PARAM,
};
use tracing::debug;

/// Shortest legal locale identifier (`es`).
const MIN_LOCALE_LENGTH: usize = 2;

#[derive(Debug, Clone, Default)]
pub struct LocaleRouteSegment {
    defaults: Params,
}

impl LocaleRouteSegment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    fn root_match(&self, length: usize) -> Option<MatchOutcome> {
        Some(MatchOutcome::Match(RouteMatch::new(
            self.defaults.clone(),
            length,
        )))
    }
}

impl Route for LocaleRouteSegment {
    fn match_path(&self, cx: &MatchContext<'_>, offset: usize) -> Option<MatchOutcome> {
        let rest = cx.request.path().get(offset..)?;

        if rest.is_empty() {
            return self.root_match(0);
        }
        if !rest.starts_with('/') {
            return None;
        }
        if rest == "/" {
            return self.root_match(1);
        }

        let Some(registry) = cx.registry else {
            return self.root_match(1);
        };

        let segment_end = rest[1..].find('/').map(|idx| idx + 1);
        let segment = &rest[1..segment_end.unwrap_or(rest.len())];

        if segment.len() < MIN_LOCALE_LENGTH {
            return None;
        }

        if !registry.has_locale(segment) {
            debug!("Path segment {:?} is not a registered locale", segment);
            return self.root_match(1);
        }

        // has_locale succeeded, so the segment is well formed.
        let locale = codec::canonicalize(segment).ok()?;

        if segment_end.is_none() {
            debug!("Locale segment {} lacks a trailing slash, redirecting", segment);
            return Some(MatchOutcome::Redirect(Redirect {
                location: cx.request.with_trailing_slash(),
                locale,
            }));
        }

        let mut params = self.defaults.clone();
        params.insert(LOCALE_PARAM.to_string(), locale.clone());

        // Leading and trailing slash.
        let length = segment.len() + 2;
        Some(MatchOutcome::Match(
            RouteMatch::new(params, length).with_locale(locale),
        ))
    }

    fn assemble(
        &self,
        _params: &Params,
        options: &AssembleOptions,
        registry: Option<&LocaleRegistry>,
    ) -> Result<String, RouteError> {
        let Some(registry) = registry else {
            return Ok("/".to_string());
        };

        let locale = options.locale.as_deref().unwrap_or(registry.locale());

        if !registry.is_default_locale(locale) || options.display_default_locale {
            return Ok(format!("/{}/", codec::format(locale, true)?));
        }

        Ok("/".to_string())
    }
}
