//! Translator collaborators notified on locale changes.
//!
//! The registry does not translate anything; it only pushes the name of the
//! active (and fallback) locale to whoever does. Both methods default to
//! no-ops, so a collaborator that only cares about one of them implements
//! just that one.

use crate::i18n::codec;
use std::sync::RwLock;

/// Receives locale changes from the registry.
pub trait Translator: Send + Sync {
    /// Called with the canonical locale whenever the current locale changes.
    fn set_locale(&self, _locale: &str) {}

    /// Called with the canonical locale whenever the default locale changes.
    fn set_fallback_locale(&self, _locale: &str) {}
}

/// View-facing "current language" accessor.
///
/// Registered as a translator so it always mirrors the registry's current
/// locale. Before the first update it reports `default_locale`.
#[derive(Debug)]
pub struct LanguageHelper {
    locale: RwLock<String>,
}

impl LanguageHelper {
    /// Create a helper reporting `default_locale` until the registry pushes
    /// a locale.
    ///
    /// # Arguments
    /// * `default_locale` - Locale identifier; `en` is used if it is malformed
    pub fn new(default_locale: &str) -> Self {
        let locale = codec::canonicalize(default_locale).unwrap_or_else(|_| "en".to_string());
        Self {
            locale: RwLock::new(locale),
        }
    }

    /// The current language, optionally with its region (`es` / `es-ES`).
    pub fn language(&self, include_region: bool) -> String {
        let locale = self
            .locale
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        codec::format(&locale, include_region).unwrap_or_else(|_| locale.clone())
    }
}

impl Translator for LanguageHelper {
    fn set_locale(&self, locale: &str) {
        if let Ok(canonical) = codec::canonicalize(locale) {
            let mut current = self
                .locale
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *current = canonical;
        }
    }
}
