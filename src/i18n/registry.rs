//! Locale registry: available, default and current locale for one request.
//!
//! A registry is cheap to build and is meant to be created per request (or
//! per unit of work). The catalog, platform hook and translators it talks to
//! are shared behind `Arc`s; the locale state itself is never shared, so
//! concurrent requests cannot observe each other's current locale.

use crate::error::LocaleError;
use crate::i18n::catalog::{LocaleCatalog, StaticCatalog};
use crate::i18n::codec;
use crate::i18n::platform::{SysLocale, SystemLocale};
use crate::i18n::translator::Translator;
use indexmap::IndexSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Locale used when neither configuration nor the platform provide a default.
pub const FALLBACK_LOCALE: &str = "en";

pub struct LocaleRegistry {
    catalog: Arc<dyn LocaleCatalog>,
    system: Arc<dyn SystemLocale>,
    available: IndexSet<String>,
    default_locale: String,
    locale: Option<String>,
    path_locale: Option<String>,
    translators: Vec<Arc<dyn Translator>>,
}

impl LocaleRegistry {
    /// Create an empty registry backed by `catalog` and `system`.
    ///
    /// The default locale starts as the platform default (or `en`) until
    /// `set_default_locale` is called.
    pub fn new(catalog: Arc<dyn LocaleCatalog>, system: Arc<dyn SystemLocale>) -> Self {
        let default_locale = system
            .default_locale()
            .unwrap_or_else(|| FALLBACK_LOCALE.to_string());

        Self {
            catalog,
            system,
            available: IndexSet::new(),
            default_locale,
            locale: None,
            path_locale: None,
            translators: Vec::new(),
        }
    }

    /// Registry over the built-in catalog and the environment's platform hook.
    pub fn with_builtin_catalog() -> Self {
        Self::new(Arc::new(StaticCatalog::builtin()), Arc::new(SysLocale))
    }

    /// Resolve a canonical locale against the catalog, falling back to the
    /// longest matching prefix.
    fn resolve(&self, locale: &str) -> Result<String, LocaleError> {
        if self.catalog.contains(locale) {
            return Ok(locale.to_string());
        }

        match self.catalog.lookup_best_match(locale) {
            Some(found) => {
                debug!("Locale {} resolved to catalog entry {}", locale, found);
                Ok(found)
            }
            None => Err(LocaleError::Unsupported(locale.to_string())),
        }
    }

    /// Add a locale to the available set.
    ///
    /// The locale must resolve against the catalog, directly or through
    /// fallback (`es-MX` is accepted when the catalog only knows `es`). The
    /// requested canonical form is what gets stored.
    ///
    /// # Arguments
    /// * `input` - Locale identifier in any case, with `-` or `_`
    ///
    /// # Returns
    /// * `Err(LocaleError::Malformed)` if `input` is not `language[-REGION]`
    /// * `Err(LocaleError::Unsupported)` if the catalog cannot resolve it
    pub fn add_locale(&mut self, input: &str) -> Result<(), LocaleError> {
        let locale = codec::canonicalize(input)?;
        if self.available.contains(&locale) {
            return Ok(());
        }

        self.resolve(&locale)?;
        debug!("Adding available locale {}", locale);
        self.available.insert(locale);
        Ok(())
    }

    /// Add several locales. Stops at the first failure; locales added before
    /// it stay registered.
    pub fn add_locales<I, S>(&mut self, inputs: I) -> Result<(), LocaleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for input in inputs {
            self.add_locale(input.as_ref())?;
        }
        Ok(())
    }

    /// Register a translator. `None` is ignored.
    pub fn add_translator(&mut self, translator: Option<Arc<dyn Translator>>) {
        if let Some(translator) = translator {
            self.translators.push(translator);
        }
    }

    /// Get the available locales.
    ///
    /// # Returns
    /// Canonical identifiers in the order they were added.
    pub fn available_locales(&self) -> Vec<&str> {
        self.available.iter().map(String::as_str).collect()
    }

    /// Exact membership test.
    ///
    /// Unlike `add_locale` this does not apply catalog fallback: with `es`
    /// registered, `has_locale("es-MX")` is false. Path detection relies on it.
    ///
    /// # Arguments
    /// * `input` - Locale identifier in any case, with `-` or `_`
    ///
    /// # Returns
    /// `true` if the canonical form of `input` was added, `false` otherwise
    /// (including for malformed input).
    ///
    /// # Example
    /// ```
    /// use locale_router::i18n::{LocaleRegistry, PermissiveSystemLocale, StaticCatalog};
    /// use std::sync::Arc;
    ///
    /// let mut registry = LocaleRegistry::new(
    ///     Arc::new(StaticCatalog::builtin()),
    ///     Arc::new(PermissiveSystemLocale),
    /// );
    /// registry.add_locale("es").unwrap();
    ///
    /// assert!(registry.has_locale("ES"));
    /// assert!(!registry.has_locale("es-MX"));
    /// assert!(!registry.has_locale("spanish"));
    /// ```
    pub fn has_locale(&self, input: &str) -> bool {
        codec::canonicalize(input)
            .map(|locale| self.available.contains(&locale))
            .unwrap_or(false)
    }

    /// Get the default locale.
    ///
    /// # Returns
    /// The canonical default, or the platform default (else `en`) when
    /// `set_default_locale` was never called.
    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Check if `input` names the default locale, ignoring case and separator.
    pub fn is_default_locale(&self, input: &str) -> bool {
        codec::equivalent(input, &self.default_locale)
    }

    /// Set the default locale and push it to every translator as fallback.
    ///
    /// # Arguments
    /// * `input` - Locale identifier; must resolve against the catalog
    ///
    /// # Returns
    /// `Err(LocaleError)` if `input` is malformed or unsupported. On error
    /// the previous default is kept.
    pub fn set_default_locale(&mut self, input: &str) -> Result<(), LocaleError> {
        let locale = codec::canonicalize(input)?;
        self.resolve(&locale)?;

        for translator in &self.translators {
            translator.set_fallback_locale(&locale);
        }

        debug!("Default locale set to {}", locale);
        self.default_locale = locale;
        Ok(())
    }

    /// Set the current locale.
    ///
    /// The resolved catalog entry is activated on the platform; translators
    /// receive the requested canonical form.
    ///
    /// # Arguments
    /// * `input` - Locale identifier; must resolve against the catalog
    ///
    /// # Returns
    /// * `Err(LocaleError::Malformed)` or `Err(LocaleError::Unsupported)` if
    ///   `input` does not resolve
    /// * `Err(LocaleError::SystemUnavailable)` if the platform refuses it
    ///
    /// Translators are only notified on success.
    pub fn set_locale(&mut self, input: &str) -> Result<(), LocaleError> {
        let locale = codec::canonicalize(input)?;
        let resolved = self.resolve(&locale)?;

        if !self.system.activate(&resolved) {
            return Err(LocaleError::SystemUnavailable(locale));
        }

        for translator in &self.translators {
            translator.set_locale(&locale);
        }

        debug!("Current locale set to {}", locale);
        self.locale = Some(locale);
        Ok(())
    }

    /// Current locale, without initializing it. Reports the default until a
    /// locale has been set.
    pub fn locale(&self) -> &str {
        self.locale.as_deref().unwrap_or(&self.default_locale)
    }

    /// Current locale, activating the default on first access.
    pub fn get_locale(&mut self) -> Result<&str, LocaleError> {
        if self.locale.is_none() {
            let default_locale = self.default_locale.clone();
            self.set_locale(&default_locale)?;
        }
        Ok(self.locale())
    }

    /// Locale that was explicitly present in the request path, if any.
    pub fn path_locale(&self) -> Option<&str> {
        self.path_locale.as_deref()
    }

    /// Make `input` current and remember it came from the request path.
    ///
    /// # Returns
    /// The same errors as `set_locale`; the path locale is left unchanged
    /// on error.
    pub fn set_path_locale(&mut self, input: &str) -> Result<(), LocaleError> {
        self.set_locale(input)?;
        self.path_locale = self.locale.clone();
        Ok(())
    }
}

impl fmt::Debug for LocaleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleRegistry")
            .field("available", &self.available)
            .field("default_locale", &self.default_locale)
            .field("locale", &self.locale)
            .field("path_locale", &self.path_locale)
            .field("translators", &self.translators.len())
            .finish()
    }
}
