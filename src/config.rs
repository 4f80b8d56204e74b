use crate::i18n::{LocaleCatalog, LocaleRegistry, SystemLocale, Translator};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct Config {
    // Locales
    /// `LOCALE`: takes precedence over the domain map and the configured default
    pub locale_override: Option<String>,
    /// `LOCALE_DEFAULT`: default locale when no override or domain applies
    pub default_locale: Option<String>,
    /// `LOCALE_AVAILABLE`: comma-separated locales that may appear in URLs
    pub available_locales: Vec<String>,
    /// `LOCALE_DOMAINS`: `host=locale` pairs, matched against the request host
    pub domains: HashMap<String, String>,

    // Routing
    pub base_url: String,

    // Server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let domains = match std::env::var("LOCALE_DOMAINS") {
            Ok(value) => parse_domains(&value).context("Invalid LOCALE_DOMAINS")?,
            Err(_) => HashMap::new(),
        };

        Ok(Self {
            // Locales
            locale_override: non_empty_var("LOCALE"),
            default_locale: non_empty_var("LOCALE_DEFAULT"),
            available_locales: std::env::var("LOCALE_AVAILABLE")
                .map(|v| parse_list(&v))
                .unwrap_or_default(),
            domains,

            // Routing
            base_url: std::env::var("BASE_URL").unwrap_or_default(),

            // Server
            port: std::env::var("PORT")
                .ok()
                .map(|v| v.parse().context("PORT must be a valid port number"))
                .transpose()?
                .unwrap_or(8080),
        })
    }

    /// Default locale for a request to `host`.
    ///
    /// The `LOCALE` override wins. Otherwise the host is checked against the
    /// domain map from the top-level domain inward (`com`, `example.com`,
    /// `es.example.com`), the most specific hit winning. Falls back to the
    /// configured default.
    pub fn default_locale_for_host(&self, host: Option<&str>) -> Option<String> {
        if let Some(locale) = &self.locale_override {
            return Some(locale.clone());
        }

        let mut found = None;
        if let Some(host) = host {
            let host = host.to_ascii_lowercase();
            let labels: Vec<&str> = host.split('.').collect();
            for start in (0..labels.len()).rev() {
                let candidate = labels[start..].join(".");
                if let Some(locale) = self.domains.get(&candidate) {
                    debug!("Host {} matched domain {} ({})", host, candidate, locale);
                    found = Some(locale.clone());
                }
            }
        }

        found.or_else(|| self.default_locale.clone())
    }

    /// Build the locale registry for one request.
    ///
    /// Registers the available locales, then the default locale for `host`
    /// (falling back to the platform default), and attaches `translators`.
    /// Fails when any configured locale is unsupported.
    pub fn build_registry(
        &self,
        catalog: Arc<dyn LocaleCatalog>,
        system: Arc<dyn SystemLocale>,
        translators: &[Arc<dyn Translator>],
        host: Option<&str>,
    ) -> Result<LocaleRegistry> {
        let mut registry = LocaleRegistry::new(catalog, system);

        registry
            .add_locales(&self.available_locales)
            .context("Unsupported locale in LOCALE_AVAILABLE")?;

        for translator in translators {
            registry.add_translator(Some(Arc::clone(translator)));
        }

        let default_locale = self
            .default_locale_for_host(host)
            .unwrap_or_else(|| registry.default_locale().to_string());

        registry
            .add_locale(&default_locale)
            .with_context(|| format!("Unsupported default locale {}", default_locale))?;
        registry
            .set_default_locale(&default_locale)
            .with_context(|| format!("Unsupported default locale {}", default_locale))?;

        Ok(registry)
    }

    /// Check every configured locale against the catalog.
    ///
    /// Builds the registry once without a host and once per `LOCALE_DOMAINS`
    /// entry, so an unsupported locale anywhere in the configuration fails
    /// here instead of on the first request to that host.
    ///
    /// # Returns
    /// The registry used for requests whose host matches no domain.
    pub fn validate(
        &self,
        catalog: Arc<dyn LocaleCatalog>,
        system: Arc<dyn SystemLocale>,
    ) -> Result<LocaleRegistry> {
        let registry = self.build_registry(Arc::clone(&catalog), Arc::clone(&system), &[], None)?;

        for host in self.domains.keys() {
            self.build_registry(
                Arc::clone(&catalog),
                Arc::clone(&system),
                &[],
                Some(host.as_str()),
            )
            .with_context(|| format!("Invalid locale for domain {}", host))?;
        }

        Ok(registry)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Split a comma-separated list, dropping blanks.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse `host=locale` pairs separated by commas.
pub fn parse_domains(value: &str) -> Result<HashMap<String, String>> {
    parse_list(value)
        .into_iter()
        .map(|entry| {
            let (host, locale) = entry
                .split_once('=')
                .with_context(|| format!("Expected host=locale, got '{}'", entry))?;
            Ok((host.trim().to_ascii_lowercase(), locale.trim().to_string()))
        })
        .collect()
}
