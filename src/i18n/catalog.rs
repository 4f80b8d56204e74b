//! Locale catalog: the backing database of recognized locales.
//!
//! The registry never decides on its own whether a locale exists; it asks a
//! `LocaleCatalog`. The built-in catalog carries the common ICU locales, and
//! tests (or deployments with their own data) can supply a custom one.

use crate::i18n::codec;
use indexmap::IndexSet;
use tracing::debug;

/// Read-only view of the locales the host platform knows about.
pub trait LocaleCatalog: Send + Sync {
    /// Every locale in the catalog, in canonical form.
    fn list_available(&self) -> Vec<String>;

    /// Whether the canonical `locale` is present as-is.
    fn contains(&self, locale: &str) -> bool;

    /// Best match for `requested` by longest-prefix fallback.
    fn lookup_best_match(&self, requested: &str) -> Option<String> {
        lookup(&self.list_available(), requested)
    }
}

/// Longest-prefix lookup of `requested` among `candidates`.
///
/// Tries the full `language-REGION` tag first and then the bare language.
/// Candidates and the request are compared in canonical form.
///
/// # Arguments
/// * `candidates` - Locale identifiers to search, in any input form
/// * `requested` - The locale being looked up
///
/// # Returns
/// * `Some(candidate)` for the first candidate equivalent to the longest
///   matching prefix, as written in `candidates`
/// * `None` if nothing matches or `requested` is malformed
pub fn lookup<S: AsRef<str>>(candidates: &[S], requested: &str) -> Option<String> {
    let mut tag = codec::canonicalize(requested).ok()?;

    loop {
        if let Some(found) = candidates
            .iter()
            .map(AsRef::as_ref)
            .find(|candidate| codec::equivalent(candidate, &tag))
        {
            debug!("Catalog lookup for {} matched {}", requested, found);
            return Some(found.to_string());
        }

        match tag.rfind('-') {
            Some(idx) => tag.truncate(idx),
            None => return None,
        }
    }
}

/// Catalog backed by an in-memory set of canonical identifiers.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    locales: IndexSet<String>,
}

impl StaticCatalog {
    /// Build a catalog from identifiers in any input form.
    ///
    /// Malformed entries are skipped.
    pub fn new<I, S>(locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let locales = locales
            .into_iter()
            .filter_map(|locale| codec::canonicalize(locale.as_ref()).ok())
            .collect();
        Self { locales }
    }

    /// Catalog of common ICU locales.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_LOCALES.iter().copied())
    }

    /// Number of distinct locales in the catalog.
    pub fn len(&self) -> usize {
        self.locales.len()
    }

    /// Check if the catalog holds no locales.
    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }
}

impl LocaleCatalog for StaticCatalog {
    fn list_available(&self) -> Vec<String> {
        self.locales.iter().cloned().collect()
    }

    fn contains(&self, locale: &str) -> bool {
        self.locales.contains(locale)
    }

    fn lookup_best_match(&self, requested: &str) -> Option<String> {
        let mut tag = codec::canonicalize(requested).ok()?;
        loop {
            if self.locales.contains(&tag) {
                return Some(tag);
            }
            match tag.rfind('-') {
                Some(idx) => tag.truncate(idx),
                None => return None,
            }
        }
    }
}

const BUILTIN_LOCALES: &[&str] = &[
    "af", "af_ZA", "am", "am_ET", "ar", "ar_AE", "ar_EG", "ar_JO", "ar_MA", "ar_SA", "ar_SY",
    "az", "be", "be_BY", "bg", "bg_BG", "bn", "bn_BD", "bn_IN", "bs", "ca", "ca_ES", "cs",
    "cs_CZ", "cy", "cy_GB", "da", "da_DK", "de", "de_AT", "de_CH", "de_DE", "el", "el_GR",
    "en", "en_AU", "en_CA", "en_GB", "en_IE", "en_IN", "en_NZ", "en_US", "en_ZA", "es",
    "es_419", "es_AR", "es_CL", "es_CO", "es_ES", "es_MX", "es_PE", "es_US", "et", "et_EE",
    "eu", "fa", "fa_IR", "fi", "fi_FI", "fil", "fr", "fr_BE", "fr_CA", "fr_CH", "fr_FR", "ga",
    "gl", "gl_ES", "gu", "he", "he_IL", "hi", "hi_IN", "hr", "hr_HR", "hu", "hu_HU", "hy", "id",
    "id_ID", "is", "it", "it_CH", "it_IT", "ja", "ja_JP", "ka", "kk", "km", "kn", "ko", "ko_KR",
    "lt", "lt_LT", "lv", "lv_LV", "mk", "ml", "mn", "mr", "ms", "ms_MY", "mt", "my", "nb",
    "nb_NO", "ne", "nl", "nl_BE", "nl_NL", "nn", "pa", "pl", "pl_PL", "pt", "pt_BR", "pt_PT",
    "ro", "ro_RO", "ru", "ru_RU", "ru_UA", "si", "sk", "sk_SK", "sl", "sl_SI", "sq", "sr",
    "sv", "sv_SE", "sw", "ta", "te", "th", "th_TH", "tr", "tr_TR", "uk", "uk_UA", "ur", "uz",
    "vi", "vi_VN", "zh", "zh_CN", "zh_HK", "zh_SG", "zh_TW", "zu",
];
