//! Locale codec: canonical form, well-formedness and formatting.
//!
//! Locales are carried around as plain strings in canonical form
//! (`language` or `language-REGION`). Every function here accepts the looser
//! input form as well: any case, `-` or `_` as separator.

use crate::error::LocaleError;
use regex::Regex;
use std::sync::OnceLock;

static LOCALE_REGEX: OnceLock<Regex> = OnceLock::new();

fn locale_regex() -> &'static Regex {
    LOCALE_REGEX.get_or_init(|| {
        Regex::new(r"^([A-Za-z]{2,3})(?:[-_]([A-Za-z]{2}|[0-9]{3}))?$")
            .expect("locale pattern is valid")
    })
}

/// Split an identifier into its (lowercased language, uppercased region) parts.
fn subtags(input: &str) -> Result<(String, Option<String>), LocaleError> {
    let caps = locale_regex()
        .captures(input)
        .ok_or_else(|| LocaleError::Malformed(input.to_string()))?;

    let language = caps[1].to_ascii_lowercase();
    let region = caps.get(2).map(|r| r.as_str().to_ascii_uppercase());
    Ok((language, region))
}

/// Convert an identifier to its canonical `language[-REGION]` form.
///
/// # Example
/// ```
/// use locale_router::i18n::codec;
///
/// assert_eq!(codec::canonicalize("EN_us").unwrap(), "en-US");
/// assert_eq!(codec::canonicalize("es").unwrap(), "es");
/// ```
pub fn canonicalize(input: &str) -> Result<String, LocaleError> {
    let (language, region) = subtags(input)?;
    Ok(match region {
        Some(region) => format!("{}-{}", language, region),
        None => language,
    })
}

/// Check whether `input` is a structurally valid identifier.
pub fn is_well_formed(input: &str) -> bool {
    locale_regex().is_match(input)
}

/// Two identifiers are equivalent when their canonical forms are equal.
///
/// Malformed identifiers are never equivalent to anything.
pub fn equivalent(a: &str, b: &str) -> bool {
    match (canonicalize(a), canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Format an identifier for display, headers or URL prefixes.
///
/// With `include_region` the result is `language-REGION` (or just `language`
/// when there is no region); without it only the language is returned.
pub fn format(locale: &str, include_region: bool) -> Result<String, LocaleError> {
    if include_region {
        canonicalize(locale)
    } else {
        primary_language(locale)
    }
}

/// The lowercased language subtag.
pub fn primary_language(locale: &str) -> Result<String, LocaleError> {
    subtags(locale).map(|(language, _)| language)
}

/// The uppercased region subtag, if any.
pub fn region(locale: &str) -> Result<Option<String>, LocaleError> {
    subtags(locale).map(|(_, region)| region)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ==================== canonicalize Tests ====================

    #[test]
    fn test_canonicalize_language_only() {
        assert_eq!(canonicalize("es").unwrap(), "es");
        assert_eq!(canonicalize("ES").unwrap(), "es");
        assert_eq!(canonicalize("ast").unwrap(), "ast");
    }

    #[test]
    fn test_canonicalize_language_region() {
        assert_eq!(canonicalize("en-US").unwrap(), "en-US");
        assert_eq!(canonicalize("EN-us").unwrap(), "en-US");
        assert_eq!(canonicalize("fr_ca").unwrap(), "fr-CA");
    }

    #[test]
    fn test_canonicalize_numeric_region() {
        assert_eq!(canonicalize("es_419").unwrap(), "es-419");
    }

    #[test]
    fn test_canonicalize_rejects_malformed() {
        for input in ["", "e", "espa", "e1", "es-", "es-E", "es-ESP", "es-ES-x", "es/ES", "zh-Hans-CN"] {
            let result = canonicalize(input);
            assert_eq!(
                result,
                Err(LocaleError::Malformed(input.to_string())),
                "expected {:?} to be malformed",
                input
            );
        }
    }

    // ==================== equivalent Tests ====================

    #[test]
    fn test_equivalent_ignores_case_and_separator() {
        assert!(equivalent("en-US", "EN_us"));
        assert!(equivalent("es", "ES"));
        assert!(!equivalent("en-US", "en-GB"));
        assert!(!equivalent("en", "en-US"));
    }

    #[test]
    fn test_equivalent_malformed_is_false() {
        assert!(!equivalent("x", "x"));
    }

    // ==================== format Tests ====================

    #[test]
    fn test_format_with_and_without_region() {
        assert_eq!(format("pt_br", true).unwrap(), "pt-BR");
        assert_eq!(format("pt_br", false).unwrap(), "pt");
        assert_eq!(format("de", true).unwrap(), "de");
    }

    #[test]
    fn test_subtag_accessors() {
        assert_eq!(primary_language("ZH-tw").unwrap(), "zh");
        assert_eq!(region("ZH-tw").unwrap(), Some("TW".to_string()));
        assert_eq!(region("zh").unwrap(), None);
        assert!(is_well_formed("zh_TW"));
        assert!(!is_well_formed("zh TW"));
    }

    // ==================== Property Tests ====================

    proptest! {
        #[test]
        fn prop_canonicalize_is_idempotent(
            language in "[a-zA-Z]{2,3}",
            region in proptest::option::of("[a-zA-Z]{2}"),
            sep in "[-_]",
        ) {
            let input = match region {
                Some(r) => format!("{}{}{}", language, sep, r),
                None => language,
            };
            let once = canonicalize(&input).unwrap();
            let twice = canonicalize(&once).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_case_variants_are_equivalent(locale in "[a-z]{2}(-[A-Z]{2})?") {
            prop_assert!(equivalent(&locale, &locale.to_uppercase()));
            prop_assert!(equivalent(&locale, &locale.to_lowercase()));
        }
    }
}
