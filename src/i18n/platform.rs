//! Host-platform locale hooks.
//!
//! `SystemLocale` is the seam through which the registry activates a locale
//! for formatting purposes and learns the process default locale.

use crate::i18n::codec;
use tracing::debug;

/// Platform-level locale facility.
pub trait SystemLocale: Send + Sync {
    /// Activate `locale` for platform formatting. Returns `false` when the
    /// platform cannot provide it.
    fn activate(&self, locale: &str) -> bool;

    /// The process default locale, if one can be determined.
    fn default_locale(&self) -> Option<String>;
}

/// System locale provider backed by `sys-locale`.
///
/// Activation asks the C library for the locale under each of its usual
/// names (`es_ES.UTF-8`, `es.UTF-8`, `es_ES`, `es`) and succeeds when any of
/// them is installed. The process-wide locale is not changed.
#[derive(Debug, Default, Copy, Clone)]
pub struct SysLocale;

impl SystemLocale for SysLocale {
    fn activate(&self, locale: &str) -> bool {
        let Some(names) = platform_names(locale) else {
            return false;
        };

        let found = names.iter().find(|name| platform_has_locale(name));
        match found {
            Some(name) => debug!("Locale {} available on the platform as {}", locale, name),
            None => debug!("Locale {} not installed on the platform", locale),
        }
        found.is_some()
    }

    fn default_locale(&self) -> Option<String> {
        sys_locale::get_locale().and_then(|raw| parse_posix_locale(&raw))
    }
}

/// Provider that activates every well-formed locale.
///
/// For hosts without installed locale data, and for tests. The default
/// locale still comes from `sys-locale`.
#[derive(Debug, Default, Copy, Clone)]
pub struct PermissiveSystemLocale;

impl SystemLocale for PermissiveSystemLocale {
    fn activate(&self, locale: &str) -> bool {
        codec::is_well_formed(locale)
    }

    fn default_locale(&self) -> Option<String> {
        SysLocale.default_locale()
    }
}

/// C library names to try for `locale`, most specific first.
///
/// # Returns
/// * `Some(names)`, e.g. `es_ES.UTF-8`, `es.UTF-8`, `es_ES`, `es` for `es-ES`
/// * `None` if `locale` is malformed
pub fn platform_names(locale: &str) -> Option<Vec<String>> {
    let language = codec::primary_language(locale).ok()?;
    let region = codec::region(locale).ok()?;

    let mut names = Vec::with_capacity(4);
    match region {
        Some(region) => {
            let posix = format!("{}_{}", language, region);
            names.push(format!("{}.UTF-8", posix));
            names.push(format!("{}.UTF-8", language));
            names.push(posix);
        }
        None => names.push(format!("{}.UTF-8", language)),
    }
    names.push(language);
    Some(names)
}

#[cfg(unix)]
fn platform_has_locale(name: &str) -> bool {
    let Ok(c_name) = std::ffi::CString::new(name) else {
        return false;
    };

    // SAFETY: `c_name` is NUL-terminated and outlives the call; a non-null
    // handle is freshly allocated and released right away.
    unsafe {
        let handle = libc::newlocale(libc::LC_ALL_MASK, c_name.as_ptr(), std::ptr::null_mut());
        if handle.is_null() {
            return false;
        }
        libc::freelocale(handle);
    }
    true
}

#[cfg(not(unix))]
fn platform_has_locale(name: &str) -> bool {
    let tag = name.split('.').next().unwrap_or_default();
    codec::is_well_formed(tag)
}

/// Parse a POSIX locale string such as `es_ES.UTF-8@euro` into canonical form.
///
/// `C` and `POSIX` carry no language and yield `None`.
pub fn parse_posix_locale(value: &str) -> Option<String> {
    let tag = value
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .trim();

    if tag.is_empty() || tag == "C" || tag == "POSIX" {
        return None;
    }

    codec::canonicalize(tag).ok()
}
