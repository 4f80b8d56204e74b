//! Locale state and validation.
//!
//! # Architecture
//!
//! - `codec`: canonical `language[-REGION]` form, well-formedness, formatting
//! - `catalog`: backing database of recognized locales with prefix fallback
//! - `platform`: platform activation hook and process default locale (`sys-locale`)
//! - `translator`: collaborators notified on locale changes, view helper
//! - `registry`: request-scoped available/default/current locale state
//!
//! # Example
//!
//! ```rust
//! use locale_router::i18n::{LocaleRegistry, PermissiveSystemLocale, StaticCatalog};
//! use std::sync::Arc;
//!
//! let mut registry = LocaleRegistry::new(
//!     Arc::new(StaticCatalog::builtin()),
//!     Arc::new(PermissiveSystemLocale),
//! );
//! registry.add_locales(["es_ES", "en"]).unwrap();
//! registry.set_default_locale("en").unwrap();
//! registry.set_locale("ES-es").unwrap();
//!
//! assert_eq!(registry.locale(), "es-ES");
//! assert!(registry.has_locale("es-ES"));
//! assert!(!registry.has_locale("es"));
//! ```

pub mod catalog;
pub mod codec;
pub mod platform;
pub mod registry;
pub mod translator;

pub use catalog::{LocaleCatalog, StaticCatalog};
pub use platform::{PermissiveSystemLocale, SysLocale, SystemLocale};
pub use registry::LocaleRegistry;
pub use translator::{LanguageHelper, Translator};
