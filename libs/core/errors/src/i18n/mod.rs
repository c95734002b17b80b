//! Locale catalog with fallback.
//!
//! Lookup order for `translate(locale, key)`:
//! 1. the exact locale (`id-ID`)
//! 2. its primary language (`id`)
//! 3. the catalog's fallback locale (`en` by default)
//! 4. the key itself
//!
//! A catalog is built once and never mutated afterwards. Services install one
//! at startup with [`install`]; code that runs before that (or in tests) gets
//! the embedded catalog from [`catalog`].

mod source;

pub use source::{DirectoryLocales, EmbeddedLocales, LocaleError, LocaleSource};

use std::collections::HashMap;

use once_cell::sync::OnceCell;

/// Locale used when nothing better is known.
pub const DEFAULT_LOCALE: &str = "en";

/// Key → message tables for a set of locales.
#[derive(Debug, Clone)]
pub struct LocaleCatalog {
    messages: HashMap<String, HashMap<String, String>>,
    fallback: String,
}

/// Lowercase a locale tag and use `-` as the subtag separator.
pub fn normalize_locale(locale: &str) -> String {
    locale.trim().replace('_', "-").to_ascii_lowercase()
}

/// Primary language subtag: `"pt-br"` → `"pt"`.
pub fn base_language(locale: &str) -> &str {
    locale.split('-').next().unwrap_or(locale)
}

impl LocaleCatalog {
    pub fn new(fallback: &str) -> Self {
        Self {
            messages: HashMap::new(),
            fallback: normalize_locale(fallback),
        }
    }

    /// Add (or replace) the messages of one locale.
    pub fn with_locale(mut self, locale: &str, messages: HashMap<String, String>) -> Self {
        self.messages.insert(normalize_locale(locale), messages);
        self
    }

    /// Load `locales` from `source`.
    ///
    /// Locales that fail to load are logged and skipped. The fallback locale
    /// is always loaded and must succeed.
    pub fn load<S, I, L>(source: &S, locales: I, fallback: &str) -> Result<Self, LocaleError>
    where
        S: LocaleSource + ?Sized,
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let fallback_messages = source.load_locale(fallback).map_err(|e| {
            tracing::error!(locale = fallback, error = %e, "Failed to load fallback locale");
            LocaleError::MissingFallback(fallback.to_string())
        })?;

        let mut catalog = Self::new(fallback).with_locale(fallback, fallback_messages);

        for locale in locales {
            let locale = locale.as_ref();
            if catalog.messages.contains_key(&normalize_locale(locale)) {
                continue;
            }
            match source.load_locale(locale) {
                Ok(messages) => {
                    tracing::debug!(locale, keys = messages.len(), "Loaded locale");
                    catalog = catalog.with_locale(locale, messages);
                }
                Err(e) => {
                    tracing::warn!(locale, error = %e, "Skipping locale that failed to load");
                }
            }
        }

        Ok(catalog)
    }

    /// Load every locale `source` lists.
    pub fn load_all<S>(source: &S, fallback: &str) -> Result<Self, LocaleError>
    where
        S: LocaleSource + ?Sized,
    {
        let locales = source.available()?;
        Self::load(source, locales, fallback)
    }

    /// Catalog built from the locales compiled into this crate.
    pub fn embedded() -> Self {
        Self::load_all(&EmbeddedLocales, DEFAULT_LOCALE).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Embedded locales are unusable");
            Self::new(DEFAULT_LOCALE)
        })
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Loaded locale tags, sorted.
    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self.messages.keys().map(String::as_str).collect();
        locales.sort_unstable();
        locales
    }

    /// True when `locale` or its primary language is loaded.
    pub fn supports(&self, locale: &str) -> bool {
        self.resolve_locale(locale).is_some()
    }

    /// Loaded locale tag that serves `locale`, if any.
    pub fn resolve_locale(&self, locale: &str) -> Option<&str> {
        let locale = normalize_locale(locale);
        if let Some((tag, _)) = self.messages.get_key_value(&locale) {
            return Some(tag.as_str());
        }
        self.messages
            .get_key_value(base_language(&locale))
            .map(|(tag, _)| tag.as_str())
    }

    /// Message for `key` in `locale` without fallback.
    pub fn lookup(&self, locale: &str, key: &str) -> Option<&str> {
        let tag = self.resolve_locale(locale)?;
        self.messages
            .get(tag)
            .and_then(|messages| messages.get(key))
            .map(String::as_str)
    }

    /// Localized message for `key`; never fails.
    pub fn translate(&self, locale: &str, key: &str) -> String {
        self.lookup(locale, key)
            .or_else(|| self.lookup(&self.fallback, key))
            .unwrap_or(key)
            .to_string()
    }

    /// Translate `key` and substitute `{name}` placeholders from `params`.
    pub fn translate_with(&self, locale: &str, key: &str, params: &[(&str, &str)]) -> String {
        format_message(&self.translate(locale, key), params)
    }
}

impl Default for LocaleCatalog {
    fn default() -> Self {
        Self::embedded()
    }
}

/// Replace each `{name}` in `template` with its value from `params`.
///
/// Unknown placeholders are left as they are.
pub fn format_message(template: &str, params: &[(&str, &str)]) -> String {
    params
        .iter()
        .fold(template.to_string(), |message, (name, value)| {
            message.replace(&format!("{{{name}}}"), value)
        })
}

static CATALOG: OnceCell<LocaleCatalog> = OnceCell::new();

/// Install the process-wide catalog. Only the first call succeeds.
pub fn install(catalog: LocaleCatalog) -> Result<(), LocaleError> {
    let locales = catalog.locales().join(",");
    CATALOG
        .set(catalog)
        .map_err(|_| LocaleError::AlreadyInstalled)?;
    tracing::info!(locales = %locales, "Locale catalog installed");
    Ok(())
}

/// The process-wide catalog.
///
/// Falls back to [`LocaleCatalog::embedded`] (with a one-time warning) when
/// nothing was installed.
pub fn catalog() -> &'static LocaleCatalog {
    CATALOG.get_or_init(|| {
        tracing::warn!("No locale catalog installed, using embedded locales");
        LocaleCatalog::embedded()
    })
}

/// Translate with the process-wide catalog.
pub fn translate(locale: &str, key: &str) -> String {
    catalog().translate(locale, key)
}
