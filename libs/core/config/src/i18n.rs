use crate::{env_list, env_or_default, ConfigError, FromEnv};
use core_errors::i18n::{self, DirectoryLocales, EmbeddedLocales, LocaleCatalog, DEFAULT_LOCALE};
use std::path::PathBuf;

/// Locale catalog configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct I18nConfig {
    /// Locale used when a message is missing in the requested one
    pub default_locale: String,
    /// Directory of `<locale>.json` files; embedded locales when unset
    pub locales_dir: Option<PathBuf>,
    /// Locales to load
    pub locales: Vec<String>,
}

impl I18nConfig {
    /// Build the catalog described by this configuration.
    pub fn build_catalog(&self) -> Result<LocaleCatalog, ConfigError> {
        let catalog = match &self.locales_dir {
            Some(dir) => {
                ::tracing::info!(dir = %dir.display(), "Loading locales from directory");
                LocaleCatalog::load(&DirectoryLocales::new(dir), &self.locales, &self.default_locale)?
            }
            None => LocaleCatalog::load(&EmbeddedLocales, &self.locales, &self.default_locale)?,
        };
        Ok(catalog)
    }

    /// Build the catalog and install it process-wide.
    pub fn install(&self) -> Result<(), ConfigError> {
        i18n::install(self.build_catalog()?)?;
        Ok(())
    }
}

impl FromEnv for I18nConfig {
    /// Reads from environment variables with sensible defaults:
    /// - I18N_DEFAULT_LOCALE: defaults to "en"
    /// - I18N_LOCALES_DIR: optional, embedded locales when unset
    /// - I18N_LOCALES: comma-separated, defaults to "en,id"
    fn from_env() -> Result<Self, ConfigError> {
        let default_locale = env_or_default("I18N_DEFAULT_LOCALE", DEFAULT_LOCALE);
        let locales_dir = std::env::var("I18N_LOCALES_DIR")
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);
        let locales = env_list("I18N_LOCALES", &["en", "id"]);

        Ok(Self {
            default_locale,
            locales_dir,
            locales,
        })
    }
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: DEFAULT_LOCALE.to_string(),
            locales_dir: None,
            locales: vec!["en".to_string(), "id".to_string()],
        }
    }
}
