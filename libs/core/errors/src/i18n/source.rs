//! Where locale message tables come from.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while building a [`LocaleCatalog`](super::LocaleCatalog).
#[derive(Error, Debug)]
pub enum LocaleError {
    #[error("Locale '{0}' is not available")]
    NotFound(String),

    #[error("Failed to read locale file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Locale '{locale}' is not a flat JSON object of strings: {source}")]
    Parse {
        locale: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Fallback locale '{0}' could not be loaded")]
    MissingFallback(String),

    #[error("A locale catalog has already been installed")]
    AlreadyInstalled,
}

/// Supplies the key → message table of a locale.
pub trait LocaleSource {
    /// Load the messages of `locale`.
    fn load_locale(&self, locale: &str) -> Result<HashMap<String, String>, LocaleError>;

    /// Locales this source can provide.
    fn available(&self) -> Result<Vec<String>, LocaleError>;
}

fn parse_messages(locale: &str, raw: &str) -> Result<HashMap<String, String>, LocaleError> {
    serde_json::from_str(raw).map_err(|source| LocaleError::Parse {
        locale: locale.to_string(),
        source,
    })
}

/// Locales compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedLocales;

impl EmbeddedLocales {
    const FILES: &'static [(&'static str, &'static str)] = &[
        ("en", include_str!("locales/en.json")),
        ("id", include_str!("locales/id.json")),
    ];
}

impl LocaleSource for EmbeddedLocales {
    fn load_locale(&self, locale: &str) -> Result<HashMap<String, String>, LocaleError> {
        let (_, raw) = Self::FILES
            .iter()
            .find(|(name, _)| *name == locale)
            .ok_or_else(|| LocaleError::NotFound(locale.to_string()))?;
        parse_messages(locale, raw)
    }

    fn available(&self) -> Result<Vec<String>, LocaleError> {
        Ok(Self::FILES
            .iter()
            .map(|(name, _)| (*name).to_string())
            .collect())
    }
}

/// Locales read from `<dir>/<locale>.json` at runtime.
#[derive(Debug, Clone)]
pub struct DirectoryLocales {
    dir: PathBuf,
}

impl DirectoryLocales {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl LocaleSource for DirectoryLocales {
    fn load_locale(&self, locale: &str) -> Result<HashMap<String, String>, LocaleError> {
        let path = self.dir.join(format!("{locale}.json"));
        let raw = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LocaleError::NotFound(locale.to_string())
            } else {
                LocaleError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;
        parse_messages(locale, &raw)
    }

    fn available(&self) -> Result<Vec<String>, LocaleError> {
        let entries = fs::read_dir(&self.dir).map_err(|source| LocaleError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut locales: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .collect();
        locales.sort();
        Ok(locales)
    }
}
