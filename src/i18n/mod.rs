//! Locale resolution and translation lookup.
//!
//! A [`LocaleResolver`] is created once per session and injected into the
//! rendering code; there is no global "current locale". [`LocaleResolver::init`]
//! resolves the locale chain, asks the [`TranslationBackend`] for the bundles
//! the [`LoadPolicy`] names, and from then on serves lookups.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | No override / default locale | Chain segment is empty |
//! | Bundle does not exist | Skipped, other bundles still load |
//! | Backend error | `init` returns [`UiError::Backend`], state unchanged |
//! | Missing key | `translate` returns the key |
//! | Map has no chain locale | `translate_from_map` returns `None` |

mod catalog;
mod chain;
mod config;

use std::collections::HashMap;
use std::future::Future;

use serde::Serialize;
use serde_json::Value;

use crate::error::{UiError, UiResult};

pub use catalog::{escape_html, interpolate, Catalog, Translation};
pub use chain::{map_translate, resolve_chain, ChainInput, ChainOutput, ResolvedLocales};
pub use config::{
    fill_resource_path, language_part, I18nConfig, InitOptions, LoadPolicy, DEFAULT_NAMESPACE,
};

/// Persisted key/value storage, a cookie jar in the browser.
pub trait LocaleStore {
    fn read(&self, name: &str) -> Option<String>;
    fn write(&mut self, name: &str, value: &str);
}

/// In-memory [`LocaleStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding a single value.
    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut store = Self::new();
        store.values.insert(name.into(), value.into());
        store
    }
}

impl LocaleStore for MemoryStore {
    fn read(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }

    fn write(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }
}

/// One bundle to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleRequest {
    pub locale: String,
    pub namespace: String,
    /// Resource path with placeholders substituted
    pub path: String,
}

/// Everything the backend needs for a (re)load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadRequest {
    pub active: String,
    pub fallbacks: Vec<String>,
    pub load: LoadPolicy,
    pub namespace: String,
    pub resource_path: String,
    pub key_separator: String,
}

impl LoadRequest {
    fn new(resolved: &ResolvedLocales, namespace: &str, config: &I18nConfig) -> Self {
        Self {
            active: resolved.active.clone(),
            fallbacks: resolved.fallbacks.clone(),
            load: config.load,
            namespace: namespace.to_string(),
            resource_path: config.resource_path.clone(),
            key_separator: config.key_separator.clone(),
        }
    }

    /// The bundles to fetch, in lookup order, without duplicates.
    pub fn bundles(&self) -> Vec<BundleRequest> {
        let mut locales = self.load.locales_for(&self.active);
        locales.extend(self.fallbacks.iter().cloned());

        let mut seen = Vec::with_capacity(locales.len());
        for locale in locales {
            if !seen.contains(&locale) {
                seen.push(locale);
            }
        }

        seen.into_iter()
            .map(|locale| BundleRequest {
                path: fill_resource_path(&self.resource_path, &locale, &self.namespace),
                namespace: self.namespace.clone(),
                locale,
            })
            .collect()
    }
}

/// Fetches translation bundles.
pub trait TranslationBackend {
    /// Fetch one bundle of a load. `Ok(None)` means the bundle does not exist.
    fn fetch(
        &self,
        load: &LoadRequest,
        bundle: &BundleRequest,
    ) -> impl Future<Output = UiResult<Option<Value>>>;
}

/// Result of [`LocaleResolver::init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// The active locale did not change; nothing was reloaded
    AlreadyResolved,
    /// Bundles were (re)loaded
    Loaded { bundles: usize },
}

/// Session-scoped locale state and translation lookups.
pub struct LocaleResolver<B, S> {
    config: I18nConfig,
    backend: B,
    store: S,
    resolved: Option<ResolvedLocales>,
    namespace: String,
    catalog: Catalog,
}

impl<B: TranslationBackend, S: LocaleStore> LocaleResolver<B, S> {
    pub fn new(config: I18nConfig, backend: B, store: S) -> Self {
        Self {
            config,
            backend,
            store,
            resolved: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            catalog: Catalog::new(),
        }
    }

    /// Resolve the locale chain and load its bundles.
    ///
    /// Returns [`InitOutcome::AlreadyResolved`] without touching the backend
    /// when the active locale is unchanged. On a backend error the previous
    /// state is kept, so calling again retries the load.
    pub async fn init(&mut self, options: &InitOptions) -> UiResult<InitOutcome> {
        let persisted = self.store.read(&self.config.cookie_name);
        let resolved = resolve_chain(options, persisted.as_deref());

        if self
            .resolved
            .as_ref()
            .is_some_and(|current| current.active == resolved.active)
        {
            tracing::debug!(locale = %resolved.active, "locale unchanged, skipping reload");
            return Ok(InitOutcome::AlreadyResolved);
        }

        let namespace = options.namespace();
        let request = LoadRequest::new(&resolved, namespace, &self.config);
        let mut catalog = Catalog::new();

        for bundle in request.bundles() {
            let fetched = self.backend.fetch(&request, &bundle).await;
            match fetched {
                Ok(Some(contents)) => catalog.insert(bundle.locale, bundle.namespace, contents),
                Ok(None) => {
                    tracing::debug!(path = %bundle.path, "bundle not found, skipping");
                }
                Err(err) => {
                    tracing::warn!(path = %bundle.path, error = %err, "bundle load failed");
                    return Err(match err {
                        UiError::Backend(_) => err,
                        other => UiError::Backend(format!("{}: {}", bundle.path, other)),
                    });
                }
            }
        }

        tracing::info!(
            locale = %resolved.active,
            fallbacks = ?resolved.fallbacks,
            bundles = catalog.len(),
            "locale initialized"
        );

        self.store.write(&self.config.cookie_name, &resolved.active);
        let loaded = catalog.len();
        self.resolved = Some(resolved);
        self.namespace = namespace.to_string();
        self.catalog = catalog;

        Ok(InitOutcome::Loaded { bundles: loaded })
    }

    /// The active locale, once [`init`](Self::init) has succeeded.
    pub fn language(&self) -> Option<&str> {
        self.resolved.as_ref().map(|r| r.active.as_str())
    }

    /// The fallback chain from the last successful [`init`](Self::init).
    pub fn fallbacks(&self) -> &[String] {
        self.resolved
            .as_ref()
            .map(|r| r.fallbacks.as_slice())
            .unwrap_or(&[])
    }

    /// Lookup order: the active locale expanded by the load policy, then the
    /// fallbacks. Empty before the first successful init.
    pub fn languages(&self) -> Vec<String> {
        self.resolved
            .as_ref()
            .map(|r| r.languages(self.config.load))
            .unwrap_or_default()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Translate `key`, interpolating `params`.
    ///
    /// A missing key yields the key itself. With `escape_output` every value
    /// in `params` is HTML-escaped before interpolation and the result is
    /// [`Translation::Escaped`]; markup in the bundle text is kept. Otherwise
    /// the values go in as given and the result is [`Translation::Raw`].
    pub fn translate(&self, key: &str, params: &[(&str, &str)], escape_output: bool) -> Translation {
        let languages = self.languages();
        let template = self
            .catalog
            .lookup(&languages, &self.namespace, key, &self.config.key_separator);

        let text = match template {
            Some(template) if escape_output => {
                let values: Vec<(&str, String)> = params
                    .iter()
                    .map(|(name, value)| (*name, escape_html(value)))
                    .collect();
                let escaped: Vec<(&str, &str)> = values
                    .iter()
                    .map(|(name, value)| (*name, value.as_str()))
                    .collect();
                interpolate(template, &escaped)
            }
            Some(template) => interpolate(template, params),
            None => key.to_string(),
        };

        if escape_output {
            Translation::Escaped(text)
        } else {
            Translation::Raw(text)
        }
    }

    /// Pick the entry of a locale-keyed map for the active locale, walking
    /// the lookup order on a miss. `None` when no locale matches.
    pub fn translate_from_map<'a>(&self, map: &'a HashMap<String, String>) -> Option<&'a str> {
        let active = self.language()?;
        map_translate(map, active, &self.languages())
    }
}
