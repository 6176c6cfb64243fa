//! Locale chain resolution.
//!
//! Priority, highest first:
//! 1. Override tokens (explicit option, else the persisted value), in the
//!    order given. The first token becomes the active locale.
//! 2. The server locale, used as the active locale only when there is no
//!    override.
//! 3. The configured default locale, always last.
//!
//! Duplicates are kept. Lookups stop at the first hit so they are harmless.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::config::{I18nConfig, InitOptions, LoadPolicy};

/// The outcome of locale resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLocales {
    /// The effective locale
    pub active: String,
    /// Fallback locales in priority order
    pub fallbacks: Vec<String>,
}

impl ResolvedLocales {
    /// Lookup order: the active locale expanded by `policy`, then the
    /// fallbacks.
    pub fn languages(&self, policy: LoadPolicy) -> Vec<String> {
        let mut languages = policy.locales_for(&self.active);
        languages.extend(self.fallbacks.iter().cloned());
        languages
    }
}

/// Input of [`resolve_chain_json`](crate::resolve_chain_json).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainInput {
    pub options: InitOptions,
    /// Persisted cookie value, if any
    #[serde(default)]
    pub persisted: Option<String>,
    #[serde(default)]
    pub config: I18nConfig,
}

/// A resolved chain together with the lookup order its load policy implies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainOutput {
    pub active: String,
    pub fallbacks: Vec<String>,
    pub languages: Vec<String>,
}

impl ChainOutput {
    pub fn new(resolved: ResolvedLocales, policy: LoadPolicy) -> Self {
        let languages = resolved.languages(policy);
        Self {
            active: resolved.active,
            fallbacks: resolved.fallbacks,
            languages,
        }
    }
}

/// Build the locale chain from init options and a persisted override.
///
/// Never fails: absent or blank optional sources contribute nothing.
pub fn resolve_chain(options: &InitOptions, persisted_override: Option<&str>) -> ResolvedLocales {
    let mut active = options.server_locale.clone();
    let mut fallbacks = Vec::new();

    let override_locale = non_blank(options.override_locale.as_deref())
        .or_else(|| non_blank(persisted_override));

    if let Some(override_locale) = override_locale {
        let mut tokens = override_locale.split_whitespace();
        if let Some(first) = tokens.next() {
            active = first.to_string();
        }
        fallbacks.extend(tokens.map(str::to_string));
    }

    if let Some(default_locale) = non_blank(options.default_locale.as_deref()) {
        fallbacks.push(default_locale.to_string());
    }

    ResolvedLocales { active, fallbacks }
}

/// Pick the entry of a locale-keyed map for the active locale, falling back
/// along `languages` in order. `None` if nothing matches.
pub fn map_translate<'a>(
    map: &'a HashMap<String, String>,
    active: &str,
    languages: &[String],
) -> Option<&'a str> {
    map.get(active)
        .or_else(|| languages.iter().find_map(|locale| map.get(locale)))
        .map(String::as_str)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
