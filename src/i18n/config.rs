//! Static i18n configuration and per-session init options.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::UiResult;

/// Namespace used when the host does not name one.
pub const DEFAULT_NAMESPACE: &str = "translation";

/// How a requested locale tag maps to the bundles that get loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Exactly the requested tag (`en-US` loads `en-US`)
    Current,
    /// Region stripped (`en-US` loads `en`)
    Unspecific,
    /// Region-specific first, then unspecific (`en-US` loads `en-US`, `en`)
    #[default]
    All,
}

impl LoadPolicy {
    /// Parse the host's module setting. Unknown values select [`LoadPolicy::All`].
    pub fn from_setting(setting: &str) -> Self {
        match setting {
            "current" | "currentOnly" => LoadPolicy::Current,
            "unspecific" | "languageOnly" => LoadPolicy::Unspecific,
            _ => LoadPolicy::All,
        }
    }

    /// The locale tags this policy loads for `locale`, most specific first.
    pub fn locales_for(self, locale: &str) -> Vec<String> {
        let language = language_part(locale);
        match self {
            LoadPolicy::Current => vec![locale.to_string()],
            LoadPolicy::Unspecific => vec![language.to_string()],
            LoadPolicy::All if language != locale => {
                vec![locale.to_string(), language.to_string()]
            }
            LoadPolicy::All => vec![locale.to_string()],
        }
    }
}

impl<'de> Deserialize<'de> for LoadPolicy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let setting = String::deserialize(deserializer)?;
        Ok(LoadPolicy::from_setting(&setting))
    }
}

/// The language subtag of a locale (`"en"` for `"en-US"` or `"en_GB"`).
pub fn language_part(locale: &str) -> &str {
    locale.split(['-', '_']).next().unwrap_or(locale)
}

/// Module-level i18n configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct I18nConfig {
    /// Bundle load policy
    #[serde(default, alias = "i18nLoad")]
    pub load: LoadPolicy,
    /// Bundle path template with `{locale}` and `{namespace}` placeholders
    #[serde(default = "default_resource_path")]
    pub resource_path: String,
    /// Separates a namespace prefix from the key (`"ns:::key"`)
    #[serde(default = "default_key_separator", alias = "nsSeparator")]
    pub key_separator: String,
    /// Name of the persisted value holding the chosen locale
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

fn default_resource_path() -> String {
    "locales/{locale}/{namespace}.json".to_string()
}

fn default_key_separator() -> String {
    ":::".to_string()
}

fn default_cookie_name() -> String {
    "i18next".to_string()
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            load: LoadPolicy::default(),
            resource_path: default_resource_path(),
            key_separator: default_key_separator(),
            cookie_name: default_cookie_name(),
        }
    }
}

impl I18nConfig {
    /// Parse configuration from the host's JSON module config.
    pub fn from_json(config_json: &str) -> UiResult<Self> {
        Ok(serde_json::from_str(config_json)?)
    }
}

/// Substitute `{locale}` and `{namespace}` in a resource path template.
pub fn fill_resource_path(template: &str, locale: &str, namespace: &str) -> String {
    template
        .replace("{locale}", locale)
        .replace("{namespace}", namespace)
}

/// Locale sources for one [`LocaleResolver::init`](super::LocaleResolver::init) call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitOptions {
    /// Explicit override, may hold several space-separated tags
    #[serde(default, alias = "paramLang", alias = "locale")]
    pub override_locale: Option<String>,
    /// Locale supplied by the server
    #[serde(alias = "serverLang")]
    pub server_locale: String,
    /// Last-resort locale
    #[serde(default, alias = "defaultLang")]
    pub default_locale: Option<String>,
    /// Bundle namespace, defaults to [`DEFAULT_NAMESPACE`]
    #[serde(default, alias = "nameSpace")]
    pub namespace: Option<String>,
}

impl InitOptions {
    pub fn new(server_locale: impl Into<String>) -> Self {
        Self {
            server_locale: server_locale.into(),
            ..Self::default()
        }
    }

    pub fn with_override(mut self, locales: impl Into<String>) -> Self {
        self.override_locale = Some(locales.into());
        self
    }

    pub fn with_default(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = Some(locale.into());
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// The namespace to load, falling back to [`DEFAULT_NAMESPACE`].
    pub fn namespace(&self) -> &str {
        self.namespace
            .as_deref()
            .filter(|ns| !ns.is_empty())
            .unwrap_or(DEFAULT_NAMESPACE)
    }
}
