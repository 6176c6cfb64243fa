//! Commons UI Core Library
//!
//! Cross-platform decision logic for the commons UI widget toolkit:
//! - **changes_pending**: decides whether an edit buffer differs from the
//!   saved object, ignoring empty-value noise, and drives the
//!   "changes pending" indicator
//! - **i18n**: resolves the effective locale from override, persisted,
//!   server and default sources and serves translation lookups
//!
//! Rendering, cookies and bundle fetching stay with the host, which plugs
//! them in through the [`PendingIndicator`], [`LocaleStore`] and
//! [`TranslationBackend`] traits.
//!
//! # Example (conceptual)
//! ```ignore
//! // Pending changes
//! let mut tracker = watch_changes(PendingOptions::watching(user_json), banner).await?;
//! tracker.make_changes(&edited_json);
//! if tracker.is_changed() { /* banner is visible */ }
//!
//! // Locale
//! let mut i18n = LocaleResolver::new(I18nConfig::default(), http_backend, cookies);
//! i18n.init(&InitOptions::new("en").with_default("en-US")).await?;
//! let title = i18n.translate("common.title", &[], true);
//! ```

pub mod changes_pending;
pub mod error;
pub mod i18n;

pub use changes_pending::{
    compare_property, has_changes, values_equivalent, watch_changes, ChangeTracker, Headless,
    IndicatorView, PendingIndicator, PendingOptions, WatchedObject,
};
pub use error::{UiError, UiResult};
pub use i18n::{
    resolve_chain, ChainInput, ChainOutput, I18nConfig, InitOptions, InitOutcome, LoadPolicy,
    LocaleResolver, LocaleStore, MemoryStore, ResolvedLocales, TranslationBackend, Translation,
};

// WASM bindings
#[cfg(feature = "wasm")]
pub mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::*;

/// Get the version of the commons-ui-core library.
pub fn get_core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Check a watched object against its pending edits, using JSON strings.
///
/// Input format: `{"watchedObj": {...}, "changes": {...}, "watchedProperties": [...]}`
/// with `watchedProperties` optional. Returns `true` if changes are pending.
/// Convenience function for FFI.
pub fn has_changes_json(input_json: &str) -> UiResult<bool> {
    let options: PendingOptions = serde_json::from_str(input_json)?;
    let tracker = ChangeTracker::new(options, Headless);
    Ok(tracker.is_changed())
}

/// Resolve the locale chain using JSON strings.
///
/// Input format: `{"options": {...}, "persisted": "fr", "config": {...}}` with
/// `persisted` and `config` optional. Returns
/// `{"active": ..., "fallbacks": [...], "languages": [...]}`.
/// Convenience function for FFI.
pub fn resolve_chain_json(input_json: &str) -> UiResult<String> {
    let input: ChainInput = serde_json::from_str(input_json)?;
    let resolved = resolve_chain(&input.options, input.persisted.as_deref());
    let output = ChainOutput::new(resolved, input.config.load);
    Ok(serde_json::to_string(&output)?)
}
