//! WASM bindings for browser widgets.

use std::collections::HashMap;

use wasm_bindgen::prelude::*;

use crate::changes_pending::{values_equivalent, ChangeTracker, Headless, PendingOptions};
use crate::i18n::{map_translate, resolve_chain, ChainOutput, I18nConfig, InitOptions};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    pub fn log(s: &str);
}

/// Initialize panic hook for better error messages.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Changes Pending WASM Bindings
// ═══════════════════════════════════════════════════════════════════════════════

/// Compare two property values, treating empty values as equivalent.
///
/// `undefined` on either side stands for an absent property.
#[wasm_bindgen(js_name = comparePropertyValues)]
pub fn compare_property_values(a: JsValue, b: JsValue) -> Result<bool, JsValue> {
    let a: Option<serde_json::Value> = serde_wasm_bindgen::from_value(a)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse value: {}", e)))?;
    let b: Option<serde_json::Value> = serde_wasm_bindgen::from_value(b)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse value: {}", e)))?;

    Ok(values_equivalent(a.as_ref(), b.as_ref()))
}

/// Check whether pending changes exist.
///
/// Takes a JsValue with `watchedObj`, `changes` and optional
/// `watchedProperties`.
#[wasm_bindgen(js_name = hasChanges)]
pub fn has_changes_js(input: JsValue) -> Result<bool, JsValue> {
    let options: PendingOptions = serde_wasm_bindgen::from_value(input)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse input: {}", e)))?;

    Ok(ChangeTracker::new(options, Headless).is_changed())
}

/// Check whether pending changes exist using a JSON string (alternative API).
#[wasm_bindgen(js_name = hasChangesJson)]
pub fn has_changes_json_js(input_json: &str) -> Result<bool, JsValue> {
    crate::has_changes_json(input_json)
        .map_err(|e| JsValue::from_str(&format!("Change check failed: {}", e)))
}

// ═══════════════════════════════════════════════════════════════════════════════
// I18n WASM Bindings
// ═══════════════════════════════════════════════════════════════════════════════

/// Resolve the locale chain.
///
/// Takes init options (`paramLang`/`overrideLocale`, `serverLang`,
/// `defaultLang`, `nameSpace`), the persisted cookie value if any, and the
/// module config. Returns `{active, fallbacks, languages}`.
#[wasm_bindgen(js_name = resolveLocaleChain)]
pub fn resolve_locale_chain(
    options: JsValue,
    persisted: Option<String>,
    config: JsValue,
) -> Result<JsValue, JsValue> {
    let options: InitOptions = serde_wasm_bindgen::from_value(options)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse options: {}", e)))?;
    let config: I18nConfig = if config.is_undefined() || config.is_null() {
        I18nConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse config: {}", e)))?
    };

    let resolved = resolve_chain(&options, persisted.as_deref());
    let output = ChainOutput::new(resolved, config.load);

    serde_wasm_bindgen::to_value(&output)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize output: {}", e)))
}

/// Resolve the locale chain using a JSON string (alternative API).
#[wasm_bindgen(js_name = resolveLocaleChainJson)]
pub fn resolve_locale_chain_json(input_json: &str) -> Result<String, JsValue> {
    crate::resolve_chain_json(input_json)
        .map_err(|e| JsValue::from_str(&format!("Locale resolution failed: {}", e)))
}

/// Pick the entry of a locale-keyed map for `active`, falling back along
/// `languages`. Returns `undefined` when nothing matches.
#[wasm_bindgen(js_name = mapTranslate)]
pub fn map_translate_js(
    map: JsValue,
    active: &str,
    languages: Vec<String>,
) -> Result<Option<String>, JsValue> {
    let map: HashMap<String, String> = serde_wasm_bindgen::from_value(map)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse map: {}", e)))?;

    Ok(map_translate(&map, active, &languages).map(str::to_string))
}
