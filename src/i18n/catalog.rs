//! Loaded translation bundles and key lookup.
//!
//! Bundles are JSON documents, one per locale and namespace. Keys address
//! nested objects with `.` (`"common.save"` finds `{"common": {"save": ..}}`);
//! a flat key containing dots is tried when the nested walk fails.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

/// Placeholder delimiters recognized by [`interpolate`].
const PLACEHOLDERS: [(&str, &str); 2] = [("{{", "}}"), ("__", "__")];

/// Translation bundles keyed by locale and namespace.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    bundles: HashMap<(String, String), Value>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the bundle for a locale and namespace.
    pub fn insert(&mut self, locale: impl Into<String>, namespace: impl Into<String>, bundle: Value) {
        self.bundles.insert((locale.into(), namespace.into()), bundle);
    }

    /// Number of loaded bundles.
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Look up `key` following `languages` in order.
    ///
    /// A key of the form `"ns<separator>rest"` is looked up in namespace
    /// `ns`; other keys use `namespace`.
    pub fn lookup(
        &self,
        languages: &[String],
        namespace: &str,
        key: &str,
        key_separator: &str,
    ) -> Option<&str> {
        let (namespace, key) = match key.split_once(key_separator) {
            Some((ns, rest)) if !key_separator.is_empty() => (ns, rest),
            _ => (namespace, key),
        };

        languages.iter().find_map(|locale| {
            self.bundles
                .get(&(locale.clone(), namespace.to_string()))
                .and_then(|bundle| find_entry(bundle, key))
        })
    }
}

fn find_entry<'a>(bundle: &'a Value, key: &str) -> Option<&'a str> {
    let nested = key
        .split('.')
        .try_fold(bundle, |node, segment| node.get(segment));
    nested
        .and_then(Value::as_str)
        .or_else(|| bundle.get(key).and_then(Value::as_str))
}

/// Replace `{{name}}` and `__name__` placeholders from `params`.
///
/// Single pass: substituted values are not scanned again. Placeholders with
/// no matching parameter are left as they are.
pub fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    'scan: while !rest.is_empty() {
        for (open, close) in PLACEHOLDERS {
            let Some(after_open) = rest.strip_prefix(open) else {
                continue;
            };
            let Some(end) = after_open.find(close) else {
                continue;
            };
            let name = after_open[..end].trim();
            if let Some((_, value)) = params.iter().find(|(param, _)| *param == name) {
                result.push_str(value);
                rest = &after_open[end + close.len()..];
                continue 'scan;
            }
        }

        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            result.push(ch);
        }
        rest = chars.as_str();
    }

    result
}

/// Escape text for embedding in HTML.
pub fn escape_html(text: &str) -> String {
    v_htmlescape::escape(text).to_string()
}

/// A translated string and how it must be embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// Safe to embed: interpolated values were escaped, markup from the
    /// bundle is kept
    Escaped(String),
    /// Interpolated as is; the template layer escapes all of it
    Raw(String),
}

impl Translation {
    /// The interpolated text.
    pub fn as_str(&self) -> &str {
        match self {
            Translation::Escaped(text) | Translation::Raw(text) => text,
        }
    }

    pub fn is_escaped(&self) -> bool {
        matches!(self, Translation::Escaped(_))
    }

    /// The text as it should appear in HTML output.
    pub fn to_html(&self) -> String {
        match self {
            Translation::Escaped(text) => text.clone(),
            Translation::Raw(text) => escape_html(text),
        }
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}
