//! Text normalization for case and diacritic insensitive comparisons.
//!
//! `normalize_text` is pure. `Normalizer` adds an optional memo table keyed by
//! the input string; the table belongs to whoever owns the normalizer, so two
//! engines never share it.

use crate::value::Value;
use dashmap::DashMap;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fold a string to its canonical comparison form.
///
/// Trims, lower-cases, strips diacritics and turns every run of whitespace
/// or dashes into a single dash. Leading and trailing dashes are dropped.
pub fn normalize_text(input: &str) -> String {
    // Lower-casing first erases camelCase boundaries, so "JavaScript" folds
    // to "javascript" and never gains a dash.
    let folded: String = input
        .trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    let mut out = String::with_capacity(folded.len());
    let mut pending_dash = false;
    for c in folded.chars() {
        if c.is_whitespace() || c == '-' {
            pending_dash = true;
            continue;
        }
        if pending_dash && !out.is_empty() {
            out.push('-');
        }
        pending_dash = false;
        out.push(c);
    }
    out
}

/// Normalize every string inside a value without a cache
pub fn normalize_value(value: &Value) -> Value {
    Normalizer::uncached().normalize(value)
}

/// Recursive value normalizer with an optional memo table
pub struct Normalizer {
    cache: Option<DashMap<String, String>>,
}

impl Normalizer {
    /// Create a normalizer that memoizes folded strings.
    ///
    /// Entries are never evicted; the table lives as long as the normalizer
    /// and can be emptied with [`Normalizer::clear_cache`].
    pub fn new() -> Self {
        Self {
            cache: Some(DashMap::new()),
        }
    }

    /// Create a normalizer that never caches
    pub fn uncached() -> Self {
        Self { cache: None }
    }

    /// Normalize a single string, consulting the cache when enabled
    pub fn text(&self, input: &str) -> String {
        let Some(cache) = &self.cache else {
            return normalize_text(input);
        };
        if let Some(hit) = cache.get(input) {
            return hit.value().clone();
        }
        let folded = normalize_text(input);
        cache.insert(input.to_string(), folded.clone());
        folded
    }

    /// Normalize strings inside `value`, keeping its container shape.
    ///
    /// Object and map keys are left untouched.
    pub fn normalize(&self, value: &Value) -> Value {
        match value {
            Value::String(s) => Value::String(self.text(s)),
            Value::Array(items) => Value::Array(items.iter().map(|v| self.normalize(v)).collect()),
            Value::Set(items) => Value::set(items.iter().map(|v| self.normalize(v))),
            Value::Map(entries) => Value::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), self.normalize(v)))
                    .collect(),
            ),
            Value::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), self.normalize(v)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Number of memoized strings
    pub fn cached_len(&self) -> usize {
        self.cache.as_ref().map_or(0, |c| c.len())
    }

    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}
