//! Entry declarations and their normalization.
//!
//! A build's `entry` can be written in several shapes: one specifier, a list
//! of specifiers, a mapping from entry name to either of those, or a function
//! producing any of these. [`normalize`] flattens all of them into a
//! [`NormalizedEntryMap`] from entry name to specifier.
//!
//! ```
//! use entryroot_core::entry::{normalize, EntryConfig, EntryValue};
//!
//! let entry = EntryConfig::mapping([
//!     ("main", EntryValue::from("./index.js")),
//!     ("multi", EntryValue::from(vec!["./one.js", "./two.js"])),
//! ]);
//! let normalized = normalize(&entry).unwrap();
//!
//! assert_eq!(normalized.get("main"), Some("./index.js"));
//! assert_eq!(normalized.get("./one.js"), Some("./one.js"));
//! assert_eq!(normalized.get("multi"), None);
//! ```

use crate::error::ConfigError;
use rustc_hash::FxHashMap as HashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Maximum number of nested entry functions followed before giving up.
pub const MAX_THUNK_DEPTH: usize = 32;

/// A deferred entry declaration, evaluated during normalization.
#[derive(Clone)]
pub struct EntryThunk(Arc<dyn Fn() -> EntryConfig + Send + Sync>);

impl EntryThunk {
    /// Wrap a function producing an entry declaration.
    pub fn new(f: impl Fn() -> EntryConfig + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Evaluate the function.
    #[must_use]
    pub fn call(&self) -> EntryConfig {
        (self.0)()
    }
}

impl fmt::Debug for EntryThunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EntryThunk(..)")
    }
}

/// Value side of a mapping entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValue {
    /// A single specifier, registered under the mapping key.
    Specifier(String),
    /// Several specifiers, each registered under its own text.
    Sequence(Vec<String>),
}

impl From<&str> for EntryValue {
    fn from(s: &str) -> Self {
        Self::Specifier(s.to_string())
    }
}

impl From<String> for EntryValue {
    fn from(s: String) -> Self {
        Self::Specifier(s)
    }
}

impl<S: Into<String>> From<Vec<S>> for EntryValue {
    fn from(specs: Vec<S>) -> Self {
        Self::Sequence(specs.into_iter().map(Into::into).collect())
    }
}

/// An entry declaration as supplied by the host.
#[derive(Debug, Clone)]
pub enum EntryConfig {
    /// `"./index.js"`
    Specifier(String),
    /// `["./one.js", "./two.js"]`
    Sequence(Vec<String>),
    /// `() => entry`
    Thunk(EntryThunk),
    /// `{ name: "./a.js", other: ["./b.js"] }`
    Mapping(Vec<(String, EntryValue)>),
    /// A value of some other shape (number, null, pending future, ...).
    /// Holds the shape name reported by [`normalize`].
    Unsupported(String),
}

impl EntryConfig {
    /// Build a mapping declaration.
    pub fn mapping<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<EntryValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a function declaration.
    pub fn thunk(f: impl Fn() -> EntryConfig + Send + Sync + 'static) -> Self {
        Self::Thunk(EntryThunk::new(f))
    }

    /// Declare a value of a shape entry normalization cannot handle.
    pub fn unsupported(shape: impl Into<String>) -> Self {
        Self::Unsupported(shape.into())
    }

    /// Convert a JSON value from a config file.
    ///
    /// Never fails: a value of the wrong shape becomes
    /// [`EntryConfig::Unsupported`], so the error surfaces from
    /// [`normalize`] like it would for any other host.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Specifier(s),
            Value::Array(items) => match strings(items) {
                Ok(specs) => Self::Sequence(specs),
                Err(shape) => Self::Unsupported(shape),
            },
            Value::Object(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (key, value) in map {
                    let value = match value {
                        Value::String(s) => EntryValue::Specifier(s),
                        Value::Array(items) => match strings(items) {
                            Ok(specs) => EntryValue::Sequence(specs),
                            Err(shape) => return Self::Unsupported(shape),
                        },
                        other => return Self::Unsupported(shape_of(&other).to_string()),
                    };
                    entries.push((key, value));
                }
                Self::Mapping(entries)
            }
            other => Self::Unsupported(shape_of(&other).to_string()),
        }
    }
}

impl From<&str> for EntryConfig {
    fn from(s: &str) -> Self {
        Self::Specifier(s.to_string())
    }
}

impl From<String> for EntryConfig {
    fn from(s: String) -> Self {
        Self::Specifier(s)
    }
}

impl<S: Into<String>> From<Vec<S>> for EntryConfig {
    fn from(specs: Vec<S>) -> Self {
        Self::Sequence(specs.into_iter().map(Into::into).collect())
    }
}

/// Collect an array of strings, or report the shape of the first non-string.
fn strings(items: Vec<Value>) -> Result<Vec<String>, String> {
    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            other => Err(shape_of(&other).to_string()),
        })
        .collect()
}

fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Entry name to specifier.
///
/// Keys are unique; assigning an existing key replaces its value in place.
/// Iteration follows first insertion of each key. Equality ignores order.
#[derive(Debug, Clone, Default)]
pub struct NormalizedEntryMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl NormalizedEntryMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `specifier` under `name`. Last write wins.
    pub fn insert(&mut self, name: impl Into<String>, specifier: impl Into<String>) {
        let name = name.into();
        let specifier = specifier.into();
        if let Some(&pos) = self.index.get(&name) {
            self.entries[pos].1 = specifier;
        } else {
            self.index.insert(name.clone(), self.entries.len());
            self.entries.push((name, specifier));
        }
    }

    /// Merge all entries of `other` into `self`, overwriting on collision.
    pub fn merge(&mut self, other: NormalizedEntryMap) {
        for (name, specifier) in other.entries {
            self.insert(name, specifier);
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.index
            .get(name)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, specifier)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s.as_str()))
    }

    /// Iterate specifiers only.
    pub fn specifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, s)| s.as_str())
    }
}

impl PartialEq for NormalizedEntryMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(name, spec)| other.get(name) == Some(spec))
    }
}

impl Eq for NormalizedEntryMap {}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NormalizedEntryMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, specifier) in iter {
            map.insert(name, specifier);
        }
        map
    }
}

impl Serialize for NormalizedEntryMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, specifier) in self.iter() {
            map.serialize_entry(name, specifier)?;
        }
        map.end()
    }
}

/// Flatten an entry declaration into a name → specifier map.
///
/// Functions are invoked (transitively), a lone specifier becomes a
/// self-keyed entry, and sequences register every element under its own
/// text. Mapping keys with sequence values are dropped in favor of the
/// sequence elements.
pub fn normalize(entry: &EntryConfig) -> Result<NormalizedEntryMap, ConfigError> {
    normalize_at(entry, 0)
}

fn normalize_at(entry: &EntryConfig, depth: usize) -> Result<NormalizedEntryMap, ConfigError> {
    match entry {
        EntryConfig::Mapping(entries) => {
            let mut map = NormalizedEntryMap::new();
            for (name, value) in entries {
                match value {
                    EntryValue::Sequence(specs) => map.merge(zip_self(specs)),
                    EntryValue::Specifier(spec) => map.insert(name.as_str(), spec.as_str()),
                }
            }
            Ok(map)
        }
        EntryConfig::Thunk(thunk) => {
            if depth >= MAX_THUNK_DEPTH {
                return Err(ConfigError::ThunkDepthExceeded {
                    limit: MAX_THUNK_DEPTH,
                });
            }
            normalize_at(&thunk.call(), depth + 1)
        }
        EntryConfig::Specifier(spec) => Ok(zip_self(std::slice::from_ref(spec))),
        EntryConfig::Sequence(specs) => Ok(zip_self(specs)),
        EntryConfig::Unsupported(shape) => Err(ConfigError::UnsupportedShape {
            shape: shape.clone(),
        }),
    }
}

fn zip_self(specs: &[String]) -> NormalizedEntryMap {
    specs.iter().map(|s| (s.as_str(), s.as_str())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(pairs: &[(&str, &str)]) -> NormalizedEntryMap {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_mapping_simple_values_verbatim() {
        let entry = EntryConfig::mapping([("main", "./index.js")]);
        assert_eq!(normalize(&entry).unwrap(), map(&[("main", "./index.js")]));
    }

    #[test]
    fn test_mapping_sequences_flattened() {
        let entry = EntryConfig::mapping([
            ("main", EntryValue::from("./index.js")),
            ("multi", EntryValue::from(vec!["./one.js", "./two.js"])),
        ]);

        assert_eq!(
            normalize(&entry).unwrap(),
            map(&[
                ("main", "./index.js"),
                ("./one.js", "./one.js"),
                ("./two.js", "./two.js"),
            ])
        );
    }

    #[test]
    fn test_specifier_wrapped_self_keyed() {
        let entry = EntryConfig::from("./index.js");
        assert_eq!(
            normalize(&entry).unwrap(),
            map(&[("./index.js", "./index.js")])
        );
    }

    #[test]
    fn test_thunk_of_specifier() {
        let entry = EntryConfig::thunk(|| EntryConfig::from("./index.js"));
        assert_eq!(
            normalize(&entry).unwrap(),
            normalize(&EntryConfig::from("./index.js")).unwrap()
        );
    }

    #[test]
    fn test_nested_thunks() {
        let entry = EntryConfig::thunk(|| {
            EntryConfig::thunk(|| EntryConfig::mapping([("app", "./app.js")]))
        });
        assert_eq!(normalize(&entry).unwrap(), map(&[("app", "./app.js")]));
    }

    #[test]
    fn test_self_referential_thunk_fails() {
        fn forever() -> EntryConfig {
            EntryConfig::thunk(forever)
        }

        let err = normalize(&forever()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::ThunkDepthExceeded {
                limit: MAX_THUNK_DEPTH
            }
        );
    }

    #[test]
    fn test_unsupported_shape_fails() {
        let entry = EntryConfig::unsupported("promise");
        let err = normalize(&entry).unwrap_err();
        assert_eq!(err.to_string(), "cannot handle entry value of type `promise`");
    }

    #[test]
    fn test_thunk_returning_unsupported_fails() {
        let entry = EntryConfig::thunk(|| EntryConfig::unsupported("promise"));
        assert!(normalize(&entry).is_err());
    }

    #[test]
    fn test_sequence_zipped() {
        let entry = EntryConfig::from(vec!["./one.js", "./two.js"]);
        assert_eq!(
            normalize(&entry).unwrap(),
            map(&[("./one.js", "./one.js"), ("./two.js", "./two.js")])
        );
    }

    #[test]
    fn test_duplicates_collapse() {
        let entry = EntryConfig::from(vec!["./one.js", "./one.js"]);
        assert_eq!(normalize(&entry).unwrap().len(), 1);
    }

    #[test]
    fn test_last_write_wins_keeps_first_position() {
        // The sequence registers "./a.js" first; the later key overwrites its value.
        let entry = EntryConfig::mapping([
            ("multi", EntryValue::from(vec!["./a.js", "./b.js"])),
            ("./a.js", EntryValue::from("./c.js")),
        ]);
        let normalized = normalize(&entry).unwrap();

        assert_eq!(normalized.get("./a.js"), Some("./c.js"));
        let order: Vec<_> = normalized.iter().map(|(name, _)| name).collect();
        assert_eq!(order, vec!["./a.js", "./b.js"]);
    }

    #[test]
    fn test_equality_ignores_order() {
        assert_eq!(
            map(&[("a", "1"), ("b", "2")]),
            map(&[("b", "2"), ("a", "1")])
        );
        assert_ne!(map(&[("a", "1")]), map(&[("a", "2")]));
    }

    #[test]
    fn test_from_value_shapes() {
        assert!(matches!(
            EntryConfig::from_value(json!("./index.js")),
            EntryConfig::Specifier(_)
        ));
        assert!(matches!(
            EntryConfig::from_value(json!(["./a.js"])),
            EntryConfig::Sequence(_)
        ));
        assert!(matches!(
            EntryConfig::from_value(json!({"main": "./a.js", "multi": ["./b.js"]})),
            EntryConfig::Mapping(_)
        ));
    }

    #[test]
    fn test_from_value_unsupported() {
        for (value, shape) in [
            (json!(null), "null"),
            (json!(42), "number"),
            (json!(true), "boolean"),
            (json!(["./a.js", 1]), "number"),
            (json!({"main": {"import": "./a.js"}}), "object"),
        ] {
            let err = normalize(&EntryConfig::from_value(value)).unwrap_err();
            assert_eq!(
                err,
                ConfigError::UnsupportedShape {
                    shape: shape.to_string()
                }
            );
        }
    }

    #[test]
    fn test_serialize_preserves_order() {
        let normalized = map(&[("b", "./b.js"), ("a", "./a.js")]);
        let json = serde_json::to_string(&normalized).unwrap();
        assert_eq!(json, r#"{"b":"./b.js","a":"./a.js"}"#);
    }
}
