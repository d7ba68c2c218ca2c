//! Signal values and the ordered fingerprint record.
//!
//! A [`SignalValue`] is one collector's observation; a [`FingerprintRecord`]
//! is the ordered set of observations from one collection pass. Order is part
//! of a record's identity: profiles register collectors in a fixed sequence
//! and the record preserves it all the way through canonicalization, so two
//! profile versions with the same signals but different order hash differently
//! on purpose.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// One named observation. Nested maps keep insertion order.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalValue {
    Str(String),
    Num(f64),
    Bool(bool),
    List(Vec<String>),
    Map(Vec<(String, SignalValue)>),
}

impl SignalValue {
    pub fn str(s: impl Into<String>) -> Self {
        SignalValue::Str(s.into())
    }

    /// Stringify for display: scalars verbatim, lists joined with `", "`,
    /// structured values JSON-encoded.
    pub fn display(&self) -> String {
        match self {
            SignalValue::Str(s) => s.clone(),
            SignalValue::Num(n) => format_number(*n),
            SignalValue::Bool(b) => b.to_string(),
            SignalValue::List(items) => items.join(", "),
            SignalValue::Map(_) => {
                crate::canonical::to_canonical_json(self, crate::canonical::CanonicalPolicy::Structured)
            }
        }
    }
}

/// Render an f64 the way JS renders a number: integral values without a
/// trailing `.0`.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl Serialize for SignalValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            SignalValue::Str(s) => serializer.serialize_str(s),
            SignalValue::Num(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
                    serializer.serialize_i64(*n as i64)
                } else {
                    serializer.serialize_f64(*n)
                }
            }
            SignalValue::Bool(b) => serializer.serialize_bool(*b),
            SignalValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            SignalValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

/// The ordered mapping from signal key to value for one collection pass.
/// Push-only during assembly; never mutated afterwards, never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FingerprintRecord {
    entries: Vec<(&'static str, SignalValue)>,
}

impl FingerprintRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &'static str, value: SignalValue) {
        self.entries.push((key, value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(&'static str, SignalValue)] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&SignalValue> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// The record as the sink consumes it: humanized key plus stringified
    /// value, in registration order.
    pub fn display_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(k, v)| (humanize_key(k), v.display()))
            .collect()
    }
}

impl Serialize for FingerprintRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Turn a camelCase signal key into a table label: a space before each
/// internal capital, first character uppercased.
pub fn humanize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if i == 0 {
            out.extend(ch.to_uppercase());
        } else {
            if ch.is_ascii_uppercase() {
                out.push(' ');
            }
            out.push(ch);
        }
    }
    out
}
