//! Deterministic record serialization.
//!
//! The canonical form is a JSON object in collector-registration order. Equal
//! records always canonicalize to identical strings; the serializer never
//! sorts keys, touches wall-clock state, or fails.
//!
//! Two policies exist because the widget's history has two generations of
//! scripts: the legacy generation stored list-valued signals (fonts) as one
//! `", "`-joined string, the newer generation keeps them as arrays. A profile
//! picks one policy and sticks with it; mixing policies across runs of the
//! same profile would change the digest for an unchanged device.

use crate::signal::{format_number, FingerprintRecord, SignalValue};

/// Fixed delimiter for list values under [`CanonicalPolicy::JoinedLists`].
pub const LIST_DELIMITER: &str = ", ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalPolicy {
    /// Lists collapse to a single delimiter-joined JSON string (legacy).
    JoinedLists,
    /// Lists serialize as JSON arrays.
    Structured,
}

/// Serialize a record to its canonical string.
pub fn canonicalize(record: &FingerprintRecord, policy: CanonicalPolicy) -> String {
    let mut out = String::with_capacity(record.len() * 24);
    out.push('{');
    for (i, (key, value)) in record.entries().iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_string(&mut out, key);
        out.push(':');
        write_value(&mut out, value, policy);
    }
    out.push('}');
    out
}

/// Serialize a single value with the canonical rules. Used by the display
/// path for structured values so table output matches the canonical order.
pub fn to_canonical_json(value: &SignalValue, policy: CanonicalPolicy) -> String {
    let mut out = String::new();
    write_value(&mut out, value, policy);
    out
}

fn write_value(out: &mut String, value: &SignalValue, policy: CanonicalPolicy) {
    match value {
        SignalValue::Str(s) => write_string(out, s),
        SignalValue::Num(n) => {
            if n.is_finite() {
                out.push_str(&format_number(*n));
            } else {
                out.push_str("null");
            }
        }
        SignalValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        SignalValue::List(items) => match policy {
            CanonicalPolicy::JoinedLists => write_string(out, &items.join(LIST_DELIMITER)),
            CanonicalPolicy::Structured => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    write_string(out, item);
                }
                out.push(']');
            }
        },
        SignalValue::Map(entries) => {
            out.push('{');
            for (i, (k, v)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(out, k);
                out.push(':');
                write_value(out, v, policy);
            }
            out.push('}');
        }
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> FingerprintRecord {
        let mut record = FingerprintRecord::new();
        record.push("screenResolution", SignalValue::str("1920x1080"));
        record.push("colorDepth", SignalValue::Num(24.0));
        record.push("touchSupport", SignalValue::Bool(false));
        record.push(
            "installedFonts",
            SignalValue::List(vec!["Arial".into(), "Georgia".into()]),
        );
        record
    }

    #[test]
    fn joined_policy_flattens_lists() {
        let canonical = canonicalize(&sample_record(), CanonicalPolicy::JoinedLists);
        assert_eq!(
            canonical,
            r#"{"screenResolution":"1920x1080","colorDepth":24,"touchSupport":false,"installedFonts":"Arial, Georgia"}"#
        );
    }

    #[test]
    fn structured_policy_keeps_arrays() {
        let canonical = canonicalize(&sample_record(), CanonicalPolicy::Structured);
        assert!(canonical.contains(r#""installedFonts":["Arial","Georgia"]"#));
    }

    #[test]
    fn nested_maps_serialize_in_insertion_order() {
        let mut record = FingerprintRecord::new();
        record.push(
            "webglFingerprint",
            SignalValue::Map(vec![
                ("vendor".into(), SignalValue::str("Acme")),
                ("renderer".into(), SignalValue::str("Acme GPU")),
                ("imageHash".into(), SignalValue::str("abcd")),
            ]),
        );
        let canonical = canonicalize(&record, CanonicalPolicy::Structured);
        assert_eq!(
            canonical,
            r#"{"webglFingerprint":{"vendor":"Acme","renderer":"Acme GPU","imageHash":"abcd"}}"#
        );
    }

    #[test]
    fn strings_are_escaped() {
        let mut record = FingerprintRecord::new();
        record.push("platform", SignalValue::str("a\"b\\c\n"));
        let canonical = canonicalize(&record, CanonicalPolicy::Structured);
        assert_eq!(canonical, r#"{"platform":"a\"b\\c\n"}"#);
    }

    #[test]
    fn canonicalize_is_pure() {
        let record = sample_record();
        let a = canonicalize(&record, CanonicalPolicy::JoinedLists);
        let b = canonicalize(&record, CanonicalPolicy::JoinedLists);
        assert_eq!(a, b);
    }
}
