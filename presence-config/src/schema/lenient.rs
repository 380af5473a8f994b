//! Field decoders that never fail.
//!
//! A hand-edited document often has one bad leaf. Failing the whole decode
//! would throw away every other setting, so each field falls back to its
//! type's zero value instead; the verification pass sees the raw leaf and
//! resets it to the real default.

use im::OrdMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::values::{parse_boolean, parse_integer};

/// Coerces a raw JSON scalar to text the way the document decoder does.
#[must_use]
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn boolean<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Bool(b) => b,
        Value::String(s) => parse_boolean(&s).unwrap_or_default(),
        _ => false,
    })
}

pub(crate) fn integer<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()).unwrap_or_default(),
        Value::String(s) => parse_integer(&s).unwrap_or_default(),
        _ => 0,
    })
}

pub(crate) fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(scalar_text(&Value::deserialize(d)?).unwrap_or_default())
}

pub(crate) fn optional_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(scalar_text(&Value::deserialize(d)?))
}

pub(crate) fn object<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(serde_json::from_value(Value::deserialize(d)?).unwrap_or_default())
}

pub(crate) fn optional_object<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(match Value::deserialize(d)? {
        value @ Value::Object(_) => Some(serde_json::from_value(value).unwrap_or_default()),
        _ => None,
    })
}

pub(crate) fn text_map<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<OrdMap<String, String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Object(entries) => entries
            .into_iter()
            .filter_map(|(key, value)| scalar_text(&value).map(|text| (key, text)))
            .collect(),
        _ => OrdMap::new(),
    })
}

pub(crate) fn object_map<'de, D, T>(d: D) -> Result<OrdMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default + Clone,
{
    Ok(match Value::deserialize(d)? {
        Value::Object(entries) => entries
            .into_iter()
            .map(|(key, value)| (key, serde_json::from_value(value).unwrap_or_default()))
            .collect(),
        _ => OrdMap::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Default)]
    #[serde(default)]
    struct Probe {
        #[serde(deserialize_with = "boolean")]
        flag: bool,
        #[serde(deserialize_with = "integer")]
        number: i32,
        #[serde(deserialize_with = "text")]
        label: String,
        #[serde(deserialize_with = "optional_text")]
        maybe: Option<String>,
        #[serde(deserialize_with = "text_map")]
        names: OrdMap<String, String>,
    }

    #[test]
    fn test_well_typed_values_decode() {
        let probe: Probe = serde_json::from_str(
            r#"{"flag": true, "number": 57, "label": "x", "maybe": "y", "names": {"default": "d"}}"#,
        )
        .unwrap();
        assert!(probe.flag);
        assert_eq!(probe.number, 57);
        assert_eq!(probe.label, "x");
        assert_eq!(probe.maybe.as_deref(), Some("y"));
        assert_eq!(probe.names.get("default").map(String::as_str), Some("d"));
    }

    #[test]
    fn test_stringly_values_are_accepted() {
        let probe: Probe =
            serde_json::from_str(r#"{"flag": "TRUE", "number": "41", "label": 12}"#).unwrap();
        assert!(probe.flag);
        assert_eq!(probe.number, 41);
        assert_eq!(probe.label, "12");
    }

    #[test]
    fn test_bad_values_fall_back_to_zero() {
        let probe: Probe = serde_json::from_str(
            r#"{"flag": "maybe", "number": 57.5, "label": {"a": 1}, "maybe": [], "names": 3}"#,
        )
        .unwrap();
        assert!(!probe.flag);
        assert_eq!(probe.number, 0);
        assert_eq!(probe.label, "");
        assert_eq!(probe.maybe, None);
        assert!(probe.names.is_empty());
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar_text(&Value::Bool(false)).as_deref(), Some("false"));
        assert_eq!(scalar_text(&serde_json::json!(3)).as_deref(), Some("3"));
        assert_eq!(scalar_text(&Value::Null), None);
    }
}
