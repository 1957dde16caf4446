//! Lenient timestamp serde helpers
//!
//! Writes RFC 3339 with as many fractional digits as needed. Reads RFC 3339
//! strings or epoch milliseconds; anything else becomes the current time.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

pub fn format(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Interpret a raw JSON value as a timestamp
pub fn from_value(raw: &Value) -> DateTime<Utc> {
    let parsed = match raw {
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(DateTime::from_timestamp_millis),
        _ => None,
    };
    parsed.unwrap_or_else(|| {
        tracing::warn!(value = %raw, "Unparsable timestamp replaced with current time");
        Utc::now()
    })
}

pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(value))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    Ok(from_value(&raw))
}

/// Same rules for optional fields; `null` stays `None`
pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_some(&super::format(dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(match raw {
            Value::Null => None,
            other => Some(from_value(&other)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde::Serialize;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Stamped {
        #[serde(with = "super")]
        at: DateTime<Utc>,
        #[serde(default, with = "super::option")]
        seen: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_rfc3339_round_trip_keeps_precision() {
        let at = Utc.timestamp_nanos(1_767_225_600_123_456_789);
        let json = serde_json::to_string(&Stamped { at, seen: None }).unwrap();
        assert_eq!(json, r#"{"at":"2026-01-01T00:00:00.123456789Z","seen":null}"#);
        let back: Stamped = serde_json::from_str(&json).unwrap();
        assert_eq!(back.at, at);
    }

    #[test]
    fn test_accepts_epoch_millis() {
        let back: Stamped =
            serde_json::from_str(r#"{"at":1767225600000,"seen":1767225600500}"#).unwrap();
        assert_eq!(back.at, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(back.seen.unwrap().timestamp_subsec_millis(), 500);
    }

    #[test]
    fn test_garbage_becomes_now() {
        let before = Utc::now();
        let back: Stamped = serde_json::from_str(r#"{"at":"yesterday-ish"}"#).unwrap();
        assert!(back.at >= before);
        assert!(back.seen.is_none());

        let back: Stamped = serde_json::from_str(r#"{"at":{"nested":true},"seen":[]}"#).unwrap();
        assert!(back.at >= before);
        assert!(back.seen.unwrap() >= before);
    }
}
