//! Lenient timestamp parsing for request bodies and query strings
//!
//! Clients send either RFC 3339 (`2030-03-01T10:00:00Z`) or a naive local
//! form without offset (`2030-03-01T10:00:00`). Naive values are read as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

pub fn parse(value: &str) -> Result<DateTime<Utc>, String> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("invalid datetime '{}'", value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

/// `Option` flavour; use together with `#[serde(default)]`.
pub mod option {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => {
                parse(&raw).map(Some).map_err(serde::de::Error::custom)
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn accepts_offset_and_naive_forms() {
        let expected = Utc.with_ymd_and_hms(2030, 3, 1, 10, 0, 0).unwrap();
        assert_eq!(parse("2030-03-01T10:00:00Z").unwrap(), expected);
        assert_eq!(parse("2030-03-01T13:00:00+03:00").unwrap(), expected);
        assert_eq!(parse("2030-03-01T10:00:00").unwrap(), expected);
        assert_eq!(parse("2030-03-01 10:00:00").unwrap(), expected);
        assert_eq!(parse("2030-03-01T10:00").unwrap(), expected);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse("tomorrow").is_err());
        assert!(parse("2030-13-01T10:00:00").is_err());
    }

    #[derive(Deserialize)]
    struct Window {
        #[serde(default, deserialize_with = "option::deserialize")]
        from: Option<DateTime<Utc>>,
    }

    #[test]
    fn optional_field_tolerates_absence() {
        let w: Window = serde_json::from_str("{}").unwrap();
        assert!(w.from.is_none());
        let w: Window = serde_json::from_str(r#"{"from": "2030-03-01T10:00:00"}"#).unwrap();
        assert!(w.from.is_some());
    }
}
