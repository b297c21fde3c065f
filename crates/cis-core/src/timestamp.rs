//! Serde helpers for CIS timestamps.
//!
//! Endpoints disagree on timestamp formats: some emit RFC 3339 with a zone
//! (`2014-01-01T05:20:00.12345Z`), others a zone-less local form
//! (`2019-01-01T12:00:00`). Zone-less values are read as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parse a timestamp in either RFC 3339 or zone-less form.
///
/// # Errors
///
/// Returns the chrono parse error of the zone-less attempt when neither form matches.
pub fn parse(input: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(input, NAIVE_FORMAT).map(|naive| naive.and_utc())
}

/// `#[serde(with = "cis_core::timestamp::option")]` for `Option<DateTime<Utc>>` fields.
pub mod option {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Serialize as RFC 3339.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::ref_option)]
    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize from RFC 3339 or zone-less form.
    ///
    /// # Errors
    ///
    /// Fails when a present value matches neither format.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") => Ok(None),
            Some(value) => super::parse(value)
                .map(Some)
                .map_err(|err| de::Error::custom(format!("invalid timestamp `{value}`: {err}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Stamped {
        #[serde(default, skip_serializing_if = "Option::is_none", with = "option")]
        created_on: Option<DateTime<Utc>>,
    }

    #[test]
    fn parses_rfc3339_with_fraction() {
        let ts = parse("2014-01-01T05:20:00.12345Z").unwrap();
        assert_eq!(ts.year(), 2014);
        assert_eq!(ts.hour(), 5);
        assert_eq!(ts.nanosecond(), 123_450_000);
    }

    #[test]
    fn parses_zone_less_as_utc() {
        let ts = parse("2019-01-01T12:00:00").unwrap();
        assert_eq!(ts.hour(), 12);
        assert_eq!(ts.to_rfc3339(), "2019-01-01T12:00:00+00:00");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse("yesterday").is_err());
    }

    #[test]
    fn option_field_handles_missing_and_present() {
        let missing: Stamped = serde_json::from_str("{}").unwrap();
        assert!(missing.created_on.is_none());

        let null: Stamped = serde_json::from_str(r#"{"created_on": null}"#).unwrap();
        assert!(null.created_on.is_none());

        let present: Stamped =
            serde_json::from_str(r#"{"created_on": "2019-01-01T12:00:00"}"#).unwrap();
        let json = serde_json::to_string(&present).unwrap();
        assert_eq!(json, r#"{"created_on":"2019-01-01T12:00:00Z"}"#);
    }

    #[test]
    fn option_field_reports_bad_value() {
        let err = serde_json::from_str::<Stamped>(r#"{"created_on": "soon"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid timestamp"));
    }
}
