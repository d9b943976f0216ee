//! Data models mirroring the service's JSON resources.
//!
//! These are plain validated records: shape constraints live in the serde
//! derives, behavior lives in [`crate::Client`]. Timestamps are typed as
//! [`DateTime<Utc>`] and go over the wire in the one form the service
//! accepts, `YYYY-MM-DDTHH:MM:SSZ` (see [`zulu`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Strict `YYYY-MM-DDTHH:MM:SSZ` timestamp (de)serialization.
///
/// Deserialization rejects every other form, including otherwise valid
/// RFC 3339 offsets such as `+00:00`.
pub mod zulu {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

    pub fn serialize<S>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}

/// Measurement scale of an observation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    Nominal,
    Interval,
    Ordinal,
    Ratio,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organisation {
    pub url: String,
    pub uuid: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub code: String,
    pub organisation: Organisation,
    pub extra_metadata: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub code: String,
    pub parameter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub scale: Scale,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_frame: Option<String>,
    // The service's wire name really is spelled this way.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compartement: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeseries {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "zulu")]
    pub start: DateTime<Utc>,
    #[serde(with = "zulu")]
    pub end: DateTime<Utc>,
    pub observation_type: ObservationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_code: Option<String>,
    pub location: Location,
    #[serde(default)]
    pub extra_metadata: Map<String, Value>,
}

/// A single time-series event value; the service accepts numbers,
/// strings and booleans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventValue {
    Number(f64),
    Text(String),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(with = "zulu")]
    pub time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<EventValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<i64>,
    #[serde(default)]
    pub validation_code: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub detection_limit: String,
}

/// One entry of the bulk events endpoint: a series uuid plus its events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventBatch {
    pub uuid: String,
    pub events: Vec<Event>,
}
