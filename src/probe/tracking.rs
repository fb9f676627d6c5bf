//! Tracking-device feed probe.
//!
//! Each Resource Tracking device feed returns a JSON document with an
//! `objects` array ordered most-recently-seen first. The probe extracts
//! the first element's `seen` timestamp (normalized to AWST) and its
//! pre-computed `age_minutes`.

use chrono::DateTime;
use serde_json::Value;

use super::ProbeError;
use crate::report::to_awst;

/// Most recent sighting reported by one device feed.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingPoint {
    /// Timestamp of the sighting, RFC 3339 in AWST.
    pub seen: String,
    /// Age of the sighting in minutes, as reported by the feed.
    pub age_minutes: f64,
}

/// Fetch the latest tracking point from a device feed URL.
pub async fn latest_point(
    client: &reqwest::Client,
    url: &str,
    user: &str,
    pass: &str,
) -> Result<TrackingPoint, ProbeError> {
    let resp = client.get(url).basic_auth(user, Some(pass)).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ProbeError::Status(status.as_u16()));
    }

    let body: Value = resp.json().await?;
    let first = body
        .get("objects")
        .and_then(Value::as_array)
        .and_then(|objects| objects.first())
        .ok_or(ProbeError::MissingField("objects"))?;

    let seen = first
        .get("seen")
        .and_then(Value::as_str)
        .ok_or(ProbeError::MissingField("seen"))?;
    let age_minutes = first
        .get("age_minutes")
        .and_then(Value::as_f64)
        .ok_or(ProbeError::MissingField("age_minutes"))?;

    let seen = DateTime::parse_from_rfc3339(seen)
        .map_err(|e| ProbeError::Parse(format!("bad seen timestamp: {}", e)))?;

    Ok(TrackingPoint {
        seen: to_awst(seen),
        age_minutes,
    })
}
