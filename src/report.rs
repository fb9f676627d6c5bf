//! Report data model and AWST timestamp helpers.
//!
//! A `Report` is the folded outcome of one healthcheck pass. It always
//! carries the full, fixed set of fields; probe failures leave a field as
//! `None` and serialize as JSON `null`, so consumers never have to handle
//! a missing key.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

/// AWST (Australian Western Standard Time) offset from UTC, in seconds.
const AWST_OFFSET_SECS: i32 = 8 * 3600;

/// The fixed UTC+8 offset used for all emitted timestamps.
pub fn awst() -> FixedOffset {
    // Statically valid offset.
    FixedOffset::east_opt(AWST_OFFSET_SECS).unwrap()
}

/// Normalize a timestamp to AWST and format it as RFC 3339.
pub fn to_awst(dt: DateTime<FixedOffset>) -> String {
    dt.with_timezone(&awst()).to_rfc3339()
}

/// Folded outcome of one healthcheck pass over all probes.
///
/// Field names are the external JSON contract; the serialized order
/// matches the declaration order here.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Time the report was generated, in AWST.
    pub server_time: String,
    /// Overall verdict: true only if every probe passed and no
    /// staleness threshold was breached.
    pub success: bool,
    pub latest_point: Option<String>,
    pub latest_point_delay: Option<f64>,
    pub iridium_latest_point: Option<String>,
    pub iridium_latest_point_delay: Option<f64>,
    pub tracplus_latest_point: Option<String>,
    pub tracplus_latest_point_delay: Option<f64>,
    pub dfes_latest_point: Option<String>,
    pub dfes_latest_point_delay: Option<f64>,
    pub fleetcare_latest_point: Option<String>,
    pub fleetcare_latest_point_delay: Option<f64>,
    pub csw_catalogue_count: Option<u64>,
    pub todays_burns_count: Option<i64>,
    pub kmi_wmts_layer_count: Option<usize>,
    pub bfrs_profile_api_endpoint: Option<bool>,
    pub auth2_status: Option<bool>,
    /// Defaults to true: the layer is assumed healthy when its check is
    /// not configured.
    pub dbca_going_bushfires_layer: bool,
    /// Defaults to true: the layer is assumed healthy when its check is
    /// not configured.
    pub dbca_control_lines_layer: bool,
}

impl Report {
    /// Create a fresh report stamped with the current time in AWST.
    ///
    /// Starts optimistic: `success` is true and both optional layer
    /// fields are true until a probe says otherwise.
    pub fn new() -> Self {
        Self {
            server_time: Utc::now().with_timezone(&awst()).to_rfc3339(),
            success: true,
            latest_point: None,
            latest_point_delay: None,
            iridium_latest_point: None,
            iridium_latest_point_delay: None,
            tracplus_latest_point: None,
            tracplus_latest_point_delay: None,
            dfes_latest_point: None,
            dfes_latest_point_delay: None,
            fleetcare_latest_point: None,
            fleetcare_latest_point_delay: None,
            csw_catalogue_count: None,
            todays_burns_count: None,
            kmi_wmts_layer_count: None,
            bfrs_profile_api_endpoint: None,
            auth2_status: None,
            dbca_going_bushfires_layer: true,
            dbca_control_lines_layer: true,
        }
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}
