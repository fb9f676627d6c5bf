//! Probe execution and aggregation.
//!
//! Each probe is one independent check against an external service. The
//! aggregator fans all probes out concurrently, then folds their outcomes
//! into a [`Report`]. A probe failure is captured and logged, never
//! propagated: `healthcheck` always returns a complete report.

mod geoserver;
mod services;
mod tracking;
mod xml;

pub use tracking::TrackingPoint;

use thiserror::Error;

use crate::config::Config;
use crate::report::Report;

/// Probe error taxonomy.
///
/// All four variants are handled identically by the aggregator (fields
/// left null, overall verdict set false); the distinction is kept for
/// logging and tests.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected HTTP status: {0}")]
    Status(u16),
    #[error("malformed response body: {0}")]
    Parse(String),
    #[error("missing expected field: {0}")]
    MissingField(&'static str),
}

impl From<reqwest::Error> for ProbeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ProbeError::Parse(e.to_string())
        } else if let Some(status) = e.status() {
            ProbeError::Status(status.as_u16())
        } else {
            ProbeError::Transport(e.to_string())
        }
    }
}

/// Folded outcome of one tracking feed.
#[derive(Debug, PartialEq)]
struct FeedOutcome {
    point: Option<String>,
    delay: Option<f64>,
    healthy: bool,
}

/// Fold one tracking feed result into report-ready fields.
///
/// `threshold` is the staleness limit in minutes, or `None` for feeds
/// whose age is recorded but never checked (tracplus, dfes). A failed
/// probe is always unhealthy; a stale-but-successful response is only
/// unhealthy for threshold-checked feeds. That asymmetry is long-standing
/// observed behavior and is kept deliberately.
fn fold_tracking(
    name: &str,
    result: Result<TrackingPoint, ProbeError>,
    threshold: Option<f64>,
) -> FeedOutcome {
    match result {
        Ok(point) => {
            let stale = threshold.is_some_and(|max| point.age_minutes > max);
            if stale {
                tracing::warn!(
                    feed = name,
                    delay = point.age_minutes,
                    "tracking delay over threshold"
                );
            }
            FeedOutcome {
                point: Some(point.seen),
                delay: Some(point.age_minutes),
                healthy: !stale,
            }
        }
        Err(e) => {
            tracing::warn!(feed = name, error = %e, "tracking probe failed");
            FeedOutcome {
                point: None,
                delay: None,
                healthy: false,
            }
        }
    }
}

/// Fold a value-producing probe result: a failure leaves the field null
/// and flips the overall verdict.
fn fold_value<T>(name: &str, result: Result<T, ProbeError>, success: &mut bool) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(probe = name, error = %e, "probe failed");
            *success = false;
            None
        }
    }
}

/// Run an optional KMI layer check. Returns `None` when the check is not
/// configured (the layer is then assumed healthy and the verdict is
/// untouched).
async fn optional_layer(
    client: &reqwest::Client,
    cfg: &Config,
    name: &str,
    path: Option<&str>,
) -> Option<bool> {
    let path = path?;
    match services::kmi_layer(client, &cfg.kmi_layer_url(path), &cfg.user_sso, &cfg.pass_sso).await
    {
        Ok(()) => Some(true),
        Err(e) => {
            tracing::warn!(probe = name, error = %e, "layer check failed");
            Some(false)
        }
    }
}

/// Execute every configured probe and fold the outcomes into a report.
///
/// Probes run concurrently; they share only the client and credentials.
/// This function never fails: individual probe errors are recorded in
/// the report, not returned.
pub async fn healthcheck(client: &reqwest::Client, cfg: &Config) -> Report {
    let mut report = Report::new();
    let threshold = cfg.tracking_points_max_delay as f64;
    let (user, pass) = (cfg.user_sso.as_str(), cfg.pass_sso.as_str());

    let (
        devices,
        iridium,
        tracplus,
        dfes,
        fleetcare,
        csw,
        burns,
        wmts,
        bfrs,
        auth2,
        going_bushfires,
        control_lines,
    ) = {
        let devices_url = cfg.devices_url();
        let iriditrak_url = cfg.devices_url_for("iriditrak");
        let tracplus_url = cfg.devices_url_for("tracplus");
        let dfes_url = cfg.devices_url_for("dfes");
        let fleetcare_url = cfg.devices_url_for("fleetcare");
        let kmi_wfs_url = cfg.kmi_wfs_url();
        let kmi_wmts_url = cfg.kmi_wmts_url();
        tokio::join!(
        tracking::latest_point(client, &devices_url, user, pass),
        tracking::latest_point(client, &iriditrak_url, user, pass),
        tracking::latest_point(client, &tracplus_url, user, pass),
        tracking::latest_point(client, &dfes_url, user, pass),
        tracking::latest_point(client, &fleetcare_url, user, pass),
        services::csw_record_count(client, &cfg.csw_api, user, pass),
        geoserver::todays_burns_count(client, &kmi_wfs_url),
        geoserver::wmts_layer_count(client, &kmi_wmts_url),
        services::bfrs_profile(client, &cfg.bfrs_url, user, pass),
        services::auth2_healthy(client, &cfg.auth2_status_url, user, pass),
        optional_layer(
            client,
            cfg,
            "dbca_going_bushfires_layer",
            cfg.dbca_going_bushfires_url.as_deref(),
        ),
        optional_layer(
            client,
            cfg,
            "dbca_control_lines_layer",
            cfg.dbca_control_lines_url.as_deref(),
        ),
    )
    };

    let outcome = fold_tracking("devices", devices, Some(threshold));
    report.latest_point = outcome.point;
    report.latest_point_delay = outcome.delay;
    report.success &= outcome.healthy;

    let outcome = fold_tracking("iridium", iridium, Some(threshold));
    report.iridium_latest_point = outcome.point;
    report.iridium_latest_point_delay = outcome.delay;
    report.success &= outcome.healthy;

    let outcome = fold_tracking("tracplus", tracplus, None);
    report.tracplus_latest_point = outcome.point;
    report.tracplus_latest_point_delay = outcome.delay;
    report.success &= outcome.healthy;

    let outcome = fold_tracking("dfes", dfes, None);
    report.dfes_latest_point = outcome.point;
    report.dfes_latest_point_delay = outcome.delay;
    report.success &= outcome.healthy;

    let outcome = fold_tracking("fleetcare", fleetcare, Some(threshold));
    report.fleetcare_latest_point = outcome.point;
    report.fleetcare_latest_point_delay = outcome.delay;
    report.success &= outcome.healthy;

    report.csw_catalogue_count = fold_value("csw_catalogue", csw, &mut report.success);
    report.todays_burns_count = fold_value("todays_burns", burns, &mut report.success);
    report.kmi_wmts_layer_count = fold_value("kmi_wmts", wmts, &mut report.success);
    report.bfrs_profile_api_endpoint = fold_value("bfrs_profile", bfrs, &mut report.success);

    match auth2 {
        Ok(healthy) => {
            report.auth2_status = Some(healthy);
            if !healthy {
                tracing::warn!(probe = "auth2_status", "auth service reports unhealthy");
                report.success = false;
            }
        }
        Err(e) => {
            tracing::warn!(probe = "auth2_status", error = %e, "probe failed");
            report.success = false;
        }
    }

    if let Some(ok) = going_bushfires {
        report.dbca_going_bushfires_layer = ok;
        report.success &= ok;
    }
    if let Some(ok) = control_lines {
        report.dbca_control_lines_layer = ok;
        report.success &= ok;
    }

    report
}
