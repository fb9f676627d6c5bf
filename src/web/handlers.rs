//! HTTP request handlers and report renderers.

use super::AppState;
use crate::probe;
use crate::report::Report;

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Json},
};
use std::fmt::Write;

const PAGE_TEMPLATE: &str = include_str!("templates/healthcheck.html");

const NO_CACHE: (header::HeaderName, &str) = (header::CACHE_CONTROL, "private, max-age=0");

// ============================================================================
// Probes (readiness/liveness never touch the aggregator)
// ============================================================================

pub async fn handle_readiness() -> &'static str {
    "OK"
}

pub async fn handle_liveness() -> &'static str {
    "OK"
}

// ============================================================================
// Healthcheck endpoints
// ============================================================================

pub async fn handle_healthcheck_json(State(state): State<AppState>) -> impl IntoResponse {
    let report = probe::healthcheck(&state.client, &state.config).await;
    ([NO_CACHE], Json(report))
}

pub async fn handle_healthcheck_html(State(state): State<AppState>) -> impl IntoResponse {
    let report = probe::healthcheck(&state.client, &state.config).await;
    let body = render_report(&report, state.config.tracking_points_max_delay);
    let page = PAGE_TEMPLATE.replace("{{content}}", &body);
    ([NO_CACHE], Html(page))
}

/// Render the human-readable report body.
///
/// Null-safe by construction: every field may be absent and renders as an
/// error line rather than panicking.
fn render_report(d: &Report, max_delay: u64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<p>Server time: {}</p>", d.server_time);
    out.push_str("<p>\n");

    // Stale-line copy is spelled out per feed; the all-devices line
    // capitalizes "Delay", a long-standing quirk of the page.
    tracking_lines(
        &mut out,
        "Latest tracking point (AWST)",
        "Resource Tracking",
        &d.latest_point,
        d.latest_point_delay,
        Some((max_delay, "Resource Tracking Delay")),
    );
    tracking_lines(
        &mut out,
        "Latest Iridium tracking point (AWST)",
        "Iridium tracking",
        &d.iridium_latest_point,
        d.iridium_latest_point_delay,
        Some((max_delay, "Iridium tracking delay")),
    );
    tracking_lines(
        &mut out,
        "Latest Tracplus tracking point (AWST)",
        "Tracplus tracking",
        &d.tracplus_latest_point,
        d.tracplus_latest_point_delay,
        None,
    );
    tracking_lines(
        &mut out,
        "Latest DFES tracking point (AWST)",
        "DFES tracking",
        &d.dfes_latest_point,
        d.dfes_latest_point_delay,
        None,
    );
    tracking_lines(
        &mut out,
        "Latest Fleetcare tracking point (AWST)",
        "Fleetcare tracking",
        &d.fleetcare_latest_point,
        d.fleetcare_latest_point_delay,
        Some((max_delay, "Fleetcare tracking delay")),
    );

    out.push_str("</p>\n<p>\n");

    match d.csw_catalogue_count {
        Some(count) => {
            let _ = writeln!(out, "CSW spatial catalogue for SSS: {} layers<br>", count);
        }
        None => out.push_str("CSW API endpoint error<br>\n"),
    }
    match d.todays_burns_count {
        Some(count) => {
            let _ = writeln!(out, "Today's burns count (KMI): {}<br>", count);
        }
        None => out.push_str("Today's burns count (KMI): error<br>\n"),
    }
    match d.kmi_wmts_layer_count {
        Some(count) => {
            let _ = writeln!(out, "KMI WMTS layer count (public workspace): {}<br>", count);
        }
        None => out.push_str("KMI WMTS GetCapabilities error<br>\n"),
    }
    if d.bfrs_profile_api_endpoint == Some(true) {
        out.push_str("BFRS profile API endpoint: OK<br>\n");
    } else {
        out.push_str("BFRS profile API endpoint error<br>\n");
    }
    if d.dbca_going_bushfires_layer {
        out.push_str("DBCA Going Bushfires layer (KMI): OK<br>\n");
    } else {
        out.push_str("DBCA Going Bushfires layer (KMI) error<br>\n");
    }
    if d.dbca_control_lines_layer {
        out.push_str("DBCA Control Lines layer (KMI): OK<br>\n");
    } else {
        out.push_str("DBCA Control Lines (KMI) error<br>\n");
    }

    out.push_str("</p>\n<p>\n");
    if d.auth2_status == Some(true) {
        out.push_str("AUTH2 status: OK<br>\n");
    } else {
        out.push_str("AUTH2 error<br>\n");
    }

    out.push_str("</p>\n<p>\n");
    if d.success {
        out.push_str("<strong>Finished checks, healthcheck succeeded!</strong>");
    } else {
        out.push_str("<strong>Finished checks, something is wrong =(</strong>");
    }
    out.push_str("</p>");

    out
}

/// Append the point and delay lines for one tracking feed.
///
/// `threshold` pairs the staleness limit with the feed's over-threshold
/// line prefix, or is `None` for feeds whose delay is reported without a
/// threshold comparison.
fn tracking_lines(
    out: &mut String,
    point_label: &str,
    delay_label: &str,
    point: &Option<String>,
    delay: Option<f64>,
    threshold: Option<(u64, &str)>,
) {
    let (Some(point), Some(delay)) = (point, delay) else {
        let _ = writeln!(out, "{}: error<br>", delay_label);
        return;
    };

    let _ = writeln!(out, "{}: {}<br>", point_label, point);
    match threshold {
        Some((max, stale_label)) if delay > max as f64 => {
            let _ = writeln!(
                out,
                "{} too high! Currently {:.1} min (max {} min)<br>",
                stale_label, delay, max
            );
        }
        Some((max, _)) => {
            let _ = writeln!(
                out,
                "{} delay currently {:.1} min (max {} min)<br>",
                delay_label, delay, max
            );
        }
        None => {
            let _ = writeln!(out, "{} delay currently {:.1} min<br>", delay_label, delay);
        }
    }
}

// ============================================================================
// Static Assets
// ============================================================================

pub async fn handle_favicon() -> impl IntoResponse {
    // Map-pin favicon, embedded so no static directory is needed.
    let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
        <path d="M50 10 C32 10 20 24 20 40 C20 62 50 92 50 92 C50 92 80 62 80 40 C80 24 68 10 50 10 Z" fill="#2d7d46"/>
        <circle cx="50" cy="40" r="12" fill="white"/>
    </svg>"##;

    ([(header::CONTENT_TYPE, "image/svg+xml")], svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::extract::State;
    use axum::http::StatusCode;
    use std::sync::Arc;
    use wiremock::MockServer;

    fn populated_report() -> Report {
        Report {
            latest_point: Some("2024-06-01T12:00:00+08:00".to_string()),
            latest_point_delay: Some(5.0),
            iridium_latest_point: Some("2024-06-01T12:00:00+08:00".to_string()),
            iridium_latest_point_delay: Some(45.0),
            tracplus_latest_point: Some("2024-06-01T12:00:00+08:00".to_string()),
            tracplus_latest_point_delay: Some(120.0),
            dfes_latest_point: Some("2024-06-01T12:00:00+08:00".to_string()),
            dfes_latest_point_delay: Some(2.0),
            fleetcare_latest_point: Some("2024-06-01T12:00:00+08:00".to_string()),
            fleetcare_latest_point_delay: Some(10.0),
            csw_catalogue_count: Some(40),
            todays_burns_count: Some(3),
            kmi_wmts_layer_count: Some(120),
            bfrs_profile_api_endpoint: Some(true),
            auth2_status: Some(true),
            ..Report::new()
        }
    }

    #[test]
    fn test_render_report_delay_copy() {
        let body = render_report(&populated_report(), 30);
        // Within threshold.
        assert!(body.contains("Resource Tracking delay currently 5.0 min (max 30 min)"));
        // Over threshold.
        assert!(body.contains("Iridium tracking delay too high! Currently 45.0 min (max 30 min)"));
        // Unchecked feed: no threshold in the copy.
        assert!(body.contains("Tracplus tracking delay currently 120.0 min<br>"));
        assert!(body.contains("Finished checks, healthcheck succeeded!"));
    }

    #[test]
    fn test_render_report_stale_devices_copy() {
        let report = Report {
            latest_point_delay: Some(62.0),
            ..populated_report()
        };
        let body = render_report(&report, 30);
        // The all-devices stale line capitalizes "Delay".
        assert!(body.contains("Resource Tracking Delay too high! Currently 62.0 min (max 30 min)"));
    }

    #[test]
    fn test_render_report_all_fields_absent() {
        // A report where every probe failed must render without panicking.
        let mut report = Report::new();
        report.success = false;
        report.dbca_going_bushfires_layer = false;

        let body = render_report(&report, 30);

        assert!(body.contains("Resource Tracking: error"));
        assert!(body.contains("CSW API endpoint error"));
        assert!(body.contains("KMI WMTS GetCapabilities error"));
        assert!(body.contains("BFRS profile API endpoint error"));
        assert!(body.contains("DBCA Going Bushfires layer (KMI) error"));
        assert!(body.contains("AUTH2 error"));
        assert!(body.contains("Finished checks, something is wrong =("));
    }

    #[tokio::test]
    async fn test_probe_endpoints_return_ok() {
        assert_eq!(handle_readiness().await, "OK");
        assert_eq!(handle_liveness().await, "OK");
    }

    /// State whose config points every source at a mock server with no
    /// mocks mounted, so all probes fail fast and locally.
    async fn unreachable_state() -> AppState {
        let server = MockServer::start().await;
        let cfg = Config {
            rt_url: server.uri(),
            csw_api: format!("{}/catalogue/api/records/", server.uri()),
            kmi_url: format!("{}/geoserver", server.uri()),
            bfrs_url: format!("{}/bfrs/api/v1/profile/", server.uri()),
            auth2_status_url: format!("{}/auth2/status", server.uri()),
            ..Default::default()
        };
        AppState {
            config: Arc::new(cfg),
            client: reqwest::Client::new(),
        }
    }

    #[tokio::test]
    async fn test_json_endpoint_contract() {
        let state = unreachable_state().await;

        let resp = handle_healthcheck_json(State(state)).await.into_response();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CACHE_CONTROL].to_str().unwrap(),
            "private, max-age=0"
        );
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE].to_str().unwrap(),
            "application/json"
        );

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let obj = value.as_object().unwrap();
        // The full key set is present even when every probe failed.
        assert_eq!(obj.len(), 19);
        assert_eq!(obj["success"], false);
        assert!(obj["latest_point"].is_null());
        assert!(obj["server_time"].as_str().unwrap().ends_with("+08:00"));
    }

    #[tokio::test]
    async fn test_html_endpoint_contract() {
        let state = unreachable_state().await;

        let resp = handle_healthcheck_html(State(state)).await.into_response();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CACHE_CONTROL].to_str().unwrap(),
            "private, max-age=0"
        );
        assert!(resp.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let page = String::from_utf8(body.to_vec()).unwrap();
        assert!(page.contains("<h1>DBCA Spatial Support System health checks</h1>"));
        assert!(page.contains("Finished checks, something is wrong =("));
    }
}
