//! Configuration module for the healthcheck service.
//!
//! Loads configuration from environment variables with sensible defaults.
//! The resulting `Config` is immutable and constructed once at startup;
//! probe logic never reads the environment directly.

use std::env;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Resource Tracking API.
    pub rt_url: String,
    /// CSW catalogue records endpoint (full URL including query string).
    pub csw_api: String,
    /// Base URL of the KMI GeoServer instance.
    pub kmi_url: String,
    /// BFRS profile API endpoint (full URL).
    pub bfrs_url: String,
    /// Base URL of the AUTH2 service.
    pub auth2_url: String,
    /// AUTH2 status endpoint queried by the auth probe.
    pub auth2_status_url: String,
    /// Basic-auth username for authenticated probes.
    pub user_sso: String,
    /// Basic-auth password for authenticated probes.
    pub pass_sso: String,
    /// Maximum acceptable tracking point delay, in minutes.
    pub tracking_points_max_delay: u64,
    /// Optional KMI path for the Going Bushfires layer check.
    /// The probe only runs when this is set.
    pub dbca_going_bushfires_url: Option<String>,
    /// Optional KMI path for the Control Lines layer check.
    /// The probe only runs when this is set.
    pub dbca_control_lines_url: Option<String>,
    /// HTTP port for the web server (default: 8080).
    pub port: u16,
    /// Timeout applied to every outbound probe request, in seconds.
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rt_url: "https://resourcetracking.dbca.wa.gov.au".to_string(),
            csw_api: "https://csw.dbca.wa.gov.au/catalogue/api/records/?format=json&application__name=sss".to_string(),
            kmi_url: "https://kmi.dbca.wa.gov.au/geoserver".to_string(),
            bfrs_url: "https://bfrs.dbca.wa.gov.au/api/v1/profile/?format=json".to_string(),
            auth2_url: "https://auth2.dbca.wa.gov.au/healthcheck".to_string(),
            auth2_status_url: "https://auth2.dbca.wa.gov.au/status".to_string(),
            user_sso: "asi@dbca.wa.gov.au".to_string(),
            pass_sso: "password".to_string(),
            tracking_points_max_delay: 30,
            dbca_going_bushfires_url: None,
            dbca_control_lines_url: None,
            port: 8080,
            http_timeout_secs: 15,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RT_URL`: Resource Tracking API base URL
    /// - `CSW_API`: CSW catalogue records endpoint
    /// - `KMI_URL`: KMI GeoServer base URL
    /// - `BFRS_URL`: BFRS profile API endpoint
    /// - `AUTH2_URL`: AUTH2 service base URL
    /// - `AUTH2_STATUS_URL`: AUTH2 status endpoint
    /// - `USER_SSO` / `PASS_SSO`: basic-auth credentials
    /// - `TRACKING_POINTS_MAX_DELAY`: staleness threshold in minutes (default: 30)
    /// - `DBCA_GOING_BUSHFIRES_URL` / `DBCA_CONTROL_LINES_URL`: optional KMI
    ///   layer paths; setting one enables the corresponding layer probe
    /// - `PORT`: HTTP port (default: 8080)
    /// - `HTTP_TIMEOUT`: outbound request timeout in seconds (default: 15)
    pub fn load() -> Self {
        let mut cfg = Self::default();

        if let Ok(url) = env::var("RT_URL") {
            cfg.rt_url = url;
        }
        if let Ok(url) = env::var("CSW_API") {
            cfg.csw_api = url;
        }
        if let Ok(url) = env::var("KMI_URL") {
            cfg.kmi_url = url;
        }
        if let Ok(url) = env::var("BFRS_URL") {
            cfg.bfrs_url = url;
        }
        if let Ok(url) = env::var("AUTH2_URL") {
            cfg.auth2_url = url;
        }
        if let Ok(url) = env::var("AUTH2_STATUS_URL") {
            cfg.auth2_status_url = url;
        }
        if let Ok(user) = env::var("USER_SSO") {
            cfg.user_sso = user;
        }
        if let Ok(pass) = env::var("PASS_SSO") {
            cfg.pass_sso = pass;
        }
        if let Ok(delay_str) = env::var("TRACKING_POINTS_MAX_DELAY") {
            if let Ok(delay) = delay_str.parse() {
                cfg.tracking_points_max_delay = delay;
            }
        }
        if let Ok(path) = env::var("DBCA_GOING_BUSHFIRES_URL") {
            if !path.is_empty() {
                cfg.dbca_going_bushfires_url = Some(path);
            }
        }
        if let Ok(path) = env::var("DBCA_CONTROL_LINES_URL") {
            if !path.is_empty() {
                cfg.dbca_control_lines_url = Some(path);
            }
        }
        if let Ok(port_str) = env::var("PORT") {
            if let Ok(port) = port_str.parse() {
                cfg.port = port;
            }
        }
        if let Ok(timeout_str) = env::var("HTTP_TIMEOUT") {
            if let Ok(timeout) = timeout_str.parse() {
                cfg.http_timeout_secs = timeout;
            }
        }

        cfg
    }

    /// Device feed URL for all tracked devices with a recorded sighting.
    pub fn devices_url(&self) -> String {
        format!("{}/api/v1/device/?seen__isnull=false&format=json", self.rt_url)
    }

    /// Device feed URL filtered to one source device type.
    pub fn devices_url_for(&self, source_device_type: &str) -> String {
        format!(
            "{}/api/v1/device/?seen__isnull=false&source_device_type={}&format=json",
            self.rt_url, source_device_type
        )
    }

    /// KMI WFS endpoint.
    pub fn kmi_wfs_url(&self) -> String {
        format!("{}/wfs", self.kmi_url)
    }

    /// KMI WMTS endpoint.
    pub fn kmi_wmts_url(&self) -> String {
        format!("{}/public/gwc/service/wmts", self.kmi_url)
    }

    /// Full URL for an optional KMI layer path.
    pub fn kmi_layer_url(&self, path: &str) -> String {
        format!("{}/{}", self.kmi_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.tracking_points_max_delay, 30);
        assert_eq!(cfg.http_timeout_secs, 15);
        assert!(cfg.dbca_going_bushfires_url.is_none());
        assert!(cfg.dbca_control_lines_url.is_none());
    }

    #[test]
    fn test_derived_urls() {
        let cfg = Config {
            rt_url: "https://rt.example.com".to_string(),
            kmi_url: "https://kmi.example.com/geoserver".to_string(),
            ..Default::default()
        };
        assert_eq!(
            cfg.devices_url(),
            "https://rt.example.com/api/v1/device/?seen__isnull=false&format=json"
        );
        assert_eq!(
            cfg.devices_url_for("iriditrak"),
            "https://rt.example.com/api/v1/device/?seen__isnull=false&source_device_type=iriditrak&format=json"
        );
        assert_eq!(cfg.kmi_wfs_url(), "https://kmi.example.com/geoserver/wfs");
        assert_eq!(
            cfg.kmi_wmts_url(),
            "https://kmi.example.com/geoserver/public/gwc/service/wmts"
        );
        assert_eq!(
            cfg.kmi_layer_url("public/wms?layers=test"),
            "https://kmi.example.com/geoserver/public/wms?layers=test"
        );
    }
}
