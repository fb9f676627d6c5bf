//! GeoServer XML probes: WFS feature count and WMTS capabilities.
//!
//! Both requests are sent anonymously; the KMI public workspace does not
//! require credentials.

use super::{xml, ProbeError};

const WMTS_NS: &str = "http://www.opengis.net/wmts/1.0";

/// Number of features in the `public:todays_burns` layer.
///
/// Issues a WFS GetFeature request with `resultType=hits`, which returns
/// an empty feature collection whose root element carries the count in
/// its `numberOfFeatures` attribute.
pub async fn todays_burns_count(
    client: &reqwest::Client,
    wfs_url: &str,
) -> Result<i64, ProbeError> {
    let resp = client
        .get(wfs_url)
        .query(&[
            ("service", "wfs"),
            ("version", "1.1.0"),
            ("request", "GetFeature"),
            ("typeNames", "public:todays_burns"),
            ("resultType", "hits"),
        ])
        .send()
        .await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ProbeError::Status(status.as_u16()));
    }

    let body = resp.text().await?;
    let count = xml::root_attr(&body, "numberOfFeatures")?;
    count
        .parse()
        .map_err(|_| ProbeError::Parse(format!("numberOfFeatures not an integer: {}", count)))
}

/// Number of layers advertised by the WMTS GetCapabilities document.
pub async fn wmts_layer_count(
    client: &reqwest::Client,
    wmts_url: &str,
) -> Result<usize, ProbeError> {
    let resp = client
        .get(wmts_url)
        .query(&[("request", "getcapabilities")])
        .send()
        .await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ProbeError::Status(status.as_u16()));
    }

    let body = resp.text().await?;
    xml::count_in_namespace(&body, WMTS_NS, "Layer")
}
