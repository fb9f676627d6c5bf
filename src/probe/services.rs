//! JSON-based service probes: CSW catalogue, BFRS profile, AUTH2 status,
//! and the optional KMI layer checks.

use serde_json::Value;

use super::ProbeError;

/// Count of records in the CSW catalogue for the SSS application.
///
/// The endpoint returns a JSON array of record objects.
pub async fn csw_record_count(
    client: &reqwest::Client,
    url: &str,
    user: &str,
    pass: &str,
) -> Result<u64, ProbeError> {
    let resp = client.get(url).basic_auth(user, Some(pass)).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ProbeError::Status(status.as_u16()));
    }

    let records: Vec<Value> = resp.json().await?;
    Ok(records.len() as u64)
}

/// Check that the BFRS profile API endpoint answers with valid JSON.
///
/// The body's content is irrelevant; a parseable response is the check.
pub async fn bfrs_profile(
    client: &reqwest::Client,
    url: &str,
    user: &str,
    pass: &str,
) -> Result<bool, ProbeError> {
    let resp = client.get(url).basic_auth(user, Some(pass)).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ProbeError::Status(status.as_u16()));
    }

    let _body: Value = resp.json().await?;
    Ok(true)
}

/// Read the `healthy` flag from the AUTH2 status endpoint.
pub async fn auth2_healthy(
    client: &reqwest::Client,
    url: &str,
    user: &str,
    pass: &str,
) -> Result<bool, ProbeError> {
    let resp = client.get(url).basic_auth(user, Some(pass)).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ProbeError::Status(status.as_u16()));
    }

    let body: Value = resp.json().await?;
    body.get("healthy")
        .and_then(Value::as_bool)
        .ok_or(ProbeError::MissingField("healthy"))
}

/// Check that a KMI layer endpoint answers successfully.
///
/// The response body is not inspected; a success status is the check.
pub async fn kmi_layer(
    client: &reqwest::Client,
    url: &str,
    user: &str,
    pass: &str,
) -> Result<(), ProbeError> {
    let resp = client.get(url).basic_auth(user, Some(pass)).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ProbeError::Status(status.as_u16()));
    }
    Ok(())
}
