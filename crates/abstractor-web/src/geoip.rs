use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct GeoResponse {
    status: String,
    #[serde(default)]
    country: Option<String>,
    #[serde(default, rename = "regionName")]
    region_name: Option<String>,
    #[serde(default)]
    city: Option<String>,
}

/// Best-effort reverse geolocation via ip-api.com.
///
/// Every failure mode (network, non-success status, private address) yields
/// an empty string; a missing location must never fail an upload.
pub async fn lookup_location(client: &reqwest::Client, ip: &str) -> String {
    let url = format!("http://ip-api.com/json/{ip}");
    let resp = match client.get(&url).send().await {
        Ok(resp) => resp,
        Err(e) => {
            debug!(error = %e, "geoip lookup failed");
            return String::new();
        }
    };
    let Ok(data) = resp.json::<GeoResponse>().await else {
        return String::new();
    };
    if data.status != "success" {
        return String::new();
    }

    [data.city, data.region_name, data.country]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
