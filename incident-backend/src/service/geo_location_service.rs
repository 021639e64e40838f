// src/service/geo_location_service.rs

//! 呼び出し元IPの位置情報ルックアップ（ip-api.com 互換）

use crate::api::dto::auth_dto::LoginLocation;
use crate::config::GeoConfig;
use crate::error::AppError;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum GeoLocationError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Geolocation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Geolocation service returned HTTP {0}")]
    Status(u16),
}

impl From<GeoLocationError> for AppError {
    fn from(err: GeoLocationError) -> Self {
        AppError::ExternalServiceError(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IpApiResponse {
    status: Option<String>,
    message: Option<String>,
    city: Option<String>,
    region_name: Option<String>,
    country: Option<String>,
}

pub struct GeoLocationService {
    client: reqwest::Client,
    base_url: String,
    dev_fallback_ip: String,
}

impl GeoLocationService {
    pub fn new(config: &GeoConfig) -> Result<Self, GeoLocationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GeoLocationError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            dev_fallback_ip: config.dev_fallback_ip.clone(),
        })
    }

    /// 照会に使うIPを決める
    ///
    /// IPv4射影アドレスの `::ffff:` を外し、ループバック・不明な値は開発用IPに置き換える。
    pub fn resolve_client_ip(&self, raw: Option<&str>) -> String {
        let candidate = raw
            .map(str::trim)
            .map(|ip| ip.strip_prefix("::ffff:").unwrap_or(ip))
            .unwrap_or_default();

        match candidate.parse::<IpAddr>() {
            Ok(ip) if !ip.is_loopback() && !ip.is_unspecified() => ip.to_string(),
            _ => {
                debug!(raw_ip = ?raw, fallback = %self.dev_fallback_ip, "Using development fallback IP");
                self.dev_fallback_ip.clone()
            }
        }
    }

    /// `{base}/json/{ip}` を照会
    pub async fn lookup(&self, ip: &str) -> Result<LoginLocation, GeoLocationError> {
        let url = format!("{}/json/{}", self.base_url, ip);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(GeoLocationError::Status(response.status().as_u16()));
        }

        let body: IpApiResponse = response.json().await?;

        if body.status.as_deref() == Some("fail") {
            warn!(
                ip = %ip,
                reason = body.message.as_deref().unwrap_or("unknown"),
                "Geolocation lookup returned no data"
            );
            return Ok(LoginLocation {
                ip: ip.to_string(),
                ..Default::default()
            });
        }

        Ok(LoginLocation {
            ip: ip.to_string(),
            city: body.city,
            region: body.region_name,
            country: body.country,
        })
    }
}
