//! WMS 1.3.0 GetMap request building.
//!
//! The resolver decides *what* to request; this module adds the protocol
//! framing a map client supplies on its own (service, version, CRS, BBOX,
//! image size) and produces the final URL.

use bytes::Bytes;
use flood_common::{BoundingBox, Credentials, Viewport};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use tracing::{debug, instrument};

use crate::resolver::RequestedOverlay;
use crate::{ClientError, ClientResult};

pub const WMS_VERSION: &str = "1.3.0";

/// A GetMap request ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct GetMapRequest {
    /// `{base_url}/{workspace}/wms`
    pub endpoint: String,
    /// Ordered key/value pairs
    pub params: Vec<(String, String)>,
    pub width: u32,
    pub height: u32,
}

impl GetMapRequest {
    /// Frame a resolved overlay as a GetMap request against `endpoint`.
    ///
    /// The image is sized to fit inside `viewport` while keeping the
    /// extent's aspect ratio.
    pub fn from_overlay(overlay: &RequestedOverlay, endpoint: &str, viewport: Viewport) -> Self {
        let (width, height) = image_size(&overlay.extent.bbox, viewport);

        let mut params: Vec<(String, String)> = vec![
            ("SERVICE".into(), "WMS".into()),
            ("VERSION".into(), WMS_VERSION.into()),
            ("REQUEST".into(), "GetMap".into()),
        ];
        params.extend(
            overlay
                .query_params
                .iter()
                .map(|(k, v)| (k.clone(), v.to_string())),
        );
        params.push(("STYLES".into(), String::new()));
        params.push(("CRS".into(), overlay.extent.crs.to_string()));
        params.push(("BBOX".into(), overlay.extent.wms_bbox()));
        params.push(("WIDTH".into(), width.to_string()));
        params.push(("HEIGHT".into(), height.to_string()));

        Self {
            endpoint: endpoint.to_string(),
            params,
            width,
            height,
        }
    }

    /// Look up a parameter by name.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Full request URL with percent-encoded query string.
    pub fn url(&self) -> Result<Url, ClientError> {
        Url::parse_with_params(&self.endpoint, &self.params)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.endpoint, e)))
    }

    /// Fetch the overlay image.
    ///
    /// The server answers some failures with `200 OK` and an XML exception
    /// report, so the content type must be `image/*` as well.
    #[instrument(skip(self, client, credentials), fields(width = self.width, height = self.height))]
    pub async fn fetch(&self, client: &Client, credentials: &Credentials) -> ClientResult<Bytes> {
        let url = self.url()?;
        let response = client
            .get(url.clone())
            .basic_auth(&credentials.username, Some(&credentials.password))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.starts_with("image/") {
            return Err(ClientError::NotAnImage {
                url: url.to_string(),
                content_type,
            });
        }

        let body = response.bytes().await?;
        debug!(bytes = body.len(), content_type = %content_type, "Fetched overlay image");
        Ok(body)
    }
}

/// Largest image inside `viewport` with the same aspect ratio as `bbox`.
pub fn image_size(bbox: &BoundingBox, viewport: Viewport) -> (u32, u32) {
    if !bbox.is_valid() {
        return (viewport.width, viewport.height);
    }
    let scale = (viewport.width as f64 / bbox.width()).min(viewport.height as f64 / bbox.height());
    let width = (bbox.width() * scale).round().max(1.0) as u32;
    let height = (bbox.height() * scale).round().max(1.0) as u32;
    (width, height)
}
