//! Layer discovery against the map server.
//!
//! Discovery runs once at startup and must never take the viewer down: every
//! failure is logged and reported as an empty catalog.

use async_trait::async_trait;
use flood_common::{Credentials, DiscoveryKind, ViewerConfig};
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::error::{ClientError, ClientResult};
use crate::getmap::WMS_VERSION;

/// Source of server-published layer identifiers.
#[async_trait]
pub trait LayerDiscovery: Send + Sync {
    /// Layer identifiers in server order. Empty on any failure.
    async fn fetch_available_layers(&self) -> Vec<String>;
}

/// Build the discovery collaborator selected in the config.
pub fn discovery_for(config: &ViewerConfig) -> ClientResult<Box<dyn LayerDiscovery>> {
    let client = crate::http_client()?;
    Ok(match config.discovery.kind {
        DiscoveryKind::Rest => Box::new(RestDiscovery::new(client, config)),
        DiscoveryKind::Capabilities => Box::new(CapabilitiesDiscovery::new(client, config)),
    })
}

/// Lists coverages of every coverage store in the workspace through the
/// server's REST API.
pub struct RestDiscovery {
    client: Client,
    base_url: String,
    workspace: String,
    credentials: Credentials,
}

impl RestDiscovery {
    pub fn new(client: Client, config: &ViewerConfig) -> Self {
        Self {
            client,
            base_url: config.base_url().to_string(),
            workspace: config.workspace.clone(),
            credentials: config.credentials.clone(),
        }
    }

    /// `{base_url}/rest/workspaces/{workspace}/{tail...}` with each segment
    /// percent-encoded.
    fn rest_url(&self, tail: &[&str]) -> ClientResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["rest", "workspaces", self.workspace.as_str()])
            .extend(tail);
        Ok(url)
    }

    async fn get_json(&self, url: Url) -> ClientResult<Value> {
        let response = self
            .client
            .get(url.clone())
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.json::<Value>().await?)
    }

    #[instrument(skip(self), fields(workspace = %self.workspace))]
    async fn try_fetch(&self) -> ClientResult<Vec<String>> {
        let stores = self.get_json(self.rest_url(&["coveragestores.json"])?).await?;
        let store_names = list_names(&stores, "coverageStores", "coverageStore");
        debug!(count = store_names.len(), "Found coverage stores");

        let mut layers = Vec::new();
        for store in &store_names {
            let url = self.rest_url(&["coveragestores", store.as_str(), "coverages.json"])?;
            match self.get_json(url).await {
                Ok(body) => layers.extend(list_names(&body, "coverages", "coverage")),
                Err(ClientError::Status { status, .. }) => {
                    warn!(store = %store, status, "Skipping coverage store");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(layers)
    }
}

#[async_trait]
impl LayerDiscovery for RestDiscovery {
    async fn fetch_available_layers(&self) -> Vec<String> {
        match self.try_fetch().await {
            Ok(layers) => {
                info!(count = layers.len(), "Discovered layers via REST");
                layers
            }
            Err(e) => {
                warn!(error = %e, "Layer discovery failed, continuing with empty catalog");
                Vec::new()
            }
        }
    }
}

/// Collect `name` fields from `{outer: {inner: [..]}}`.
///
/// The REST API reports an empty list as `{"coverageStores": ""}` and may
/// collapse a single entry into an object, so both are accepted.
fn list_names(body: &Value, outer: &str, inner: &str) -> Vec<String> {
    let entries: Vec<&Value> = match body.get(outer).and_then(|v| v.get(inner)) {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(item @ Value::Object(_)) => vec![item],
        _ => Vec::new(),
    };

    entries
        .into_iter()
        .filter_map(|e| e.get("name").and_then(Value::as_str))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads layer names from the workspace's WMS GetCapabilities document.
pub struct CapabilitiesDiscovery {
    client: Client,
    wms_url: String,
    workspace: String,
    credentials: Credentials,
}

impl CapabilitiesDiscovery {
    pub fn new(client: Client, config: &ViewerConfig) -> Self {
        Self {
            client,
            wms_url: config.wms_url(),
            workspace: config.workspace.clone(),
            credentials: config.credentials.clone(),
        }
    }

    #[instrument(skip(self), fields(workspace = %self.workspace))]
    async fn try_fetch(&self) -> ClientResult<Vec<String>> {
        let url = Url::parse_with_params(
            &self.wms_url,
            &[
                ("SERVICE", "WMS"),
                ("REQUEST", "GetCapabilities"),
                ("VERSION", WMS_VERSION),
            ],
        )
        .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.wms_url, e)))?;

        let response = self
            .client
            .get(url.clone())
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let xml = response.text().await?;
        parse_layer_names(&xml, &self.workspace)
    }
}

#[async_trait]
impl LayerDiscovery for CapabilitiesDiscovery {
    async fn fetch_available_layers(&self) -> Vec<String> {
        match self.try_fetch().await {
            Ok(layers) => {
                info!(count = layers.len(), "Discovered layers via GetCapabilities");
                layers
            }
            Err(e) => {
                warn!(error = %e, "Layer discovery failed, continuing with empty catalog");
                Vec::new()
            }
        }
    }
}

/// Parse `<Layer><Name>` values from a WMS capabilities document.
///
/// Only names that are direct children of a `Layer` count (style names are
/// skipped) and a leading `{workspace}:` is removed.
pub fn parse_layer_names(xml: &str, workspace: &str) -> ClientResult<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let prefix = format!("{}:", workspace);
    let mut buf = Vec::new();
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut names = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => path.push(e.local_name().as_ref().to_vec()),
            Ok(Event::End(_)) => {
                path.pop();
            }
            Ok(Event::Text(t)) if is_layer_name(&path) => {
                let text = t.unescape()?;
                let name = text.trim();
                let name = name.strip_prefix(prefix.as_str()).unwrap_or(name);
                if !name.is_empty() {
                    names.push(name.to_string());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ClientError::Xml(format!(
                    "at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(names)
}

fn is_layer_name(path: &[Vec<u8>]) -> bool {
    matches!(path, [.., parent, leaf] if parent.as_slice() == b"Layer" && leaf.as_slice() == b"Name")
}
