//! Map server client for the flood viewer.
//!
//! - Overlay resolution from UI state ([`resolve`])
//! - WMS 1.3.0 GetMap request building
//! - Layer discovery via the REST API or GetCapabilities

pub mod discovery;
pub mod error;
pub mod getmap;
pub mod resolver;

use std::time::Duration;

use reqwest::Client;

pub use discovery::{
    discovery_for, parse_layer_names, CapabilitiesDiscovery, LayerDiscovery, RestDiscovery,
};
pub use error::{ClientError, ClientResult};
pub use getmap::{image_size, GetMapRequest, WMS_VERSION};
pub use resolver::{
    resolve, ParamValue, RequestedOverlay, ResolverConfig, PARAM_FORMAT, PARAM_LAYERS,
    PARAM_TIME, PARAM_TRANSPARENT,
};

/// HTTP client shared by discovery and overlay fetching.
pub fn http_client() -> ClientResult<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(4)
        .tcp_nodelay(true)
        .build()?)
}
