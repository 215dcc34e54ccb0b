//! Overlay rendering.
//!
//! The session hands every resolved overlay to an [`OverlayRenderer`] as a
//! remove-then-add pair. The HTTP renderer fetches the GetMap image in a
//! background task and reports progress back on the session channel.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use flood_common::{Credentials, ViewerConfig, Viewport};
use projection::fit_extent;
use reqwest::Client;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use wms_client::{GetMapRequest, RequestedOverlay};

use crate::controller::{LoadEvent, OverlayId};
use crate::session::ViewerEvent;

/// Margin around the fitted extent, in pixels.
const FIT_PADDING_PX: f64 = 40.0;

/// Display side of the viewer.
pub trait OverlayRenderer: Send {
    /// Drop the current overlay. In-flight fetches keep running; their late
    /// events carry a stale id.
    fn remove_overlay(&mut self);

    /// Show `overlay`, reporting lifecycle events tagged with `id`.
    fn add_overlay(&mut self, id: OverlayId, overlay: &RequestedOverlay);
}

/// Fetches overlays as WMS GetMap images.
pub struct HttpOverlayRenderer {
    client: Client,
    endpoint: String,
    credentials: Credentials,
    viewport: Viewport,
    events: UnboundedSender<ViewerEvent>,
    output: Option<PathBuf>,
    /// Most recently added overlay; only its image is written to `output`.
    latest: Arc<AtomicU64>,
    /// Serializes the final rename into `output`.
    publish: Arc<Mutex<()>>,
}

impl HttpOverlayRenderer {
    pub fn new(
        client: Client,
        config: &ViewerConfig,
        events: UnboundedSender<ViewerEvent>,
        output: Option<PathBuf>,
    ) -> Self {
        Self {
            client,
            endpoint: config.wms_url(),
            credentials: config.credentials.clone(),
            viewport: config.viewport,
            events,
            output,
            latest: Arc::new(AtomicU64::new(0)),
            publish: Arc::new(Mutex::new(())),
        }
    }

    fn log_view(&self, id: OverlayId, overlay: &RequestedOverlay) {
        let padding = FIT_PADDING_PX / self.viewport.width.max(1) as f64;
        match fit_extent(&overlay.extent, padding) {
            Ok(view) => info!(
                overlay = %id,
                layer = %overlay.server_layer_name,
                view = %view.wms_bbox(),
                crs = %view.crs,
                "Fitting view to overlay extent"
            ),
            Err(e) => warn!(overlay = %id, error = %e, "Cannot fit view to overlay extent"),
        }
    }
}

impl OverlayRenderer for HttpOverlayRenderer {
    fn remove_overlay(&mut self) {
        debug!(overlay = self.latest.load(Ordering::SeqCst), "Removing overlay");
    }

    fn add_overlay(&mut self, id: OverlayId, overlay: &RequestedOverlay) {
        self.latest.store(id.get(), Ordering::SeqCst);
        self.log_view(id, overlay);

        let request = GetMapRequest::from_overlay(overlay, &self.endpoint, self.viewport);
        if self.events.send(ViewerEvent::Lifecycle(LoadEvent::Start(id))).is_err() {
            debug!(overlay = %id, "Session closed before overlay started");
        }

        let fetch = OverlayFetch {
            id,
            request,
            client: self.client.clone(),
            credentials: self.credentials.clone(),
            events: self.events.clone(),
            output: self.output.clone(),
            latest: self.latest.clone(),
            publish: self.publish.clone(),
        };
        tokio::spawn(fetch.run());
    }
}

/// One background GetMap fetch.
struct OverlayFetch {
    id: OverlayId,
    request: GetMapRequest,
    client: Client,
    credentials: Credentials,
    events: UnboundedSender<ViewerEvent>,
    output: Option<PathBuf>,
    latest: Arc<AtomicU64>,
    publish: Arc<Mutex<()>>,
}

impl OverlayFetch {
    async fn run(self) {
        let event = match self.request.fetch(&self.client, &self.credentials).await {
            Ok(image) => {
                info!(overlay = %self.id, bytes = image.len(), "Overlay loaded");
                if let Some(path) = &self.output {
                    if let Err(e) = self.store(path, &image).await {
                        warn!(path = %path.display(), error = %e, "Failed to write overlay image");
                    }
                }
                LoadEvent::End(self.id)
            }
            Err(e) => LoadEvent::Error(self.id, e.to_string()),
        };

        if self.events.send(ViewerEvent::Lifecycle(event)).is_err() {
            debug!(overlay = %self.id, "Session closed before overlay finished");
        }
    }

    fn is_latest(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.id.get()
    }

    /// Stage the image next to `path`, then rename it into place while still
    /// the latest overlay. A superseded fetch never touches `path`.
    async fn store(&self, path: &Path, image: &[u8]) -> io::Result<()> {
        if !self.is_latest() {
            debug!(overlay = %self.id, "Skipping image of superseded overlay");
            return Ok(());
        }

        let staging = path.with_extension(format!("{}.part", self.id.get()));
        tokio::fs::write(&staging, image).await?;

        let _guard = self.publish.lock().await;
        if self.is_latest() {
            tokio::fs::rename(&staging, path).await
        } else {
            debug!(overlay = %self.id, "Dropping image of superseded overlay");
            tokio::fs::remove_file(&staging).await
        }
    }
}
