//! Map controller
//!
//! Drives one map instance through its lifecycle:
//!
//! ```text
//! Uninitialized -> Initializing -> AwaitingData -> Rendered
//!                                              \-> Errored
//! ```
//!
//! The base map is set up once. The prediction is fetched once per controller;
//! a new fetch needs a new controller. At most one zone overlay is attached
//! at any time, and the surface is released when the controller is dropped.

use crate::client::PredictionSource;
use crate::error::{MapError, MapResult, TransportError};
use crate::overlay::ZoneOverlay;
use crate::surface::{LayerId, MapSurface, Viewport};
use flood_types::{GeoBounds, PredictionArtifact};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

/// Prefix of the message shown when an artifact cannot be drawn.
pub const RENDER_ERROR_PREFIX: &str = "Error displaying flood zones: ";

/// Lifecycle state of a map controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderState {
    Uninitialized,
    Initializing,
    AwaitingData,
    Rendered,
    Errored,
}

impl fmt::Display for RenderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RenderState::Uninitialized => "uninitialized",
            RenderState::Initializing => "initializing",
            RenderState::AwaitingData => "awaiting_data",
            RenderState::Rendered => "rendered",
            RenderState::Errored => "errored",
        };
        f.write_str(s)
    }
}

/// The zone overlay currently attached to the surface.
///
/// Owned exclusively by the controller; replaced, never shared.
#[derive(Debug, PartialEq)]
pub struct ZoneLayerHandle {
    layer: LayerId,
    zones: usize,
    popups: usize,
    bounds: GeoBounds,
}

impl ZoneLayerHandle {
    pub fn layer(&self) -> LayerId {
        self.layer
    }

    pub fn zone_count(&self) -> usize {
        self.zones
    }

    pub fn popup_count(&self) -> usize {
        self.popups
    }

    pub fn bounds(&self) -> GeoBounds {
        self.bounds
    }
}

/// Map lifecycle controller over a surface `S` fed by source `P`.
pub struct MapController<S: MapSurface, P: PredictionSource> {
    surface: S,
    source: P,
    viewport: Viewport,
    state: RenderState,
    loading: bool,
    error: Option<String>,
    base_layer: Option<LayerId>,
    overlay: Option<ZoneLayerHandle>,
}

impl<S: MapSurface, P: PredictionSource> MapController<S, P> {
    pub fn new(surface: S, source: P) -> Self {
        Self {
            surface,
            source,
            viewport: Viewport::default(),
            state: RenderState::Uninitialized,
            loading: false,
            error: None,
            base_layer: None,
            overlay: None,
        }
    }

    /// Replace the default Chennai viewport. Only meaningful before [`initialize`](Self::initialize).
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Text to show in place of the map, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn overlay(&self) -> Option<&ZoneLayerHandle> {
        self.overlay.as_ref()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Create the base map: fixed view, tile layer, panning limits and the initial fit to them.
    pub fn initialize(&mut self) -> MapResult<()> {
        if self.state != RenderState::Uninitialized {
            return Err(MapError::AlreadyStarted);
        }

        self.state = RenderState::Initializing;
        self.loading = true;

        self.surface.set_view(self.viewport.center, self.viewport.zoom);
        self.base_layer = Some(self.surface.add_tile_layer(&self.viewport.tiles));
        self.surface.set_max_bounds(self.viewport.max_bounds);
        self.surface.fit_bounds(self.viewport.max_bounds);

        debug!(
            lat = self.viewport.center.lat,
            lng = self.viewport.center.lng,
            zoom = self.viewport.zoom,
            "Base map initialized"
        );
        Ok(())
    }

    /// Fetch the prediction once and apply it.
    pub async fn load(&mut self) -> MapResult<RenderState> {
        match self.state {
            RenderState::Initializing => {}
            RenderState::Uninitialized => return Err(MapError::NotReady(self.state)),
            _ => return Err(MapError::AlreadyStarted),
        }

        self.state = RenderState::AwaitingData;
        self.loading = true;
        self.error = None;

        let result = self.source.fetch_prediction().await;
        self.apply_prediction(result);
        Ok(self.state)
    }

    /// Initialize the base map, then fetch and render.
    pub async fn start(&mut self) -> MapResult<RenderState> {
        self.initialize()?;
        self.load().await
    }

    /// Apply the outcome of the outstanding fetch.
    ///
    /// Ignored unless a fetch is outstanding.
    pub fn apply_prediction(&mut self, result: Result<PredictionArtifact, TransportError>) {
        if self.state != RenderState::AwaitingData {
            warn!(state = %self.state, "Discarding prediction result");
            return;
        }

        match result {
            Ok(artifact) => {
                if let Err(err) = self.render(&artifact) {
                    debug!("Prediction not rendered: {}", err);
                }
            }
            Err(err) => {
                warn!(status = ?err.status(), "Failed to fetch flood prediction: {}", err);
                self.loading = false;
                self.error = Some(err.to_string());
                self.state = RenderState::Errored;
            }
        }
    }

    /// Show `artifact` as the zone overlay, replacing any previous one.
    ///
    /// The new overlay is fully built before the old one is removed, so on
    /// failure the previous overlay stays visible.
    pub fn render(&mut self, artifact: &PredictionArtifact) -> MapResult<()> {
        if self.state == RenderState::Uninitialized {
            return Err(MapError::NotReady(self.state));
        }

        let built = ZoneOverlay::build(artifact);
        self.loading = false;

        let overlay = match built {
            Ok(overlay) => overlay,
            Err(err) => {
                warn!("Failed to render flood zones: {}", err);
                self.error = Some(format!("{}{}", RENDER_ERROR_PREFIX, err));
                self.state = RenderState::Errored;
                return Err(err.into());
            }
        };

        if let Some(previous) = self.overlay.take() {
            self.surface.remove_layer(previous.layer);
        }
        let layer = self.surface.add_overlay(&overlay);
        self.surface.fit_bounds(overlay.bounds());

        info!(
            zones = overlay.len(),
            popups = overlay.popup_count(),
            "Flood zones rendered"
        );

        self.overlay = Some(ZoneLayerHandle {
            layer,
            zones: overlay.len(),
            popups: overlay.popup_count(),
            bounds: overlay.bounds(),
        });
        self.error = None;
        self.state = RenderState::Rendered;
        Ok(())
    }
}

impl<S: MapSurface, P: PredictionSource> Drop for MapController<S, P> {
    fn drop(&mut self) {
        if self.state == RenderState::Uninitialized {
            return;
        }
        if let Some(overlay) = self.overlay.take() {
            self.surface.remove_layer(overlay.layer);
        }
        if let Some(base) = self.base_layer.take() {
            self.surface.remove_layer(base);
        }
        self.surface.release();
        debug!(state = %self.state, "Map released");
    }
}
