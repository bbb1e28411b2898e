//! Map surface abstraction
//!
//! The controller drives a [`MapSurface`]; a concrete backend (a browser map,
//! a tile renderer) implements it. [`RecordingSurface`] is a headless backend
//! that records every call.

use crate::overlay::ZoneOverlay;
use flood_types::{GeoBounds, LatLng, CHENNAI_BOUNDS, CHENNAI_CENTER};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

/// Identifier of a layer attached to a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LayerId(pub u64);

/// Base tile layer description.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayerSpec {
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl Default for TileLayerSpec {
    fn default() -> Self {
        Self {
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "© OpenStreetMap contributors".to_string(),
            max_zoom: 19,
        }
    }
}

/// Initial view and panning limits of the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: u8,
    pub max_bounds: GeoBounds,
    pub tiles: TileLayerSpec,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: CHENNAI_CENTER,
            zoom: 12,
            max_bounds: CHENNAI_BOUNDS,
            tiles: TileLayerSpec::default(),
        }
    }
}

/// Rendering backend driven by the map controller.
pub trait MapSurface {
    fn set_view(&mut self, center: LatLng, zoom: u8);

    fn add_tile_layer(&mut self, tiles: &TileLayerSpec) -> LayerId;

    /// Restrict panning to `bounds`.
    fn set_max_bounds(&mut self, bounds: GeoBounds);

    fn fit_bounds(&mut self, bounds: GeoBounds);

    fn add_overlay(&mut self, overlay: &ZoneOverlay) -> LayerId;

    fn remove_layer(&mut self, layer: LayerId);

    /// Tear the map down. Called once, when the controller goes away.
    fn release(&mut self);
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    SetView { center: LatLng, zoom: u8 },
    AddTileLayer { layer: LayerId, url_template: String },
    SetMaxBounds(GeoBounds),
    FitBounds(GeoBounds),
    AddOverlay { layer: LayerId, zones: usize },
    RemoveLayer(LayerId),
    Release,
}

#[derive(Debug, Default)]
struct Recording {
    next_id: u64,
    events: Vec<SurfaceEvent>,
    overlays: Vec<(LayerId, ZoneOverlay)>,
    tile_layers: Vec<LayerId>,
    peak_overlays: usize,
    released: bool,
}

/// Headless surface that records calls.
///
/// Clones share the same recording, so a test can keep a clone while the
/// controller owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    inner: Arc<Mutex<Recording>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.inner.lock().events.clone()
    }

    /// Overlays currently attached, oldest first.
    pub fn overlays(&self) -> Vec<ZoneOverlay> {
        self.inner.lock().overlays.iter().map(|(_, o)| o.clone()).collect()
    }

    pub fn overlay_count(&self) -> usize {
        self.inner.lock().overlays.len()
    }

    /// Most overlays ever attached at the same time.
    pub fn peak_overlays(&self) -> usize {
        self.inner.lock().peak_overlays
    }

    pub fn tile_layer_count(&self) -> usize {
        self.inner.lock().tile_layers.len()
    }

    pub fn is_released(&self) -> bool {
        self.inner.lock().released
    }

    fn next_layer(rec: &mut Recording) -> LayerId {
        rec.next_id += 1;
        LayerId(rec.next_id)
    }
}

impl MapSurface for RecordingSurface {
    fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.inner.lock().events.push(SurfaceEvent::SetView { center, zoom });
    }

    fn add_tile_layer(&mut self, tiles: &TileLayerSpec) -> LayerId {
        let mut rec = self.inner.lock();
        let layer = Self::next_layer(&mut rec);
        rec.tile_layers.push(layer);
        rec.events.push(SurfaceEvent::AddTileLayer {
            layer,
            url_template: tiles.url_template.clone(),
        });
        layer
    }

    fn set_max_bounds(&mut self, bounds: GeoBounds) {
        self.inner.lock().events.push(SurfaceEvent::SetMaxBounds(bounds));
    }

    fn fit_bounds(&mut self, bounds: GeoBounds) {
        self.inner.lock().events.push(SurfaceEvent::FitBounds(bounds));
    }

    fn add_overlay(&mut self, overlay: &ZoneOverlay) -> LayerId {
        let mut rec = self.inner.lock();
        let layer = Self::next_layer(&mut rec);
        rec.overlays.push((layer, overlay.clone()));
        rec.peak_overlays = rec.peak_overlays.max(rec.overlays.len());
        rec.events.push(SurfaceEvent::AddOverlay {
            layer,
            zones: overlay.len(),
        });
        layer
    }

    fn remove_layer(&mut self, layer: LayerId) {
        let mut rec = self.inner.lock();
        rec.overlays.retain(|(id, _)| *id != layer);
        rec.tile_layers.retain(|id| *id != layer);
        rec.events.push(SurfaceEvent::RemoveLayer(layer));
    }

    fn release(&mut self) {
        let mut rec = self.inner.lock();
        rec.overlays.clear();
        rec.tile_layers.clear();
        rec.released = true;
        rec.events.push(SurfaceEvent::Release);
    }
}
