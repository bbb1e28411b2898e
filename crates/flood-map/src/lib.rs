//! Flood Map - client side of flood prediction delivery
//!
//! Fetches the prediction artifact from the service and keeps a map surface
//! showing it as styled, clickable risk zones.
//!
//! ## Key Concepts
//!
//! - **PredictionClient**: HTTP client for `GET /api/flood-prediction`
//! - **ZoneOverlay**: every zone of one artifact, styled by risk level, with
//!   popups for zones that carry properties
//! - **MapSurface**: rendering backend seam; [`RecordingSurface`] is headless
//! - **MapController**: owns the surface and enforces the render lifecycle

#![deny(unsafe_code)]

pub mod client;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod overlay;
pub mod style;
pub mod surface;

pub use client::{PredictionClient, PredictionSource, ServiceStatus, DEFAULT_BASE_URL};
pub use controller::{MapController, RenderState, ZoneLayerHandle, RENDER_ERROR_PREFIX};
pub use error::{MapError, MapResult, RenderError, TransportError};
pub use geometry::Geometry;
pub use overlay::{Popup, ZoneFeature, ZoneOverlay};
pub use style::ZoneStyle;
pub use surface::{LayerId, MapSurface, RecordingSurface, SurfaceEvent, TileLayerSpec, Viewport};
