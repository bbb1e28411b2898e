//! Flood Types - Core types for flood prediction delivery
//!
//! Shared between the prediction daemon and the map client.
//!
//! ## Key Concepts
//!
//! - **PredictionArtifact**: the feature collection produced by the external
//!   predictive computation, held immutably and replaced wholesale
//! - **RiskLevel**: categorical label (`low`/`moderate`/`high`/other) carried by
//!   each zone
//! - **GeoBounds**: latitude/longitude rectangles used for the fixed viewport
//!   and overlay extents
//! - **ErrorBody**: the JSON error envelope returned by the prediction endpoint

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod artifact;
pub mod error_body;
pub mod geo;
pub mod risk;

pub use artifact::{ArtifactError, PredictionArtifact, ZoneSummary};
pub use error_body::ErrorBody;
pub use geo::{GeoBounds, LatLng, CHENNAI_BOUNDS, CHENNAI_CENTER};
pub use risk::RiskLevel;

/// Path of the prediction endpoint served by the daemon.
pub const PREDICTION_PATH: &str = "/flood-prediction";

/// Client-facing route for the prediction endpoint.
pub const API_PREDICTION_PATH: &str = "/api/flood-prediction";
