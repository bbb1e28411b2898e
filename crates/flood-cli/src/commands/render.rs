//! Headless render command
//!
//! Mounts a map controller over a recording surface and reports what the map
//! would show.

use crate::error::{CliError, CliResult};
use crate::output::{colorize_risk, print_json, print_success, OutputFormat};
use flood_map::{MapController, PredictionClient, RecordingSurface, RenderState, ZoneOverlay};
use flood_types::GeoBounds;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
struct RenderReport {
    state: RenderState,
    zones: usize,
    popups: usize,
    /// Zone count per fill colour
    colors: BTreeMap<String, usize>,
    /// Zone count per risk level
    risk_levels: BTreeMap<String, usize>,
    bounds: Option<GeoBounds>,
    error: Option<String>,
}

impl RenderReport {
    fn new(state: RenderState, overlay: Option<&ZoneOverlay>, error: Option<&str>) -> Self {
        let mut colors = BTreeMap::new();
        let mut risk_levels = BTreeMap::new();
        if let Some(overlay) = overlay {
            for zone in overlay.zones() {
                *colors.entry(zone.style.fill_color.to_string()).or_insert(0) += 1;
                *risk_levels.entry(zone.risk_level.to_string()).or_insert(0) += 1;
            }
        }

        Self {
            state,
            zones: overlay.map_or(0, ZoneOverlay::len),
            popups: overlay.map_or(0, ZoneOverlay::popup_count),
            colors,
            risk_levels,
            bounds: overlay.map(ZoneOverlay::bounds),
            error: error.map(str::to_string),
        }
    }
}

/// Fetch the prediction through a map controller and report the result.
pub async fn execute(client: PredictionClient, format: OutputFormat) -> CliResult<()> {
    let surface = RecordingSurface::new();
    let mut map = MapController::new(surface.clone(), client);

    let state = map.start().await?;
    let overlay = surface.overlays().pop();
    let report = RenderReport::new(state, overlay.as_ref(), map.error_message());
    drop(map);

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => print_report(&report),
    }

    match (state, report.error) {
        (RenderState::Errored, Some(message)) => Err(CliError::Render(message)),
        _ => Ok(()),
    }
}

fn print_report(report: &RenderReport) {
    if report.state == RenderState::Rendered {
        print_success(&format!("Rendered {} flood zones", report.zones));
    } else {
        println!("State: {}", report.state);
        return;
    }

    println!("  Popups: {}", report.popups);
    for (level, count) in &report.risk_levels {
        println!("  {}: {}", colorize_risk(level), count);
    }
    for (color, count) in &report.colors {
        println!("  Fill {}: {}", color, count);
    }
    if let Some(b) = report.bounds {
        println!(
            "  Extent: {:.4},{:.4} to {:.4},{:.4}",
            b.south, b.west, b.north, b.east
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flood_types::PredictionArtifact;
    use serde_json::json;

    #[test]
    fn test_report_counts_zones_by_color() {
        let overlay = ZoneOverlay::build(&PredictionArtifact::from_value(json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "riskLevel": "high" },
                  "geometry": { "type": "Point", "coordinates": [80.20, 13.00] } },
                { "type": "Feature", "properties": { "riskLevel": "high" },
                  "geometry": { "type": "Point", "coordinates": [80.30, 13.10] } },
                { "type": "Feature",
                  "geometry": { "type": "Point", "coordinates": [80.25, 13.05] } }
            ]
        })))
        .unwrap();

        let report = RenderReport::new(RenderState::Rendered, Some(&overlay), None);
        assert_eq!(report.zones, 3);
        assert_eq!(report.popups, 2);
        assert_eq!(report.colors["#ef4444"], 2);
        assert_eq!(report.colors["#3b82f6"], 1);
        assert_eq!(report.risk_levels["high"], 2);
        assert_eq!(report.risk_levels["unknown"], 1);
    }

    #[test]
    fn test_report_without_overlay() {
        let report = RenderReport::new(RenderState::Errored, None, Some("Network Error"));
        assert_eq!(report.zones, 0);
        assert!(report.bounds.is_none());
        assert_eq!(report.error.as_deref(), Some("Network Error"));
    }
}
