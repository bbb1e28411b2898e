//! Prediction listing command

use crate::error::CliResult;
use crate::output::{colorize_risk, print_json, print_output, OutputFormat};
use clap::Args;
use flood_map::{PredictionClient, PredictionSource};
use flood_types::ZoneSummary;
use serde::Serialize;
use tabled::Tabled;

#[derive(Args)]
pub struct PredictArgs {
    /// Print the artifact exactly as the service returned it
    #[arg(long)]
    pub raw: bool,
}

#[derive(Debug, Serialize, Tabled)]
struct ZoneRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Risk")]
    risk: String,
    #[tabled(rename = "Probability")]
    probability: String,
    #[tabled(rename = "Warning")]
    warning: String,
    #[tabled(rename = "Geometry")]
    geometry: String,
}

impl From<ZoneSummary> for ZoneRow {
    fn from(zone: ZoneSummary) -> Self {
        let dash = || "-".to_string();
        Self {
            index: zone.index,
            id: zone.id.unwrap_or_else(dash),
            risk: zone.raw_risk_level.unwrap_or_else(dash),
            probability: zone
                .probability
                .map(|p| format!("{:.2}", p))
                .unwrap_or_else(dash),
            warning: zone.warning.unwrap_or_else(dash),
            geometry: zone.geometry_type.unwrap_or_else(dash),
        }
    }
}

/// Fetch the current prediction and list its zones.
pub async fn execute(
    args: PredictArgs,
    client: &PredictionClient,
    format: OutputFormat,
) -> CliResult<()> {
    let artifact = client.fetch_prediction().await?;

    if args.raw {
        return print_json(artifact.as_value());
    }

    let zones = artifact.zone_summaries()?;
    match format {
        OutputFormat::Json => print_json(&zones),
        OutputFormat::Table => {
            let rows: Vec<ZoneRow> = zones
                .into_iter()
                .map(ZoneRow::from)
                .map(|mut row| {
                    row.risk = colorize_risk(&row.risk).to_string();
                    row
                })
                .collect();
            print_output(rows, format)
        }
    }
}
