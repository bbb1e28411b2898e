//! Service status command

use crate::error::CliResult;
use crate::output::{print_json, print_success, print_warning, OutputFormat};
use flood_map::PredictionClient;

/// Check that the prediction service is up and has its script.
pub async fn execute(client: &PredictionClient, format: OutputFormat) -> CliResult<()> {
    let status = client.health().await?;

    if let OutputFormat::Json = format {
        return print_json(&status);
    }

    if status.script_present {
        print_success("Flood prediction service is healthy");
    } else {
        print_warning("Flood prediction service is up but the prediction script is missing");
    }
    println!("  Endpoint: {}", client.base_url());
    println!("  Version: {}", status.version);
    println!("  Uptime: {}", status.uptime);
    println!("  Script: {}", status.script);
    println!("  Idle workers: {}", status.idle_workers);
    Ok(())
}
