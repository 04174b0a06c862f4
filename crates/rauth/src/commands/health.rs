//! Health command - probes the session API.

use anyhow::Result;
use clap::Args;
use console::{Style, style};
use serde::Serialize;

use super::Context;

/// Arguments for the health command.
#[derive(Args, Debug)]
pub struct HealthArgs {}

/// Health response for JSON output.
#[derive(Debug, Serialize)]
struct HealthOutput {
    healthy: bool,
    base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Run the health command.
pub async fn run(_args: HealthArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let base_url = client.base_url().to_string();

    let (healthy, error) = match client.health().await {
        Ok(healthy) => (healthy, None),
        Err(e) => (false, Some(e.to_string())),
    };

    if ctx.json_output {
        let output = HealthOutput {
            healthy,
            base_url,
            error,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let dim = Style::new().dim();
    let status = if healthy {
        Style::new().green().apply_to("● healthy")
    } else {
        Style::new().red().apply_to("● unreachable")
    };

    println!();
    println!("{}", style("Rauth API Health").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!();
    println!("  {} {}", dim.apply_to("Status:"), status);
    println!("  {} {}", dim.apply_to("API:"), base_url);
    if let (true, Some(error)) = (ctx.verbose, &error) {
        println!("  {} {}", dim.apply_to("Error:"), error);
    }
    println!();

    Ok(())
}
