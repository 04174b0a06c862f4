//! Config command - prints the resolved configuration.

use anyhow::Result;
use clap::Args;
use console::{Style, style};

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Also check that required credentials are present
    #[arg(long)]
    pub check: bool,
}

/// Run the config command. Secrets are always masked.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    let validation = args.check.then(|| ctx.config.validate());

    if ctx.json_output {
        let mut value = serde_json::to_value(ctx.config.masked())?;
        if let Some(result) = &validation {
            value["valid"] = serde_json::Value::Bool(result.is_ok());
            if let Err(e) = result {
                value["error"] = serde_json::Value::String(e.to_string());
            }
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        let dim = Style::new().dim();
        let source = ctx
            .config_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(defaults)".to_string());

        println!();
        println!("{}", style("Rauth Configuration").bold());
        println!("{}", dim.apply_to("─".repeat(40)));
        println!("  {} {}", dim.apply_to("Source:"), source);
        println!();
        print!("{}", ctx.config.to_masked_toml()?);

        if let Some(result) = &validation {
            println!();
            match result {
                Ok(()) => println!("{}", Style::new().green().apply_to("✓ configuration is valid")),
                Err(e) => println!("{} {}", Style::new().red().apply_to("✗"), e),
            }
        }
        println!();
    }

    match validation {
        Some(Err(e)) => Err(e.into()),
        _ => Ok(()),
    }
}
