//! Verify command - checks one session token against the API.

use anyhow::Result;
use clap::Args;
use console::Style;
use rauth_session::redact;
use serde::Serialize;

use super::Context;

/// Arguments for the verify command.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Session token issued by the API
    #[arg(long)]
    pub token: String,

    /// Phone number the session should belong to
    #[arg(long)]
    pub phone: String,
}

#[derive(Debug, Serialize)]
struct VerifyOutput {
    token: String,
    verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

/// Run the verify command.
///
/// A definite "no" (revoked, mismatched phone) is reported as output; remote
/// and configuration failures are returned as errors.
pub async fn run(args: VerifyArgs, ctx: &Context) -> Result<()> {
    let engine = ctx.engine()?;

    let (verified, reason) = match engine.verify_session(&args.token, &args.phone).await {
        Ok(verified) => (verified, None),
        Err(e) if e.is_definitely_invalid() => (false, Some(e.to_string())),
        Err(e) => return Err(e.into()),
    };

    if ctx.json_output {
        let output = VerifyOutput {
            token: redact(&args.token),
            verified,
            reason,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let dim = Style::new().dim();
    if verified {
        println!("{}", Style::new().green().apply_to("✓ session verified"));
    } else {
        println!("{}", Style::new().red().apply_to("✗ session not verified"));
    }
    println!("  {} {}", dim.apply_to("Token:"), redact(&args.token));
    println!("  {} {}", dim.apply_to("Phone:"), args.phone);
    if let Some(reason) = reason {
        println!("  {} {}", dim.apply_to("Reason:"), reason);
    }

    Ok(())
}
