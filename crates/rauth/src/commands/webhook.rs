//! Webhook command - replays recorded webhook deliveries into an engine.

use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use console::{Style, style};
use rauth_session::{EngineStats, WebhookEvent, WebhookOutcome, redact};
use serde::Serialize;

use super::Context;

/// Arguments for the webhook command.
#[derive(Args, Debug)]
pub struct WebhookArgs {
    /// File with one JSON event per line (`-` for stdin)
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
struct EventOutput {
    line: usize,
    token: String,
    outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct WebhookOutput {
    events: Vec<EventOutput>,
    failed: usize,
    stats: EngineStats,
}

/// Run the webhook command.
pub async fn run(args: WebhookArgs, ctx: &Context) -> Result<()> {
    let engine = ctx.engine()?;

    let reader: Box<dyn BufRead> = if args.file.as_os_str() == "-" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let file = std::fs::File::open(&args.file)
            .with_context(|| format!("opening {}", args.file.display()))?;
        Box::new(BufReader::new(file))
    };

    let mut events = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.context("reading webhook events")?;
        if line.trim().is_empty() {
            continue;
        }

        let result = WebhookEvent::from_json(line.as_bytes()).and_then(|event| {
            let outcome = engine.handle_webhook(&event)?;
            Ok((event, outcome))
        });

        events.push(match result {
            Ok((event, outcome)) => EventOutput {
                line: idx + 1,
                token: redact(&event.session_token),
                outcome: describe(&outcome),
                error: None,
            },
            Err(e) => EventOutput {
                line: idx + 1,
                token: String::new(),
                outcome: "failed".to_string(),
                error: Some(e.to_string()),
            },
        });
    }

    let output = WebhookOutput {
        failed: events.iter().filter(|e| e.error.is_some()).count(),
        events,
        stats: engine.stats(),
    };

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let dim = Style::new().dim();
    let red = Style::new().red();

    println!();
    println!("{}", style("Webhook Replay").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    for event in &output.events {
        match &event.error {
            Some(error) => println!(
                "  {} {} {}",
                dim.apply_to(format!("{:>4}", event.line)),
                red.apply_to("failed"),
                error
            ),
            None => println!(
                "  {} {:<24} {}",
                dim.apply_to(format!("{:>4}", event.line)),
                event.outcome,
                dim.apply_to(&event.token)
            ),
        }
    }
    println!();
    println!(
        "  {} {} ({} active)",
        dim.apply_to("Revoked tokens:"),
        output.stats.revocations.total,
        output.stats.revocations.active
    );
    println!("  {} {}", dim.apply_to("Failed events:"), output.failed);
    println!();

    Ok(())
}

fn describe(outcome: &WebhookOutcome) -> String {
    match outcome {
        WebhookOutcome::Revoked => "revoked".to_string(),
        WebhookOutcome::Ignored(kind) => format!("ignored ({kind})"),
        WebhookOutcome::Unrecognized(kind) => format!("unrecognized ({kind})"),
    }
}
