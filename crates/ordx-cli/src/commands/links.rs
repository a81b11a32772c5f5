//! Links command - order numbers from exported notification emails.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use ordx_core::email::{extract_order_numbers, filter_messages, order_url, EmailMessage, Period};

use super::load_config;

/// Arguments for the links command.
#[derive(Args)]
pub struct LinksArgs {
    /// JSON file holding an array of messages
    #[arg(required = true)]
    messages: PathBuf,

    /// Only messages received in this month (YYYY-MM)
    #[arg(short, long)]
    period: Option<String>,

    /// Exact subject to match, ignoring case (default: from configuration; "" matches all)
    #[arg(short, long)]
    subject: Option<String>,

    /// Print JSON instead of one line per order
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct OrderLink {
    order_no: String,
    url: String,
}

pub async fn run(args: LinksArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.messages.exists() {
        anyhow::bail!("Messages file not found: {}", args.messages.display());
    }

    let content = fs::read_to_string(&args.messages)?;
    let messages: Vec<EmailMessage> = serde_json::from_str(&content)?;

    let selected: Vec<&EmailMessage> = match &args.period {
        Some(period) => {
            let period: Period = period.parse()?;
            let selected = filter_messages(&messages, &period);
            info!(
                "{} of {} messages received in {}",
                selected.len(),
                messages.len(),
                period
            );
            selected
        }
        None => messages.iter().collect(),
    };

    let subject = args
        .subject
        .as_deref()
        .unwrap_or(&config.email.subject_filter);
    let numbers = extract_order_numbers(selected, Some(subject));

    let links = numbers
        .into_iter()
        .map(|order_no| {
            let url = order_url(&config.email.order_url_template, &order_no)?;
            Ok(OrderLink { order_no, url })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&links)?);
        return Ok(());
    }

    if links.is_empty() {
        eprintln!("{} No order numbers found.", style("ℹ").blue());
        return Ok(());
    }

    for link in &links {
        println!("{}\t{}", link.order_no, link.url);
    }
    eprintln!(
        "{} Found {} unique orders",
        style("✓").green(),
        links.len()
    );

    Ok(())
}
