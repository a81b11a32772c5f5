//! Parse command - extract the summary of a single order page.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use ordx_core::email::order_url;
use ordx_core::order::rules::format_money;
use ordx_core::order::{ExtractionResult, OrderParser, OrderSource, RuleOrderParser};
use ordx_core::OrderSummary;

use super::load_config;

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Order page (.html/.htm, or plain visible text)
    #[arg(required = true)]
    input: PathBuf,

    /// Order number (default: input file name without extension)
    #[arg(long)]
    order: Option<String>,

    /// Order page URL (default: built from the configured URL template)
    #[arg(long)]
    url: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Check that the money fields add up
    #[arg(long)]
    validate: bool,

    /// Show extraction warnings and timing
    #[arg(long)]
    show_warnings: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let order_id = match args.order.clone() {
        Some(order) => order,
        None => order_id_from_path(&args.input)?,
    };
    let url = match args.url.clone() {
        Some(url) => url,
        None => order_url(&config.email.order_url_template, &order_id)?,
    };

    info!("Parsing order {} from {}", order_id, args.input.display());

    let parser = RuleOrderParser::from_config(&config.extraction);
    let result = parse_page(&args.input, &parser, &OrderSource::new(order_id, url))?;

    if args.validate {
        let issues = result.order.check_totals();
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    let output = format_order(&result.order, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_warnings {
        eprintln!();
        for warning in &result.warnings {
            eprintln!("{} {}", style("⚠").yellow(), warning);
        }
        eprintln!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            result.processing_time_ms
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Whether a path looks like an HTML page.
pub fn is_html(path: &Path) -> bool {
    matches!(extension(path).as_str(), "html" | "htm")
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Order number taken from a page's file name.
pub fn order_id_from_path(path: &Path) -> anyhow::Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("Cannot derive an order number from {}", path.display()))
}

/// Read and parse one order page. HTML pages also yield item tiles.
pub fn parse_page(
    path: &Path,
    parser: &RuleOrderParser,
    source: &OrderSource,
) -> anyhow::Result<ExtractionResult> {
    let content = fs::read_to_string(path)?;

    let result = if is_html(path) {
        parser.parse_html(&content, source)?
    } else {
        parser.parse(&content, source, Vec::new())?
    };

    Ok(result)
}

pub fn format_order(order: &OrderSummary, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(order)?),
        OutputFormat::Csv => format_csv(order),
        OutputFormat::Text => Ok(order.render_text()),
    }
}

/// Column names shared by single-order CSV output and the batch summary.
pub const CSV_COLUMNS: [&str; 11] = [
    "order_id", "url", "date", "payment", "name", "subtotal", "discount", "delivery", "taxes",
    "total", "items",
];

/// CSV cells for an order, in [`CSV_COLUMNS`] order.
pub fn csv_record(order: &OrderSummary) -> [String; 11] {
    [
        order.order_id().to_string(),
        order.url().to_string(),
        order.date().unwrap_or_default().to_string(),
        order.payment().unwrap_or_default().to_string(),
        order.name().unwrap_or_default().to_string(),
        format_money(order.subtotal()),
        format_money(order.discount()),
        format_money(order.delivery()),
        format_money(order.taxes()),
        format_money(order.total()),
        order.items().len().to_string(),
    ]
}

fn format_csv(order: &OrderSummary) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_COLUMNS)?;
    wtr.write_record(csv_record(order))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}
