//! Batch command - parse many saved order pages concurrently.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use ordx_core::email::order_url;
use ordx_core::order::{OrderSource, RuleOrderParser};
use ordx_core::OrderSummary;

use super::load_config;
use super::parse::{csv_record, is_html, order_id_from_path, parse_page, CSV_COLUMNS};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching saved order pages (.html, .htm, .txt)
    #[arg(required = true)]
    input: String,

    /// Output directory (default: from configuration)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of pages parsed at once
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Copy each HTML page next to its summary
    #[arg(long)]
    write_html: bool,
}

/// Result of processing a single page.
struct PageResult {
    path: PathBuf,
    order: Option<OrderSummary>,
    error: Option<String>,
    processing_time_ms: u64,
}

/// Everything a worker needs to turn one page into output files.
struct PageJob {
    parser: RuleOrderParser,
    url_template: String,
    output_dir: PathBuf,
    write_html: bool,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "html" | "htm" | "txt")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} order pages to process",
        style("ℹ").blue(),
        files.len()
    );

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output.output_dir.clone());
    fs::create_dir_all(&output_dir)?;

    let job = Arc::new(PageJob {
        parser: RuleOrderParser::from_config(&config.extraction),
        url_template: config.email.order_url_template.clone(),
        output_dir: output_dir.clone(),
        write_html: args.write_html || config.output.write_html,
    });

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pages")?
            .progress_chars("=>-"),
    );

    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();

    for path in files {
        let job = Arc::clone(&job);
        let semaphore = Arc::clone(&semaphore);

        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            let page = path.clone();
            let page_start = Instant::now();

            let outcome = tokio::task::spawn_blocking(move || job.process(&page))
                .await
                .unwrap_or_else(|e| Err(anyhow::anyhow!("worker panicked: {}", e)));

            let processing_time_ms = page_start.elapsed().as_millis() as u64;
            match outcome {
                Ok(order) => PageResult {
                    path,
                    order: Some(order),
                    error: None,
                    processing_time_ms,
                },
                Err(e) => {
                    warn!("Failed to process {}: {}", path.display(), e);
                    PageResult {
                        path,
                        order: None,
                        error: Some(e.to_string()),
                        processing_time_ms,
                    }
                }
            }
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(result) => results.push(result),
            Err(e) => warn!("Batch task failed: {}", e),
        }
        progress.inc(1);
    }
    progress.finish_with_message("Complete");

    results.sort_by(|a, b| a.path.cmp(&b.path));

    let successful = results.iter().filter(|r| r.order.is_some()).count();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if args.summary {
        let summary_path = output_dir.join("summary.csv");
        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} pages in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed pages:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

impl PageJob {
    /// Parse one page and write `<order>.txt` (and `<order>.html`).
    fn process(&self, path: &Path) -> anyhow::Result<OrderSummary> {
        let order_id = order_id_from_path(path)?;
        let url = order_url(&self.url_template, &order_id)?;

        let result = parse_page(path, &self.parser, &OrderSource::new(order_id, url))?;
        let order = result.order;

        let text_path = self.output_dir.join(format!("{}.txt", order.order_id()));
        fs::write(&text_path, order.render_text())?;
        debug!("Wrote summary to {}", text_path.display());

        if self.write_html && is_html(path) {
            let html_path = self.output_dir.join(format!("{}.html", order.order_id()));
            if is_same_file(path, &html_path) {
                debug!("{} is already in the output directory", path.display());
            } else {
                fs::copy(path, &html_path)?;
            }
        }

        Ok(order)
    }
}

/// True when both paths resolve to the same file. A destination that does
/// not exist yet is never the same file.
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn write_summary(path: &Path, results: &[PageResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["filename", "status"];
    header.extend(CSV_COLUMNS);
    header.extend(["processing_time_ms", "error"]);
    wtr.write_record(&header)?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        let mut record = Vec::with_capacity(header.len());
        match &result.order {
            Some(order) => {
                record.push(filename);
                record.push("success".to_string());
                record.extend(csv_record(order));
                record.push(result.processing_time_ms.to_string());
                record.push(String::new());
            }
            None => {
                record.push(filename);
                record.push("error".to_string());
                record.extend(CSV_COLUMNS.iter().map(|_| String::new()));
                record.push(result.processing_time_ms.to_string());
                record.push(result.error.clone().unwrap_or_default());
            }
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
