mod cli;

use std::path::PathBuf;

use anyhow::{bail, Context};
use blocks_engine::{
    run_import, BlockSink, FetchSettings, ImportReport, JsonDirSink, NotionSink,
    NotionSinkSettings, ReqwestFetcher,
};
use clap::Parser;
use engine_logging::{engine_info, LogDestination};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let destination = match cli.log_file.clone() {
        Some(path) => LogDestination::Both(path),
        None => LogDestination::Terminal,
    };
    if !engine_logging::initialize(destination, cli.log_level.into()) {
        eprintln!("Warning: logging could not be initialized");
    }

    let sink = build_sink(&cli)?;
    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let request = cli.import_request();
    engine_info!("Importing {} into {}", request.source_url, request.container_id);

    let report = run_import(&fetcher, sink.as_ref(), &request)
        .await
        .with_context(|| format!("import of {} failed", request.source_url))?;
    print_report(&report, cli.dry_run.as_ref());
    Ok(())
}

fn build_sink(cli: &Cli) -> anyhow::Result<Box<dyn BlockSink>> {
    if let Some(dir) = &cli.dry_run {
        return Ok(Box::new(JsonDirSink::new(dir.clone())));
    }
    let Some(token) = cli.token.as_deref().filter(|token| !token.trim().is_empty()) else {
        bail!("no API token: pass --token, set NOTION_TOKEN, or use --dry-run DIR");
    };
    let sink = NotionSink::new(NotionSinkSettings::new(token.trim()))
        .context("failed to build API client")?;
    Ok(Box::new(sink))
}

fn print_report(report: &ImportReport, dry_run: Option<&PathBuf>) {
    println!("Source:      {} ({})", report.final_url, report.encoding);
    println!("Blocks:      {} in {} batches", report.block_count, report.batches);
    if let Some(dir) = dry_run {
        println!("Written to:  {}", dir.display());
    }
    if !report.diagnostics.is_empty() {
        println!("Skipped:     {}", report.diagnostics.len());
        for diagnostic in &report.diagnostics {
            println!("  - {diagnostic}");
        }
    }
}
