use clap::Parser;
use migramap::batch::BatchRunner;
use migramap::geocode::ResolveEngine;
use migramap::ingest::read_records;
use migramap::map::{marker_for, render_map};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// migramap — village address list to map
///
/// Geocodes a CSV of village/district/state addresses through a layered
/// provider chain and writes an interactive map.
///
/// Examples:
///   migramap villages.csv
///   migramap villages.csv --out relief-map.html
///   migramap villages.csv --delay-ms 1000 --timeout 15
///   migramap --serve --port 8080
#[derive(Parser)]
#[command(name = "migramap", version, about, long_about = None)]
struct Cli {
    /// Input CSV (Full_Location, Type, Families, Village[, Label]).
    #[arg(index = 1)]
    input: Option<PathBuf>,

    /// Output path for the rendered map.
    #[arg(long, default_value = "map.html")]
    out: PathBuf,

    /// Delay between records in milliseconds (provider rate limiting).
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,

    /// Per-provider-call timeout in seconds.
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Run the upload web UI instead of a one-shot batch.
    #[arg(long, conflicts_with = "input")]
    serve: bool,

    /// Bind address for --serve.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port for --serve.
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[derive(Serialize)]
struct RunSummary {
    success: usize,
    partial: usize,
    failed: usize,
    failed_list: Vec<String>,
    map: String,
}

fn main() {
    let cli = Cli::parse();
    let delay = Duration::from_millis(cli.delay_ms);
    let timeout = Duration::from_secs(cli.timeout);

    if cli.serve {
        let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("Error: Cannot start async runtime: {}", e);
            std::process::exit(1);
        });
        runtime.block_on(migramap::server::start(&cli.host, cli.port, delay, timeout));
        return;
    }

    let Some(input) = cli.input else {
        eprintln!("Error: No input file specified.");
        eprintln!();
        eprintln!("Usage:");
        eprintln!("  migramap villages.csv");
        eprintln!("  migramap villages.csv --out relief-map.html");
        eprintln!("  migramap --serve --port 8080");
        std::process::exit(1);
    };

    let records = read_records(&input).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    eprintln!("  {} records from {}", records.len(), input.display());

    let engine = ResolveEngine::new().with_timeout(timeout);
    let runner = BatchRunner::new(engine).with_delay(delay);
    let report = runner.run(&records);

    let mut markers = Vec::new();
    let mut points = Vec::new();
    for (record, outcome) in records.iter().zip(&report.outcomes) {
        if let Some(point) = outcome.point() {
            markers.push(marker_for(record, point));
            points.push((point.lat, point.lon));
        }
    }

    let html = render_map(&markers, &points);
    std::fs::write(&cli.out, html).unwrap_or_else(|e| {
        eprintln!("Error: Cannot write {}: {}", cli.out.display(), e);
        std::process::exit(1);
    });
    eprintln!("  map written to {}", cli.out.display());

    // Summary to stderr, machine-readable stats to stdout.
    eprintln!(
        "  done: {} exact, {} approximate, {} failed",
        report.stats.success,
        report.stats.partial,
        report.stats.failed(),
    );

    let summary = RunSummary {
        success: report.stats.success,
        partial: report.stats.partial,
        failed: report.stats.failed(),
        failed_list: report.stats.failed_list,
        map: cli.out.display().to_string(),
    };
    println!("{}", serde_json::to_string_pretty(&summary).unwrap());
}
