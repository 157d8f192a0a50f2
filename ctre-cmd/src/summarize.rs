//! Run the dashboard against a real source from the terminal.

use std::path::Path;
use std::time::Duration;

use clap::Args;
use ctre_dashboard::{DashboardConfig, DashboardController, LoadOutcome, ViewSlot};
use ctre_sales::cleaner::RejectionPolicy;
use ctre_sales::source::{fetch_url, read_path, DataSource};
use ctre_sales::{RawRecord, SerialNumber, SourceError};
use log::info;

use crate::render::ViewBoard;

#[derive(Args, Debug)]
pub struct SummarizeArgs {
    /// Path or http(s) URL of a JSON or CSV source, optionally gzipped
    #[arg(short, long)]
    pub source: String,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Seed for the sampling step
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the sample size cap
    #[arg(long)]
    pub max_sample_size: Option<usize>,

    /// Toggle the selection on this serial number (repeatable)
    #[arg(long = "select")]
    pub select: Vec<String>,

    /// Toggle the scatter legend filter on this property type
    #[arg(long)]
    pub legend_type: Option<String>,

    /// List every rejected record
    #[arg(long)]
    pub report_rejected: bool,

    /// Print the full view-model bundle as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub async fn run_summarize(args: SummarizeArgs) -> anyhow::Result<()> {
    let config = build_config(&args)?;
    let mut dashboard = DashboardController::new(config)?;
    let board = ViewBoard::default();
    for slot in ViewSlot::ALL {
        dashboard.register_renderer(slot, board.renderer(slot));
    }

    let source = DataSource::parse(&args.source);
    info!("Loading {}", source);
    let ticket = dashboard.begin_load();
    let raw = load_source(&source).await;
    if let LoadOutcome::Ready { records, rejected } = dashboard.complete_load(ticket, raw)? {
        info!(
            "{} records in view, {} rejected",
            records, rejected
        );
    }

    for serial in &args.select {
        dashboard.select_serial(&SerialNumber::parse(serial))?;
    }
    if let Some(property_type) = &args.legend_type {
        dashboard.toggle_legend_type(property_type)?;
    }

    if args.report_rejected {
        for rejected in dashboard.rejected() {
            let serial = rejected
                .serial_number
                .as_ref()
                .map_or_else(|| "-".to_string(), |s| s.to_string());
            println!(
                "rejected row {} (serial {}): {}",
                rejected.index, serial, rejected.error
            );
        }
    }

    if args.json {
        if let Some(view) = dashboard.view_model() {
            println!("{}", serde_json::to_string_pretty(view)?);
        }
    } else {
        print!("{}", board.to_text());
    }
    Ok(())
}

fn build_config(args: &SummarizeArgs) -> anyhow::Result<DashboardConfig> {
    let mut config = match &args.config {
        Some(path) => DashboardConfig::from_path(Path::new(path))?,
        None => DashboardConfig::default(),
    };
    if args.seed.is_some() {
        config.sample_seed = args.seed;
    }
    if let Some(size) = args.max_sample_size {
        config.max_sample_size = size;
    }
    if args.report_rejected {
        config.rejection_policy = RejectionPolicy::Report;
    }
    Ok(config)
}

async fn load_source(source: &DataSource) -> Result<Vec<RawRecord>, SourceError> {
    match source {
        DataSource::File(path) => {
            let path = path.clone();
            let origin = path.display().to_string();
            tokio::task::spawn_blocking(move || read_path(&path))
                .await
                .map_err(|e| SourceError::Io {
                    origin,
                    source: std::io::Error::other(e),
                })?
        }
        DataSource::Url(url) => {
            let client = reqwest::Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .map_err(|e| SourceError::Fetch {
                    url: url.clone(),
                    reason: e.to_string(),
                })?;
            fetch_url(&client, url).await
        }
    }
}
