pub mod calculate;
pub mod cashflow;
pub mod schema;
pub mod summary;
pub mod validate;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;
use propdep::core::{read_regime_json, DepreciationEngine, DepreciationRequest, Regime};
use propdep::import::read_assets_csv;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Inputs shared by every command that works on a request
#[derive(Args, Debug)]
pub struct RequestArgs {
    /// Request JSON file, or "-" to read stdin
    #[arg(short, long, default_value = "-")]
    request: PathBuf,

    /// CSV of additional assets (name,category,value,effective_life)
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Regime JSON overriding the default rates and eligibility rules
    #[arg(long, conflicts_with = "strict")]
    regime: Option<PathBuf>,

    /// Only newly built properties may claim capital works
    #[arg(long)]
    strict: bool,

    /// Date the purchase date must not be after (defaults to today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    as_of: Option<NaiveDate>,
}

impl RequestArgs {
    /// Read the request, with any CSV assets appended after its own
    pub fn load_request(&self) -> anyhow::Result<DepreciationRequest> {
        let mut request = read_request(&self.request)?;
        if let Some(path) = &self.assets {
            let file = File::open(path)
                .with_context(|| format!("Failed to open assets file {}", path.display()))?;
            let assets = read_assets_csv(BufReader::new(file))?;
            log::info!("Adding {} assets from {}", assets.len(), path.display());
            request.assets.extend(assets);
        }
        Ok(request)
    }

    pub fn engine(&self) -> anyhow::Result<DepreciationEngine> {
        let regime = match &self.regime {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open regime file {}", path.display()))?;
                read_regime_json(BufReader::new(file))
                    .with_context(|| format!("Invalid regime in {}", path.display()))?
            }
            None if self.strict => Regime::strict(),
            None => Regime::default(),
        };
        let as_of = self
            .as_of
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        Ok(DepreciationEngine::new(regime, as_of))
    }
}

/// Read a request from a JSON file (or stdin with "-")
pub fn read_request(path: &Path) -> anyhow::Result<DepreciationRequest> {
    if path.as_os_str() == "-" {
        read_from_stdin()
    } else {
        read_from_file(path)
    }
}

fn read_from_file(path: &Path) -> anyhow::Result<DepreciationRequest> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open request file {}", path.display()))?;
    let request = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Invalid request JSON in {}", path.display()))?;
    Ok(request)
}

fn read_from_stdin() -> anyhow::Result<DepreciationRequest> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a request file or pipe JSON to stdin.");
    }

    let request = serde_json::from_slice(&buffer).context("Invalid request JSON on stdin")?;
    Ok(request)
}
