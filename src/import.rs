//! Plant and equipment schedules supplied as CSV, merged into a request's
//! asset list.

use crate::core::{AssetCategory, AssetItem};
use anyhow::Context;
use propdep_derive::CsvSchema;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One column of a CSV input format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvField {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// A row of the asset CSV
#[derive(Debug, Deserialize, CsvSchema)]
pub struct AssetRecord {
    /// Asset description, e.g. Carpet
    pub name: String,
    /// plant_equipment or capital_works
    pub category: AssetCategory,
    /// Opening value in dollars
    pub value: Decimal,
    /// Effective life in years (plant_equipment only; blank for the default)
    pub effective_life: Option<u32>,
}

impl From<AssetRecord> for AssetItem {
    fn from(record: AssetRecord) -> Self {
        AssetItem {
            name: record.name,
            category: record.category,
            value: record.value,
            effective_life: record.effective_life,
        }
    }
}

/// Read assets from CSV, in file order
pub fn read_assets_csv<R: Read>(reader: R) -> anyhow::Result<Vec<AssetItem>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut assets = Vec::new();
    for (i, record) in rdr.deserialize::<AssetRecord>().enumerate() {
        // header is line 1
        let record = record.with_context(|| format!("Invalid asset on CSV line {}", i + 2))?;
        assets.push(record.into());
    }
    log::debug!("Read {} assets from CSV", assets.len());
    Ok(assets)
}
