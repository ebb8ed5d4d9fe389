//! Calculate command - the year-by-year depreciation schedule

use crate::cmd::RequestArgs;
use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;
use propdep::core::{schedule_digest, DepreciationResponse, DepreciationYearDetail, HORIZON_YEARS};
use propdep::money::{format_dollars, format_percent};
use std::io;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct CalculateCommand {
    #[command(flatten)]
    input: RequestArgs,

    /// Number of years to show in the table or CSV (1-40)
    #[arg(long, default_value_t = HORIZON_YEARS, value_parser = clap::value_parser!(u32).range(1..=40))]
    years: u32,

    /// Output the full response as JSON
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output the schedule as CSV
    #[arg(long)]
    csv: bool,
}

impl CalculateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let request = self.input.load_request()?;
        let engine = self.input.engine()?;
        let response = engine
            .calculate(&request)
            .context("Failed to calculate depreciation schedule")?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&response)?);
            return Ok(());
        }

        let rows: Vec<ScheduleRow> = response
            .yearly_breakdown
            .iter()
            .take(self.years as usize)
            .map(ScheduleRow::from)
            .collect();

        if self.csv {
            self.write_csv(&rows)
        } else {
            self.print_table(&rows, &response, engine.as_of())
        }
    }

    fn print_table(
        &self,
        rows: &[ScheduleRow],
        response: &DepreciationResponse,
        as_of: NaiveDate,
    ) -> anyhow::Result<()> {
        println!();
        println!(
            "DEPRECIATION SCHEDULE ({} property, purchase price {}, as of {})",
            response.property_type,
            format_dollars(response.purchase_price),
            as_of
        );
        println!();

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        println!();

        println!("First year:          {}", format_dollars(response.first_year_depreciation));
        println!("First five years:    {}", format_dollars(response.five_year_depreciation));
        println!(
            "Total over {} years: {} ({} of purchase price)",
            HORIZON_YEARS,
            format_dollars(response.total_depreciable_amount),
            format_percent(propdep::core::depreciable_share(response))
        );
        println!();
        println!("Audit digest: {}", schedule_digest(response)?);
        Ok(())
    }

    fn write_csv(&self, rows: &[ScheduleRow]) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(io::stdout());
        for row in rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Row for the schedule table and CSV output
#[derive(Debug, Clone, Tabled, serde::Serialize)]
struct ScheduleRow {
    #[tabled(rename = "Year")]
    year: u32,

    #[tabled(rename = "Diminishing Value")]
    diminishing_value: String,

    #[tabled(rename = "Prime Cost")]
    prime_cost: String,

    #[tabled(rename = "Capital Works")]
    capital_works: String,

    #[tabled(rename = "Total")]
    total: String,
}

impl From<&DepreciationYearDetail> for ScheduleRow {
    fn from(detail: &DepreciationYearDetail) -> Self {
        ScheduleRow {
            year: detail.year,
            diminishing_value: format!("{:.2}", detail.diminishing_value),
            prime_cost: format!("{:.2}", detail.prime_cost),
            capital_works: format!("{:.2}", detail.capital_works),
            total: format!("{:.2}", detail.total),
        }
    }
}
