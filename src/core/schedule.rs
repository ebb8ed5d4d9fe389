//! Merges per-asset plant series and the capital works series into the
//! 40-row breakdown and derives the summary totals.

use super::capital_works::CapitalWorksSchedule;
use super::error::{overflow, DepreciationError};
use super::model::{DepreciationResponse, DepreciationYearDetail, PropertyType, HORIZON_YEARS};
use super::plant::PlantSchedule;
use crate::money::round_money;
use rust_decimal::Decimal;

/// Number of leading years summed into `five_year_depreciation`
pub const SUMMARY_YEARS: usize = 5;

/// Unrounded per-year accumulators, index 0 = year 1
#[derive(Debug, Clone)]
pub struct ScheduleAggregator {
    diminishing_value: Vec<Decimal>,
    prime_cost: Vec<Decimal>,
    capital_works: Vec<Decimal>,
}

impl Default for ScheduleAggregator {
    fn default() -> Self {
        let zeros = vec![Decimal::ZERO; HORIZON_YEARS as usize];
        ScheduleAggregator {
            diminishing_value: zeros.clone(),
            prime_cost: zeros.clone(),
            capital_works: zeros,
        }
    }
}

impl ScheduleAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_plant(&mut self, plant: &PlantSchedule) -> Result<(), DepreciationError> {
        accumulate(&mut self.diminishing_value, &plant.diminishing_value, "diminishing value")?;
        accumulate(&mut self.prime_cost, &plant.prime_cost, "prime cost")
    }

    pub fn add_capital_works(&mut self, works: &CapitalWorksSchedule) -> Result<(), DepreciationError> {
        accumulate(&mut self.capital_works, &works.series, "capital works")
    }

    /// Rounded rows. Each column is taken from its rounded running total, so
    /// the column sums to the rounded sum of its unrounded amounts. `total` is
    /// built from the rounded components, so every row adds up exactly.
    pub fn rows(&self) -> Result<Vec<DepreciationYearDetail>, DepreciationError> {
        let diminishing_value = rounded_increments(&self.diminishing_value, "diminishing value")?;
        let prime_cost = rounded_increments(&self.prime_cost, "prime cost")?;
        let capital_works = rounded_increments(&self.capital_works, "capital works")?;

        diminishing_value
            .into_iter()
            .zip(prime_cost)
            .zip(capital_works)
            .enumerate()
            .map(|(i, ((diminishing_value, prime_cost), capital_works))| {
                diminishing_value
                    .max(prime_cost)
                    .checked_add(capital_works)
                    .map(|total| DepreciationYearDetail {
                        year: i as u32 + 1,
                        diminishing_value,
                        prime_cost,
                        capital_works,
                        total,
                    })
                    .ok_or_else(|| overflow("yearly total"))
            })
            .collect()
    }

    pub fn finish(
        &self,
        property_type: PropertyType,
        purchase_price: Decimal,
    ) -> Result<DepreciationResponse, DepreciationError> {
        let yearly_breakdown = self.rows()?;

        let total_depreciable_amount = sum_totals(&yearly_breakdown, "total depreciable amount")?;
        let first_year_depreciation = yearly_breakdown
            .first()
            .map(|row| row.total)
            .unwrap_or(Decimal::ZERO);
        let five_year_depreciation = sum_totals(
            &yearly_breakdown[..SUMMARY_YEARS.min(yearly_breakdown.len())],
            "five year depreciation",
        )?;

        Ok(DepreciationResponse {
            property_type,
            purchase_price: round_money(purchase_price),
            total_depreciable_amount,
            yearly_breakdown,
            first_year_depreciation,
            five_year_depreciation,
        })
    }
}

fn accumulate(
    into: &mut [Decimal],
    from: &[Decimal],
    what: &'static str,
) -> Result<(), DepreciationError> {
    for (acc, amount) in into.iter_mut().zip(from) {
        *acc = acc.checked_add(*amount).ok_or_else(|| overflow(what))?;
    }
    Ok(())
}

/// `round(a1 + .. + ay) - round(a1 + .. + ay-1)` for each year y. Running
/// sums never fall, so no increment is negative.
fn rounded_increments(series: &[Decimal], what: &'static str) -> Result<Vec<Decimal>, DepreciationError> {
    let mut running = Decimal::ZERO;
    let mut shown = Decimal::ZERO;
    series
        .iter()
        .map(|amount| -> Result<Decimal, DepreciationError> {
            running = running.checked_add(*amount).ok_or_else(|| overflow(what))?;
            let rounded = round_money(running);
            let increment = rounded - shown;
            shown = rounded;
            Ok(increment)
        })
        .collect()
}

fn sum_totals(rows: &[DepreciationYearDetail], what: &'static str) -> Result<Decimal, DepreciationError> {
    rows.iter().try_fold(Decimal::ZERO, |acc, row| {
        acc.checked_add(row.total).ok_or_else(|| overflow(what))
    })
}
