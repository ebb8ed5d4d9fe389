//! Figures derived from a finished schedule: which method claims more, what
//! share of the price is depreciable, and what the deductions are worth at a
//! marginal tax rate.

use super::error::{overflow, DepreciationError};
use super::model::{DepreciationResponse, DepreciationYearDetail};
use super::schedule::SUMMARY_YEARS;
use crate::money::{percentage, round_money};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MARGINAL_TAX_RATE: Decimal = dec!(0.32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DepreciationMethod {
    DiminishingValue,
    PrimeCost,
}

impl DepreciationMethod {
    pub fn display(&self) -> &'static str {
        match self {
            DepreciationMethod::DiminishingValue => "Diminishing Value",
            DepreciationMethod::PrimeCost => "Prime Cost",
        }
    }
}

impl std::fmt::Display for DepreciationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Plant and equipment claims under each method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MethodComparison {
    #[schemars(with = "f64")]
    pub diminishing_value_total: Decimal,
    #[schemars(with = "f64")]
    pub prime_cost_total: Decimal,
    #[schemars(with = "f64")]
    pub diminishing_value_five_year: Decimal,
    #[schemars(with = "f64")]
    pub prime_cost_five_year: Decimal,
    /// Method claiming more over the first five years; `None` without plant deductions
    pub recommended: Option<DepreciationMethod>,
}

pub fn compare_methods(response: &DepreciationResponse) -> Result<MethodComparison, DepreciationError> {
    let rows = &response.yearly_breakdown;
    let early = &rows[..SUMMARY_YEARS.min(rows.len())];

    let diminishing_value_total = sum_column(rows, |r| r.diminishing_value)?;
    let prime_cost_total = sum_column(rows, |r| r.prime_cost)?;
    let diminishing_value_five_year = sum_column(early, |r| r.diminishing_value)?;
    let prime_cost_five_year = sum_column(early, |r| r.prime_cost)?;

    let recommended = if diminishing_value_five_year.is_zero() && prime_cost_five_year.is_zero() {
        None
    } else if diminishing_value_five_year >= prime_cost_five_year {
        Some(DepreciationMethod::DiminishingValue)
    } else {
        Some(DepreciationMethod::PrimeCost)
    };

    Ok(MethodComparison {
        diminishing_value_total,
        prime_cost_total,
        diminishing_value_five_year,
        prime_cost_five_year,
        recommended,
    })
}

fn sum_column(
    rows: &[DepreciationYearDetail],
    pick: impl Fn(&DepreciationYearDetail) -> Decimal,
) -> Result<Decimal, DepreciationError> {
    rows.iter().try_fold(Decimal::ZERO, |acc, row| {
        acc.checked_add(pick(row)).ok_or_else(|| overflow("method comparison"))
    })
}

/// `total_depreciable_amount` as a percentage of the purchase price
pub fn depreciable_share(response: &DepreciationResponse) -> Decimal {
    percentage(response.total_depreciable_amount, response.purchase_price)
}

/// Value of the deductions at a marginal tax rate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaxSavings {
    #[schemars(with = "f64")]
    pub marginal_rate: Decimal,
    /// Index 0 = year 1
    #[schemars(with = "Vec<f64>")]
    pub yearly: Vec<Decimal>,
    #[schemars(with = "f64")]
    pub first_year: Decimal,
    #[schemars(with = "f64")]
    pub five_year: Decimal,
    #[schemars(with = "f64")]
    pub lifetime: Decimal,
}

impl TaxSavings {
    pub fn at_rate(
        response: &DepreciationResponse,
        marginal_rate: Decimal,
    ) -> Result<Self, DepreciationError> {
        if marginal_rate < Decimal::ZERO || marginal_rate > Decimal::ONE {
            return Err(DepreciationError::InvalidFinancing {
                field: "marginal_tax_rate",
                reason: format!("must be between 0 and 1 (got {})", marginal_rate),
            });
        }

        let yearly = response
            .yearly_breakdown
            .iter()
            .map(|row| {
                row.total
                    .checked_mul(marginal_rate)
                    .map(round_money)
                    .ok_or_else(|| overflow("tax savings"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let sum = |values: &[Decimal]| {
            values.iter().try_fold(Decimal::ZERO, |acc, v| {
                acc.checked_add(*v).ok_or_else(|| overflow("tax savings"))
            })
        };
        let first_year = yearly.first().copied().unwrap_or(Decimal::ZERO);
        let five_year = sum(&yearly[..SUMMARY_YEARS.min(yearly.len())])?;
        let lifetime = sum(&yearly)?;

        Ok(TaxSavings {
            marginal_rate,
            yearly,
            first_year,
            five_year,
            lifetime,
        })
    }
}
