//! Plant and equipment depreciation: diminishing value and prime cost series
//! for a single asset across the schedule horizon. Amounts are unrounded;
//! rounding happens once, when the schedule is assembled.

use super::error::{overflow, AssetError, DepreciationError};
use super::model::HORIZON_YEARS;
use super::regime::DiminishingValueModel;
use super::valuation::ValuedAsset;
use rust_decimal::Decimal;

/// Per-year contributions of one asset, index 0 = year 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantSchedule {
    pub diminishing_value: Vec<Decimal>,
    pub prime_cost: Vec<Decimal>,
}

impl PlantSchedule {
    pub fn diminishing_value_total(&self) -> Decimal {
        self.diminishing_value.iter().sum()
    }

    pub fn prime_cost_total(&self) -> Decimal {
        self.prime_cost.iter().sum()
    }
}

pub fn depreciate_plant(
    asset: &ValuedAsset,
    model: DiminishingValueModel,
) -> Result<PlantSchedule, DepreciationError> {
    let life = match asset.effective_life {
        Some(life) if life > 0 => life,
        Some(life) => {
            return Err(DepreciationError::InvalidAsset {
                index: asset.index,
                name: asset.name.clone(),
                reason: AssetError::EffectiveLifeOutOfRange {
                    life,
                    max: HORIZON_YEARS,
                },
            })
        }
        None => {
            return Err(DepreciationError::InvalidAsset {
                index: asset.index,
                name: asset.name.clone(),
                reason: AssetError::MissingEffectiveLife,
            })
        }
    };

    let prime_cost = prime_cost_series(asset.value, life)?;
    let diminishing_value = match model {
        DiminishingValueModel::DoubleDeclining => double_declining_series(asset.value, life)?,
        DiminishingValueModel::SumOfYearsDigits => sum_of_years_digits_series(asset.value, life)?,
    };

    log::debug!(
        "Plant asset '{}': value={}, life={}, dv year 1={}, pc year 1={}",
        asset.name,
        asset.value,
        life,
        diminishing_value[0],
        prime_cost[0]
    );

    Ok(PlantSchedule {
        diminishing_value,
        prime_cost,
    })
}

/// `value / life` for each year of the life, zero afterwards
fn prime_cost_series(value: Decimal, life: u32) -> Result<Vec<Decimal>, DepreciationError> {
    let annual = value
        .checked_div(Decimal::from(life))
        .ok_or_else(|| overflow("prime cost"))?;
    Ok((1..=HORIZON_YEARS)
        .map(|year| if year <= life { annual } else { Decimal::ZERO })
        .collect())
}

/// 200% / life of the opening written-down value each year. A rate at or
/// above 100% writes the asset off in the first year.
fn double_declining_series(value: Decimal, life: u32) -> Result<Vec<Decimal>, DepreciationError> {
    let rate = (Decimal::TWO / Decimal::from(life)).min(Decimal::ONE);
    let mut written_down = value;
    let mut series = Vec::with_capacity(HORIZON_YEARS as usize);

    for _ in 1..=HORIZON_YEARS {
        let deduction = written_down
            .checked_mul(rate)
            .ok_or_else(|| overflow("diminishing value"))?
            .min(written_down)
            .max(Decimal::ZERO);
        written_down -= deduction;
        series.push(deduction);
    }
    Ok(series)
}

/// Year n of the life takes (life - n + 1) shares out of life(life + 1)/2
fn sum_of_years_digits_series(value: Decimal, life: u32) -> Result<Vec<Decimal>, DepreciationError> {
    let shares = Decimal::from(life * (life + 1) / 2);
    (1..=HORIZON_YEARS)
        .map(|year| {
            if year > life {
                return Ok(Decimal::ZERO);
            }
            value
                .checked_mul(Decimal::from(life - year + 1))
                .and_then(|v| v.checked_div(shares))
                .ok_or_else(|| overflow("diminishing value"))
        })
        .collect()
}
