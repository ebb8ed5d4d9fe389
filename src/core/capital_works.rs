use super::error::{overflow, DepreciationError};
use super::model::{PropertyProfile, HORIZON_YEARS};
use super::regime::{CapitalWorksEligibility, Regime};
use rust_decimal::Decimal;

/// Structural deduction for every year of the horizon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapitalWorksSchedule {
    /// Deduction claimed in each eligible year
    pub annual_deduction: Decimal,
    /// Horizon years 1..=eligible_years carry the deduction
    pub eligible_years: u32,
    /// Index 0 = year 1
    pub series: Vec<Decimal>,
}

impl CapitalWorksSchedule {
    fn none() -> Self {
        CapitalWorksSchedule {
            annual_deduction: Decimal::ZERO,
            eligible_years: 0,
            series: vec![Decimal::ZERO; HORIZON_YEARS as usize],
        }
    }
}

/// Flat-rate write-off of `base` (building value plus structural
/// improvements). The write-off window is counted from the construction date,
/// so a building already 10 years old at purchase has 30 years left of a
/// 40-year window.
pub fn depreciate_capital_works(
    base: Decimal,
    property: &PropertyProfile,
    regime: &Regime,
    eligibility: &dyn CapitalWorksEligibility,
) -> Result<CapitalWorksSchedule, DepreciationError> {
    if !eligibility.is_eligible(property) {
        log::warn!(
            "{} property constructed {} is not eligible for capital works deductions",
            property.property_type,
            property.construction_date
        );
        return Ok(CapitalWorksSchedule::none());
    }

    let age = property.building_age_years();
    let eligible_years = regime
        .capital_works_years
        .saturating_sub(age)
        .min(HORIZON_YEARS);
    if eligible_years == 0 {
        log::warn!(
            "Building is {} years old, past the {}-year capital works window",
            age,
            regime.capital_works_years
        );
        return Ok(CapitalWorksSchedule::none());
    }

    let annual_deduction = base
        .checked_mul(regime.capital_works_rate)
        .ok_or_else(|| overflow("capital works"))?;

    log::debug!(
        "Capital works: base={}, rate={}, annual={}, building age={}, eligible years={}",
        base,
        regime.capital_works_rate,
        annual_deduction,
        age,
        eligible_years
    );

    let series = (1..=HORIZON_YEARS)
        .map(|year| {
            if year <= eligible_years {
                annual_deduction
            } else {
                Decimal::ZERO
            }
        })
        .collect();

    Ok(CapitalWorksSchedule {
        annual_deduction,
        eligible_years,
        series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::PropertyType;
    use crate::core::regime::EligibilityRule;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn profile(built: &str, bought: &str) -> PropertyProfile {
        PropertyProfile {
            property_type: PropertyType::Residential,
            construction_date: date(built),
            purchase_date: date(bought),
            is_new_property: false,
        }
    }

    #[test]
    fn new_building_claims_every_horizon_year() {
        let regime = Regime::default();
        let schedule = depreciate_capital_works(
            dec!(400000),
            &profile("2024-03-01", "2024-06-01"),
            &regime,
            &regime.capital_works_eligibility,
        )
        .unwrap();

        assert_eq!(schedule.annual_deduction, dec!(10000));
        assert_eq!(schedule.eligible_years, 40);
        assert!(schedule.series.iter().all(|d| *d == dec!(10000)));
    }

    #[test]
    fn window_counts_from_construction() {
        let regime = Regime::default();
        let schedule = depreciate_capital_works(
            dec!(400000),
            &profile("2015-01-01", "2025-01-01"),
            &regime,
            &regime.capital_works_eligibility,
        )
        .unwrap();

        assert_eq!(schedule.eligible_years, 30);
        assert!(schedule.series[..30].iter().all(|d| *d == dec!(10000)));
        assert!(schedule.series[30..].iter().all(|d| d.is_zero()));
    }

    #[test]
    fn building_past_window_gets_nothing() {
        let regime = Regime::default();
        let schedule = depreciate_capital_works(
            dec!(400000),
            &profile("1986-01-01", "2026-06-01"),
            &regime,
            &regime.capital_works_eligibility,
        )
        .unwrap();

        assert_eq!(schedule.eligible_years, 0);
        assert!(schedule.series.iter().all(|d| d.is_zero()));
    }

    #[test]
    fn ineligible_construction_date_gets_nothing() {
        let regime = Regime::default();
        let schedule = depreciate_capital_works(
            dec!(400000),
            &profile("1980-01-01", "1990-01-01"),
            &regime,
            &regime.capital_works_eligibility,
        )
        .unwrap();

        assert_eq!(schedule.annual_deduction, Decimal::ZERO);
        assert_eq!(schedule.series.len(), HORIZON_YEARS as usize);
        assert!(schedule.series.iter().all(|d| d.is_zero()));
    }

    #[test]
    fn new_property_flag_reaches_the_predicate() {
        let regime = Regime::default();
        let rule = EligibilityRule::NewPropertyOnly;
        let mut property = profile("2020-01-01", "2020-02-01");

        let schedule = depreciate_capital_works(dec!(100000), &property, &regime, &rule).unwrap();
        assert_eq!(schedule.eligible_years, 0);

        property.is_new_property = true;
        let schedule = depreciate_capital_works(dec!(100000), &property, &regime, &rule).unwrap();
        assert_eq!(schedule.annual_deduction, dec!(2500));
    }

    #[test]
    fn rate_comes_from_regime() {
        let regime = Regime {
            capital_works_rate: dec!(0.04),
            capital_works_years: 25,
            ..Regime::default()
        };
        let schedule = depreciate_capital_works(
            dec!(200000),
            &profile("2020-01-01", "2020-01-01"),
            &regime,
            &EligibilityRule::Always,
        )
        .unwrap();

        assert_eq!(schedule.annual_deduction, dec!(8000));
        assert_eq!(schedule.eligible_years, 25);
        assert!(schedule.series[25..].iter().all(|d| d.is_zero()));
    }
}
