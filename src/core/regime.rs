//! Depreciation regime: the rates, lives and eligibility rules the engine is
//! configured with. Rules change by jurisdiction and over time, so they are
//! injected into the engine rather than baked into the arithmetic.

use super::model::{PropertyProfile, PropertyType, HORIZON_YEARS};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Predicate deciding whether a property may claim capital works at all.
pub trait CapitalWorksEligibility: Send + Sync {
    fn is_eligible(&self, property: &PropertyProfile) -> bool;
}

impl<F> CapitalWorksEligibility for F
where
    F: Fn(&PropertyProfile) -> bool + Send + Sync,
{
    fn is_eligible(&self, property: &PropertyProfile) -> bool {
        self(property)
    }
}

/// Earliest qualifying construction date per property type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructionCutoffs {
    pub residential: NaiveDate,
    pub commercial: NaiveDate,
    pub industrial: NaiveDate,
}

impl ConstructionCutoffs {
    pub fn for_property(&self, property_type: PropertyType) -> NaiveDate {
        match property_type {
            PropertyType::Residential => self.residential,
            PropertyType::Commercial => self.commercial,
            PropertyType::Industrial => self.industrial,
        }
    }
}

/// Residential buildings started on or after 15 September 1985
const RESIDENTIAL_CUTOFF: NaiveDate = cutoff(1985, 9, 15);
/// Income-producing non-residential buildings from 20 July 1982
const NON_RESIDENTIAL_CUTOFF: NaiveDate = cutoff(1982, 7, 20);

/// Evaluated at compile time, so an impossible date fails the build
const fn cutoff(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid construction cutoff date"),
    }
}

impl Default for ConstructionCutoffs {
    fn default() -> Self {
        ConstructionCutoffs {
            residential: RESIDENTIAL_CUTOFF,
            commercial: NON_RESIDENTIAL_CUTOFF,
            industrial: NON_RESIDENTIAL_CUTOFF,
        }
    }
}

/// Serializable eligibility rules, composable with `AllOf`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum EligibilityRule {
    Always,
    Never,
    /// Construction date on or after the cutoff for the property type
    ConstructionCutoff(ConstructionCutoffs),
    /// Only newly built properties qualify
    NewPropertyOnly,
    AllOf { rules: Vec<EligibilityRule> },
}

impl Default for EligibilityRule {
    fn default() -> Self {
        EligibilityRule::ConstructionCutoff(ConstructionCutoffs::default())
    }
}

impl CapitalWorksEligibility for EligibilityRule {
    fn is_eligible(&self, property: &PropertyProfile) -> bool {
        match self {
            EligibilityRule::Always => true,
            EligibilityRule::Never => false,
            EligibilityRule::ConstructionCutoff(cutoffs) => {
                property.construction_date >= cutoffs.for_property(property.property_type)
            }
            EligibilityRule::NewPropertyOnly => property.is_new_property,
            EligibilityRule::AllOf { rules } => rules.iter().all(|r| r.is_eligible(property)),
        }
    }
}

/// How the diminishing value series is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiminishingValueModel {
    /// 200% / effective life applied to the written-down value every year;
    /// the balance decays across the whole horizon
    #[default]
    DoubleDeclining,
    /// Finite declining model: year n gets (L - n + 1) / (L(L+1)/2) of the
    /// value and the asset is fully written off after L years
    SumOfYearsDigits,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Regime {
    /// Annual capital works rate applied to the structural base
    pub capital_works_rate: Decimal,
    /// Length of the capital works write-off window, counted from construction
    pub capital_works_years: u32,
    /// Life used for plant and equipment declared without one
    pub default_effective_life: u32,
    /// Reject plant and equipment declared without a life instead of defaulting
    pub require_effective_life: bool,
    pub max_effective_life: u32,
    pub diminishing_value_model: DiminishingValueModel,
    pub capital_works_eligibility: EligibilityRule,
}

impl Default for Regime {
    fn default() -> Self {
        Regime {
            capital_works_rate: dec!(0.025),
            capital_works_years: 40,
            default_effective_life: 10,
            require_effective_life: false,
            max_effective_life: HORIZON_YEARS,
            diminishing_value_model: DiminishingValueModel::default(),
            capital_works_eligibility: EligibilityRule::default(),
        }
    }
}

impl Regime {
    /// Stricter variant: capital works only for newly built properties that
    /// also meet the construction cutoff
    pub fn strict() -> Self {
        Regime {
            capital_works_eligibility: EligibilityRule::AllOf {
                rules: vec![
                    EligibilityRule::ConstructionCutoff(ConstructionCutoffs::default()),
                    EligibilityRule::NewPropertyOnly,
                ],
            },
            ..Regime::default()
        }
    }

    fn check(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.capital_works_rate >= Decimal::ZERO && self.capital_works_rate <= Decimal::ONE,
            "capital_works_rate must be between 0 and 1 (got {})",
            self.capital_works_rate
        );
        anyhow::ensure!(
            self.capital_works_years >= 1,
            "capital_works_years must be at least 1"
        );
        anyhow::ensure!(
            (1..=HORIZON_YEARS).contains(&self.max_effective_life),
            "max_effective_life must be within 1..={}",
            HORIZON_YEARS
        );
        anyhow::ensure!(
            (1..=self.max_effective_life).contains(&self.default_effective_life),
            "default_effective_life must be within 1..={}",
            self.max_effective_life
        );
        Ok(())
    }
}

/// Read a regime from JSON; missing fields take their defaults
pub fn read_regime_json<R: Read>(reader: R) -> anyhow::Result<Regime> {
    let regime: Regime = serde_json::from_reader(reader)?;
    regime.check()?;
    Ok(regime)
}
