use super::capital_works::depreciate_capital_works;
use super::error::{overflow, DepreciationError};
use super::model::{DepreciationRequest, DepreciationResponse};
use super::plant::depreciate_plant;
use super::regime::{CapitalWorksEligibility, Regime};
use super::schedule::ScheduleAggregator;
use super::valuation::{value_asset, ValuedAsset};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Validates requests and turns them into 40-year depreciation schedules.
///
/// The engine holds no mutable state, so one instance can serve concurrent
/// callers. The only date it depends on is the `as_of` date it was built with.
pub struct DepreciationEngine {
    regime: Regime,
    eligibility: Box<dyn CapitalWorksEligibility>,
    as_of: NaiveDate,
}

impl DepreciationEngine {
    pub fn new(regime: Regime, as_of: NaiveDate) -> Self {
        let eligibility = Box::new(regime.capital_works_eligibility.clone());
        DepreciationEngine {
            regime,
            eligibility,
            as_of,
        }
    }

    /// Replace the capital works eligibility predicate, keeping the rest of the regime
    pub fn with_eligibility(mut self, eligibility: impl CapitalWorksEligibility + 'static) -> Self {
        self.eligibility = Box::new(eligibility);
        self
    }

    pub fn regime(&self) -> &Regime {
        &self.regime
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    /// Every problem with the request, in field order
    pub fn validate(&self, request: &DepreciationRequest) -> Vec<DepreciationError> {
        let mut errors = self.validate_property(request);
        errors.extend(
            request
                .assets
                .iter()
                .enumerate()
                .filter_map(|(index, item)| value_asset(index, item, &self.regime).err()),
        );
        for err in &errors {
            log::warn!("Rejected input {}: {}", err.field(), err);
        }
        errors
    }

    pub fn calculate(
        &self,
        request: &DepreciationRequest,
    ) -> Result<DepreciationResponse, DepreciationError> {
        if let Some(err) = self.validate_property(request).into_iter().next() {
            log::warn!("Rejected input {}: {}", err.field(), err);
            return Err(err);
        }
        let assets = self.valued_assets(request)?;

        let mut schedule = ScheduleAggregator::new();

        let mut structural_base = request.building_value();
        for asset in &assets {
            if asset.is_plant_equipment() {
                let plant = depreciate_plant(asset, self.regime.diminishing_value_model)?;
                schedule.add_plant(&plant)?;
            } else {
                structural_base = structural_base
                    .checked_add(asset.value)
                    .ok_or_else(|| overflow("capital works base"))?;
            }
        }

        let works = depreciate_capital_works(
            structural_base,
            &request.profile(),
            &self.regime,
            self.eligibility.as_ref(),
        )?;
        schedule.add_capital_works(&works)?;

        let response = schedule.finish(request.property_type, request.purchase_price)?;
        log::debug!(
            "Schedule for {} property: {} plant assets, capital works base {}, total {}",
            request.property_type,
            assets.iter().filter(|a| a.is_plant_equipment()).count(),
            structural_base,
            response.total_depreciable_amount
        );
        Ok(response)
    }

    fn validate_property(&self, request: &DepreciationRequest) -> Vec<DepreciationError> {
        let mut errors = Vec::new();
        if request.purchase_price <= Decimal::ZERO {
            errors.push(DepreciationError::NonPositivePurchasePrice(request.purchase_price));
        }
        if request.land_value < Decimal::ZERO || request.land_value > request.purchase_price {
            errors.push(DepreciationError::LandValueOutOfRange {
                land_value: request.land_value,
                purchase_price: request.purchase_price,
            });
        }
        if request.construction_date > request.purchase_date {
            errors.push(DepreciationError::ConstructionAfterPurchase {
                construction_date: request.construction_date,
                purchase_date: request.purchase_date,
            });
        }
        if request.purchase_date > self.as_of {
            errors.push(DepreciationError::PurchaseDateInFuture {
                purchase_date: request.purchase_date,
                as_of: self.as_of,
            });
        }
        errors
    }

    /// Normalized assets, for callers that want to show what was depreciated
    pub fn valued_assets(
        &self,
        request: &DepreciationRequest,
    ) -> Result<Vec<ValuedAsset>, DepreciationError> {
        request
            .assets
            .iter()
            .enumerate()
            .map(|(index, item)| value_asset(index, item, &self.regime))
            .collect()
    }
}
