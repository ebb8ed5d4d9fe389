use super::error::{AssetError, DepreciationError};
use super::model::{AssetCategory, AssetItem};
use super::regime::Regime;
use rust_decimal::Decimal;

/// An asset that passed validation, with its effective life resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuedAsset {
    /// Position in the request's asset list
    pub index: usize,
    pub name: String,
    pub category: AssetCategory,
    pub value: Decimal,
    /// Always `Some` for plant and equipment, `None` for capital works
    pub effective_life: Option<u32>,
}

impl ValuedAsset {
    pub fn is_plant_equipment(&self) -> bool {
        self.category == AssetCategory::PlantEquipment
    }
}

/// Normalize one declared asset. Out-of-range lives are rejected, not clamped.
pub fn value_asset(
    index: usize,
    item: &AssetItem,
    regime: &Regime,
) -> Result<ValuedAsset, DepreciationError> {
    let invalid = |reason: AssetError| DepreciationError::InvalidAsset {
        index,
        name: item.name.clone(),
        reason,
    };

    let name = item.name.trim();
    if name.is_empty() {
        return Err(invalid(AssetError::EmptyName));
    }
    if item.value <= Decimal::ZERO {
        return Err(invalid(AssetError::NonPositiveValue(item.value)));
    }

    let effective_life = match item.category {
        AssetCategory::PlantEquipment => {
            let life = match item.effective_life {
                Some(life) => life,
                None if regime.require_effective_life => {
                    return Err(invalid(AssetError::MissingEffectiveLife))
                }
                None => {
                    log::debug!(
                        "Asset '{}' has no effective life, using default of {} years",
                        name,
                        regime.default_effective_life
                    );
                    regime.default_effective_life
                }
            };
            if !(1..=regime.max_effective_life).contains(&life) {
                return Err(invalid(AssetError::EffectiveLifeOutOfRange {
                    life,
                    max: regime.max_effective_life,
                }));
            }
            Some(life)
        }
        AssetCategory::CapitalWorks => None,
    };

    Ok(ValuedAsset {
        index,
        name: name.to_string(),
        category: item.category,
        value: item.value,
        effective_life,
    })
}
