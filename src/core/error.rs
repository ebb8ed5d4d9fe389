use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Why a single declared asset could not be normalized
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("value must be greater than zero (got {0})")]
    NonPositiveValue(Decimal),
    #[error("effective life {life} is outside 1..={max} years")]
    EffectiveLifeOutOfRange { life: u32, max: u32 },
    #[error("effective life is required for plant and equipment")]
    MissingEffectiveLife,
}

impl AssetError {
    pub fn field(&self) -> &'static str {
        match self {
            AssetError::EmptyName => "name",
            AssetError::NonPositiveValue(_) => "value",
            AssetError::EffectiveLifeOutOfRange { .. } | AssetError::MissingEffectiveLife => {
                "effective_life"
            }
        }
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum DepreciationError {
    #[error("purchase price must be greater than zero (got {0})")]
    NonPositivePurchasePrice(Decimal),
    #[error("land value {land_value} must be between 0 and the purchase price {purchase_price}")]
    LandValueOutOfRange {
        land_value: Decimal,
        purchase_price: Decimal,
    },
    #[error("construction date {construction_date} is after purchase date {purchase_date}")]
    ConstructionAfterPurchase {
        construction_date: NaiveDate,
        purchase_date: NaiveDate,
    },
    #[error("purchase date {purchase_date} is in the future (as of {as_of})")]
    PurchaseDateInFuture {
        purchase_date: NaiveDate,
        as_of: NaiveDate,
    },
    #[error("invalid asset #{index} '{name}': {reason}")]
    InvalidAsset {
        index: usize,
        name: String,
        reason: AssetError,
    },
    #[error("invalid {field}: {reason}")]
    InvalidFinancing { field: &'static str, reason: String },
    #[error("arithmetic overflow while computing {0}")]
    ArithmeticOverflow(&'static str),
}

impl DepreciationError {
    /// Request field the error refers to, e.g. `assets[2].effective_life`
    pub fn field(&self) -> String {
        match self {
            DepreciationError::NonPositivePurchasePrice(_) => "purchase_price".to_string(),
            DepreciationError::LandValueOutOfRange { .. } => "land_value".to_string(),
            DepreciationError::ConstructionAfterPurchase { .. } => {
                "construction_date".to_string()
            }
            DepreciationError::PurchaseDateInFuture { .. } => "purchase_date".to_string(),
            DepreciationError::InvalidAsset { index, reason, .. } => {
                format!("assets[{}].{}", index, reason.field())
            }
            DepreciationError::InvalidFinancing { field, .. } => field.to_string(),
            DepreciationError::ArithmeticOverflow(_) => String::new(),
        }
    }
}

pub(crate) fn overflow(what: &'static str) -> DepreciationError {
    DepreciationError::ArithmeticOverflow(what)
}
