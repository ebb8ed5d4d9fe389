use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Number of years covered by every schedule.
pub const HORIZON_YEARS: u32 = 40;

/// Kind of investment property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    #[default]
    Residential,
    Commercial,
    Industrial,
}

impl PropertyType {
    pub fn display(&self) -> &'static str {
        match self {
            PropertyType::Residential => "Residential",
            PropertyType::Commercial => "Commercial",
            PropertyType::Industrial => "Industrial",
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Which depreciator handles an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    /// Removable fixtures and fittings (carpets, blinds, air conditioning)
    PlantEquipment,
    /// Structural improvements, written off with the building
    CapitalWorks,
}

/// A declared asset, as submitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AssetItem {
    pub name: String,
    pub category: AssetCategory,
    #[schemars(with = "f64")]
    pub value: Decimal,
    /// Effective life in years; required for plant and equipment (defaults
    /// to the regime default when omitted), ignored for capital works
    #[serde(default)]
    pub effective_life: Option<u32>,
}

/// Everything the engine needs to produce a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DepreciationRequest {
    pub property_type: PropertyType,
    pub construction_date: NaiveDate,
    pub purchase_date: NaiveDate,
    #[schemars(with = "f64")]
    pub purchase_price: Decimal,
    /// Land component of the purchase price; the rest is building value
    #[schemars(with = "f64")]
    pub land_value: Decimal,
    pub is_new_property: bool,
    /// Annual loan interest rate in percent (e.g. 5.5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub interest_rate: Option<Decimal>,
    /// Loan term in years
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_term: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub downpayment: Option<Decimal>,
    /// Weekly rental income
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub rental_income: Option<Decimal>,
    #[serde(default)]
    pub assets: Vec<AssetItem>,
}

impl DepreciationRequest {
    pub fn building_value(&self) -> Decimal {
        self.purchase_price - self.land_value
    }

    pub fn profile(&self) -> PropertyProfile {
        PropertyProfile {
            property_type: self.property_type,
            construction_date: self.construction_date,
            purchase_date: self.purchase_date,
            is_new_property: self.is_new_property,
        }
    }
}

/// The facts eligibility rules are allowed to look at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyProfile {
    pub property_type: PropertyType,
    pub construction_date: NaiveDate,
    pub purchase_date: NaiveDate,
    pub is_new_property: bool,
}

impl PropertyProfile {
    /// Whole years the building had already been standing at purchase
    pub fn building_age_years(&self) -> u32 {
        self.purchase_date
            .years_since(self.construction_date)
            .unwrap_or(0)
    }
}

/// One row of the schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DepreciationYearDetail {
    pub year: u32,
    #[schemars(with = "f64")]
    pub diminishing_value: Decimal,
    #[schemars(with = "f64")]
    pub prime_cost: Decimal,
    #[schemars(with = "f64")]
    pub capital_works: Decimal,
    #[schemars(with = "f64")]
    pub total: Decimal,
}

/// The finished schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DepreciationResponse {
    pub property_type: PropertyType,
    #[schemars(with = "f64")]
    pub purchase_price: Decimal,
    #[schemars(with = "f64")]
    pub total_depreciable_amount: Decimal,
    pub yearly_breakdown: Vec<DepreciationYearDetail>,
    #[schemars(with = "f64")]
    pub first_year_depreciation: Decimal,
    #[schemars(with = "f64")]
    pub five_year_depreciation: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn request_deserializes_with_optional_fields_absent() {
        let json = r#"{
            "property_type": "residential",
            "construction_date": "2015-01-01",
            "purchase_date": "2025-01-01",
            "purchase_price": 650000,
            "land_value": 250000,
            "is_new_property": false,
            "assets": [
                { "name": "Carpet", "category": "plant_equipment", "value": 5000, "effective_life": 8 },
                { "name": "Deck", "category": "capital_works", "value": "12000.50" }
            ]
        }"#;

        let request: DepreciationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.property_type, PropertyType::Residential);
        assert_eq!(request.building_value(), dec!(400000));
        assert_eq!(request.interest_rate, None);
        assert_eq!(request.assets.len(), 2);
        assert_eq!(request.assets[0].effective_life, Some(8));
        assert_eq!(request.assets[1].category, AssetCategory::CapitalWorks);
        assert_eq!(request.assets[1].value, dec!(12000.50));
        assert_eq!(request.assets[1].effective_life, None);
    }

    #[test]
    fn assets_default_to_empty() {
        let json = r#"{
            "property_type": "commercial",
            "construction_date": "2000-06-30",
            "purchase_date": "2020-06-30",
            "purchase_price": 1000000,
            "land_value": 400000,
            "is_new_property": true
        }"#;

        let request: DepreciationRequest = serde_json::from_str(json).unwrap();
        assert!(request.assets.is_empty());
        assert_eq!(request.property_type, PropertyType::Commercial);
    }

    #[test]
    fn building_age_counts_whole_years() {
        let profile = PropertyProfile {
            property_type: PropertyType::Residential,
            construction_date: date("2015-07-01"),
            purchase_date: date("2025-06-30"),
            is_new_property: false,
        };
        assert_eq!(profile.building_age_years(), 9);

        let profile = PropertyProfile {
            purchase_date: date("2025-07-01"),
            ..profile
        };
        assert_eq!(profile.building_age_years(), 10);
    }

    #[test]
    fn property_type_display() {
        assert_eq!(PropertyType::Residential.to_string(), "Residential");
        assert_eq!(PropertyType::Industrial.display(), "Industrial");
    }
}
