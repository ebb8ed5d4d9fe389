pub mod audit;
pub mod capital_works;
pub mod cashflow;
pub mod engine;
pub mod error;
pub mod insights;
pub mod model;
pub mod plant;
pub mod regime;
pub mod schedule;
pub mod valuation;

// Flat public surface for domain types and functions.
pub use audit::schedule_digest;
pub use capital_works::{depreciate_capital_works, CapitalWorksSchedule};
pub use cashflow::{
    project_cash_flow, validate_financing, CashFlowAssumptions, CashFlowProjection, CashFlowYear,
    InvestmentMetrics,
};
pub use engine::DepreciationEngine;
pub use error::{AssetError, DepreciationError};
pub use insights::{
    compare_methods, depreciable_share, DepreciationMethod, MethodComparison, TaxSavings,
    DEFAULT_MARGINAL_TAX_RATE,
};
pub use model::{
    AssetCategory, AssetItem, DepreciationRequest, DepreciationResponse, DepreciationYearDetail,
    PropertyProfile, PropertyType, HORIZON_YEARS,
};
pub use plant::{depreciate_plant, PlantSchedule};
pub use regime::{
    read_regime_json, CapitalWorksEligibility, ConstructionCutoffs, DiminishingValueModel,
    EligibilityRule, Regime,
};
pub use schedule::{ScheduleAggregator, SUMMARY_YEARS};
pub use valuation::{value_asset, ValuedAsset};
