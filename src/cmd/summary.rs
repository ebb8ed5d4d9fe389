//! Summary command - headline figures, method comparison and tax savings

use crate::cmd::RequestArgs;
use anyhow::Context;
use clap::Args;
use propdep::core::{
    compare_methods, depreciable_share, DepreciationResponse, MethodComparison, PropertyType,
    Regime, TaxSavings, DEFAULT_MARGINAL_TAX_RATE,
};
use propdep::money::{format_dollars, format_percent};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct SummaryCommand {
    #[command(flatten)]
    input: RequestArgs,

    /// Marginal tax rate used for savings, as a fraction (e.g. 0.32)
    #[arg(long, default_value_t = DEFAULT_MARGINAL_TAX_RATE)]
    marginal_rate: Decimal,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// Summary data for JSON output
#[derive(Debug, Serialize)]
struct SummaryData {
    property_type: PropertyType,
    purchase_price: Decimal,
    first_year_depreciation: Decimal,
    five_year_depreciation: Decimal,
    total_depreciable_amount: Decimal,
    depreciable_share_pct: Decimal,
    method_comparison: MethodComparison,
    tax_savings: TaxSavingsSummary,
}

#[derive(Debug, Serialize)]
struct TaxSavingsSummary {
    marginal_rate: Decimal,
    first_year: Decimal,
    five_year: Decimal,
    lifetime: Decimal,
}

impl SummaryCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let request = self.input.load_request()?;
        let engine = self.input.engine()?;
        let response = engine
            .calculate(&request)
            .context("Failed to calculate depreciation schedule")?;
        let comparison = compare_methods(&response)?;
        let savings = TaxSavings::at_rate(&response, self.marginal_rate)?;

        if self.json {
            self.print_json(&response, comparison, &savings)
        } else {
            self.print_summary(&response, engine.regime(), &comparison, &savings);
            Ok(())
        }
    }

    fn print_summary(
        &self,
        response: &DepreciationResponse,
        regime: &Regime,
        comparison: &MethodComparison,
        savings: &TaxSavings,
    ) {
        println!();
        println!("DEPRECIATION SUMMARY ({} property)", response.property_type);
        println!();

        println!("SCHEDULE");
        println!("  Purchase price: {}", format_dollars(response.purchase_price));
        println!(
            "  First year: {} | First five years: {}",
            format_dollars(response.first_year_depreciation),
            format_dollars(response.five_year_depreciation)
        );
        println!(
            "  Total depreciable: {} ({} of purchase price)",
            format_dollars(response.total_depreciable_amount),
            format_percent(depreciable_share(response))
        );
        println!(
            "  Capital works: {} a year for up to {} years from construction",
            format_percent(regime.capital_works_rate * dec!(100)),
            regime.capital_works_years
        );
        println!();

        println!("PLANT & EQUIPMENT METHODS");
        println!(
            "  Diminishing value: {} (5 yrs) | {} (40 yrs)",
            format_dollars(comparison.diminishing_value_five_year),
            format_dollars(comparison.diminishing_value_total)
        );
        println!(
            "  Prime cost:        {} (5 yrs) | {} (40 yrs)",
            format_dollars(comparison.prime_cost_five_year),
            format_dollars(comparison.prime_cost_total)
        );
        match comparison.recommended {
            Some(method) => println!("  Recommended: {} (larger early deductions)", method),
            None => println!("  Recommended: n/a (no plant & equipment assets)"),
        }
        println!();

        println!("TAX SAVINGS @ {:.0}%", savings.marginal_rate * dec!(100));
        println!(
            "  First year: {} | First five years: {} | Over 40 years: {}",
            format_dollars(savings.first_year),
            format_dollars(savings.five_year),
            format_dollars(savings.lifetime)
        );
        println!();
    }

    fn print_json(
        &self,
        response: &DepreciationResponse,
        method_comparison: MethodComparison,
        savings: &TaxSavings,
    ) -> anyhow::Result<()> {
        let summary = SummaryData {
            property_type: response.property_type,
            purchase_price: response.purchase_price,
            first_year_depreciation: response.first_year_depreciation,
            five_year_depreciation: response.five_year_depreciation,
            total_depreciable_amount: response.total_depreciable_amount,
            depreciable_share_pct: depreciable_share(response),
            method_comparison,
            tax_savings: TaxSavingsSummary {
                marginal_rate: savings.marginal_rate,
                first_year: savings.first_year,
                five_year: savings.five_year,
                lifetime: savings.lifetime,
            },
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }
}
