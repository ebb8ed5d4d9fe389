//! Cashflow command - rental cash flow projection and investment metrics

use crate::cmd::RequestArgs;
use anyhow::Context;
use clap::Args;
use propdep::core::{
    project_cash_flow, CashFlowAssumptions, CashFlowProjection, CashFlowYear,
    DEFAULT_MARGINAL_TAX_RATE, HORIZON_YEARS,
};
use propdep::money::{format_dollars, format_dollars_signed, format_percent};
use rust_decimal::Decimal;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct CashflowCommand {
    #[command(flatten)]
    input: RequestArgs,

    /// Marginal tax rate used for savings, as a fraction (e.g. 0.32)
    #[arg(long, default_value_t = DEFAULT_MARGINAL_TAX_RATE)]
    marginal_rate: Decimal,

    /// Number of years to show (1-40)
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=40))]
    years: u32,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

impl CashflowCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let request = self.input.load_request()?;
        let engine = self.input.engine()?;
        let response = engine
            .calculate(&request)
            .context("Failed to calculate depreciation schedule")?;

        let assumptions = CashFlowAssumptions {
            marginal_tax_rate: self.marginal_rate,
            ..CashFlowAssumptions::default()
        };
        let mut projection = project_cash_flow(&request, &response, &assumptions)
            .context("Failed to project cash flow")?;
        projection.years.truncate(self.years.min(HORIZON_YEARS) as usize);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&projection)?);
        } else {
            self.print_projection(&projection);
        }
        Ok(())
    }

    fn print_projection(&self, projection: &CashFlowProjection) {
        println!();
        println!("CASH FLOW PROJECTION");
        println!();

        if projection.loan_principal > Decimal::ZERO {
            println!(
                "Loan: {} at {}/month",
                format_dollars(projection.loan_principal),
                format_dollars(projection.monthly_repayment)
            );
        } else {
            println!("Loan: none");
        }
        println!();

        let rows: Vec<CashFlowRow> = projection.years.iter().map(CashFlowRow::from).collect();
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        println!();

        let metrics = &projection.metrics;
        println!("KEY METRICS (year 1)");
        println!("  Gross yield: {}", format_percent(metrics.gross_yield));
        println!("  Cap rate: {}", format_percent(metrics.cap_rate));
        match metrics.cash_on_cash_return {
            Some(pct) => println!("  Cash-on-cash return: {}", format_percent(pct)),
            None => println!("  Cash-on-cash return: n/a (no downpayment)"),
        }
        println!();
    }
}

#[derive(Debug, Clone, Tabled)]
struct CashFlowRow {
    #[tabled(rename = "Year")]
    year: u32,

    #[tabled(rename = "Rent")]
    rental_income: String,

    #[tabled(rename = "Repayments")]
    loan_repayments: String,

    #[tabled(rename = "Interest")]
    interest: String,

    #[tabled(rename = "Expenses")]
    operating_expenses: String,

    #[tabled(rename = "Tax Saving")]
    tax_saving: String,

    #[tabled(rename = "Net")]
    net_cash_flow: String,
}

impl From<&CashFlowYear> for CashFlowRow {
    fn from(year: &CashFlowYear) -> Self {
        CashFlowRow {
            year: year.year,
            rental_income: format_dollars(year.rental_income),
            loan_repayments: format_dollars(year.loan_repayments),
            interest: format_dollars(year.interest),
            operating_expenses: format_dollars(year.operating_expenses),
            tax_saving: format_dollars(year.tax_saving),
            net_cash_flow: format_dollars_signed(year.net_cash_flow),
        }
    }
}
