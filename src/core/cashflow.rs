//! Year-by-year rental cash flow for the property, with depreciation tax
//! savings folded in, plus headline investment metrics for year 1.

use super::error::{overflow, DepreciationError};
use super::insights::{TaxSavings, DEFAULT_MARGINAL_TAX_RATE};
use super::model::{DepreciationRequest, DepreciationResponse, HORIZON_YEARS};
use crate::money::{percentage, round_money};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const MAX_INTEREST_RATE: Decimal = dec!(20);
pub const MAX_LOAN_TERM: u32 = 40;
const MONTHS_PER_YEAR: u32 = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CashFlowAssumptions {
    #[schemars(with = "f64")]
    pub marginal_tax_rate: Decimal,
    /// Property management fee as a fraction of rent
    #[schemars(with = "f64")]
    pub management_fee_rate: Decimal,
    #[schemars(with = "f64")]
    pub annual_maintenance: Decimal,
    pub weeks_per_year: u32,
}

impl Default for CashFlowAssumptions {
    fn default() -> Self {
        CashFlowAssumptions {
            marginal_tax_rate: DEFAULT_MARGINAL_TAX_RATE,
            management_fee_rate: dec!(0.08),
            annual_maintenance: dec!(5000),
            weeks_per_year: 52,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CashFlowYear {
    pub year: u32,
    #[schemars(with = "f64")]
    pub rental_income: Decimal,
    #[schemars(with = "f64")]
    pub loan_repayments: Decimal,
    /// Interest part of `loan_repayments`
    #[schemars(with = "f64")]
    pub interest: Decimal,
    #[schemars(with = "f64")]
    pub operating_expenses: Decimal,
    #[schemars(with = "f64")]
    pub tax_saving: Decimal,
    #[schemars(with = "f64")]
    pub net_cash_flow: Decimal,
}

/// Year 1 metrics, as percentages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InvestmentMetrics {
    #[schemars(with = "f64")]
    pub gross_yield: Decimal,
    /// Net operating income over purchase price
    #[schemars(with = "f64")]
    pub cap_rate: Decimal,
    /// Net cash flow over the deposit; absent without a deposit
    #[schemars(with = "Option<f64>")]
    pub cash_on_cash_return: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CashFlowProjection {
    pub assumptions: CashFlowAssumptions,
    #[schemars(with = "f64")]
    pub loan_principal: Decimal,
    #[schemars(with = "f64")]
    pub monthly_repayment: Decimal,
    pub years: Vec<CashFlowYear>,
    pub metrics: InvestmentMetrics,
}

/// Every problem with the request's financing fields
pub fn validate_financing(request: &DepreciationRequest) -> Vec<DepreciationError> {
    let invalid = |field: &'static str, reason: String| DepreciationError::InvalidFinancing { field, reason };
    let mut errors = Vec::new();

    if let Some(rate) = request.interest_rate {
        if rate < Decimal::ZERO || rate > MAX_INTEREST_RATE {
            errors.push(invalid(
                "interest_rate",
                format!("{}% is outside 0..={}%", rate, MAX_INTEREST_RATE),
            ));
        }
    }
    if let Some(term) = request.loan_term {
        if !(1..=MAX_LOAN_TERM).contains(&term) {
            errors.push(invalid(
                "loan_term",
                format!("{} years is outside 1..={}", term, MAX_LOAN_TERM),
            ));
        }
    }
    if let Some(downpayment) = request.downpayment {
        if downpayment < Decimal::ZERO || downpayment > request.purchase_price {
            errors.push(invalid(
                "downpayment",
                format!(
                    "{} must be between 0 and the purchase price {}",
                    downpayment, request.purchase_price
                ),
            ));
        }
    }
    if let Some(rent) = request.rental_income {
        if rent < Decimal::ZERO {
            errors.push(invalid("rental_income", format!("must not be negative (got {})", rent)));
        }
    }
    errors
}

/// Repayment and interest for each loan year, unrounded
struct LoanSchedule {
    monthly_repayment: Decimal,
    term_years: u32,
    yearly_interest: Vec<Decimal>,
}

impl LoanSchedule {
    fn none() -> Self {
        LoanSchedule {
            monthly_repayment: Decimal::ZERO,
            term_years: 0,
            yearly_interest: Vec::new(),
        }
    }

    fn repayments_in(&self, year: u32) -> Decimal {
        if year <= self.term_years {
            self.monthly_repayment * Decimal::from(MONTHS_PER_YEAR)
        } else {
            Decimal::ZERO
        }
    }

    fn interest_in(&self, year: u32) -> Decimal {
        self.yearly_interest
            .get(year as usize - 1)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

/// Standard amortizing loan with monthly repayments
fn amortize(
    principal: Decimal,
    annual_rate_percent: Decimal,
    term_years: u32,
) -> Result<LoanSchedule, DepreciationError> {
    if principal <= Decimal::ZERO {
        return Ok(LoanSchedule::none());
    }
    let months = term_years * MONTHS_PER_YEAR;
    let monthly_rate = annual_rate_percent / Decimal::ONE_HUNDRED / Decimal::from(MONTHS_PER_YEAR);

    let monthly_repayment = if monthly_rate.is_zero() {
        principal / Decimal::from(months)
    } else {
        // (1 + r)^n by repeated multiplication keeps full decimal precision
        let mut growth = Decimal::ONE;
        for _ in 0..months {
            growth = growth
                .checked_mul(Decimal::ONE + monthly_rate)
                .ok_or_else(|| overflow("loan repayment"))?;
        }
        principal
            .checked_mul(monthly_rate)
            .and_then(|v| v.checked_mul(growth))
            .and_then(|v| v.checked_div(growth - Decimal::ONE))
            .ok_or_else(|| overflow("loan repayment"))?
    };

    let mut balance = principal;
    let mut yearly_interest = Vec::with_capacity(term_years as usize);
    for _ in 0..term_years {
        let mut interest = Decimal::ZERO;
        for _ in 0..MONTHS_PER_YEAR {
            let month_interest = balance * monthly_rate;
            interest += month_interest;
            balance = (balance + month_interest - monthly_repayment).max(Decimal::ZERO);
        }
        yearly_interest.push(interest);
    }

    log::debug!(
        "Loan: principal={}, rate={}%, term={} years, monthly repayment={}",
        principal,
        annual_rate_percent,
        term_years,
        monthly_repayment
    );

    Ok(LoanSchedule {
        monthly_repayment,
        term_years,
        yearly_interest,
    })
}

pub fn project_cash_flow(
    request: &DepreciationRequest,
    response: &DepreciationResponse,
    assumptions: &CashFlowAssumptions,
) -> Result<CashFlowProjection, DepreciationError> {
    if let Some(err) = validate_financing(request).into_iter().next() {
        return Err(err);
    }

    let savings = TaxSavings::at_rate(response, assumptions.marginal_tax_rate)?;

    let weekly_rent = request.rental_income.unwrap_or(Decimal::ZERO);
    let rent = weekly_rent
        .checked_mul(Decimal::from(assumptions.weeks_per_year))
        .ok_or_else(|| overflow("rental income"))?;
    let operating_expenses = rent
        .checked_mul(assumptions.management_fee_rate)
        .and_then(|fee| fee.checked_add(assumptions.annual_maintenance))
        .ok_or_else(|| overflow("operating expenses"))?;

    let downpayment = request.downpayment.unwrap_or(Decimal::ZERO);
    let loan_principal = request.purchase_price - downpayment;
    let loan = match (request.interest_rate, request.loan_term) {
        (Some(rate), Some(term)) => amortize(loan_principal, rate, term)?,
        _ => {
            log::debug!("No interest rate or loan term given, projecting without a loan");
            LoanSchedule::none()
        }
    };

    let years = (1..=HORIZON_YEARS)
        .map(|year| -> Result<CashFlowYear, DepreciationError> {
            let loan_repayments = round_money(loan.repayments_in(year));
            let tax_saving = savings
                .yearly
                .get(year as usize - 1)
                .copied()
                .unwrap_or(Decimal::ZERO);
            let rental_income = round_money(rent);
            let operating_expenses = round_money(operating_expenses);
            let net_cash_flow = rental_income
                .checked_sub(loan_repayments)
                .and_then(|v| v.checked_sub(operating_expenses))
                .and_then(|v| v.checked_add(tax_saving))
                .ok_or_else(|| overflow("net cash flow"))?;
            Ok(CashFlowYear {
                year,
                rental_income,
                loan_repayments,
                interest: round_money(loan.interest_in(year)),
                operating_expenses,
                tax_saving,
                net_cash_flow,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let first = &years[0];
    let net_operating_income = first.rental_income - first.operating_expenses;
    let metrics = InvestmentMetrics {
        gross_yield: percentage(first.rental_income, request.purchase_price),
        cap_rate: percentage(net_operating_income, request.purchase_price),
        cash_on_cash_return: if downpayment > Decimal::ZERO {
            Some(percentage(first.net_cash_flow, downpayment))
        } else {
            None
        },
    };

    Ok(CashFlowProjection {
        assumptions: assumptions.clone(),
        loan_principal: round_money(if loan.term_years > 0 { loan_principal } else { Decimal::ZERO }),
        monthly_repayment: round_money(loan.monthly_repayment),
        years,
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::DepreciationEngine;
    use crate::core::model::PropertyType;
    use crate::core::regime::Regime;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn request() -> DepreciationRequest {
        DepreciationRequest {
            property_type: PropertyType::Residential,
            construction_date: date("2024-03-01"),
            purchase_date: date("2024-07-01"),
            purchase_price: dec!(650000),
            land_value: dec!(250000),
            is_new_property: true,
            interest_rate: Some(dec!(6)),
            loan_term: Some(30),
            downpayment: Some(dec!(250000)),
            rental_income: Some(dec!(600)),
            assets: vec![],
        }
    }

    fn project(request: &DepreciationRequest) -> Result<CashFlowProjection, DepreciationError> {
        let response = DepreciationEngine::new(Regime::default(), date("2026-01-01"))
            .calculate(request)
            .unwrap();
        project_cash_flow(request, &response, &CashFlowAssumptions::default())
    }

    #[test]
    fn amortizing_loan_repayment() {
        let projection = project(&request()).unwrap();

        assert_eq!(projection.loan_principal, dec!(400000));
        assert_eq!(projection.monthly_repayment, dec!(2398.20));
        let year1 = &projection.years[0];
        assert!(year1.loan_repayments > dec!(28778) && year1.loan_repayments < dec!(28779));
        assert!(year1.interest > Decimal::ZERO && year1.interest < year1.loan_repayments);
        assert!(projection.years[30].loan_repayments.is_zero());
        assert!(projection.years[30].interest.is_zero());
    }

    #[test]
    fn principal_is_repaid_over_the_term() {
        let loan = amortize(dec!(400000), dec!(6), 30).unwrap();
        let repaid: Decimal = (1..=30)
            .map(|year| loan.repayments_in(year) - loan.interest_in(year))
            .sum();
        assert!((repaid - dec!(400000)).abs() < dec!(0.01));
        // interest falls as the balance is paid down
        assert!(loan.interest_in(2) < loan.interest_in(1));
    }

    #[test]
    fn interest_free_loan_is_split_evenly() {
        let loan = amortize(dec!(120000), Decimal::ZERO, 10).unwrap();
        assert_eq!(loan.monthly_repayment, dec!(1000));
        assert_eq!(loan.repayments_in(1), dec!(12000));
        assert!(loan.interest_in(1).is_zero());
        assert!(loan.repayments_in(11).is_zero());
    }

    #[test]
    fn net_cash_flow_adds_up() {
        let projection = project(&request()).unwrap();
        for year in &projection.years {
            assert_eq!(
                year.net_cash_flow,
                year.rental_income - year.loan_repayments - year.operating_expenses + year.tax_saving
            );
        }
        // 600 * 52 rent, 8% management fee plus 5000 maintenance
        assert_eq!(projection.years[0].rental_income, dec!(31200));
        assert_eq!(projection.years[0].operating_expenses, dec!(7496));
        // 10000 capital works at 32%
        assert_eq!(projection.years[0].tax_saving, dec!(3200));
    }

    #[test]
    fn year_one_metrics() {
        let projection = project(&request()).unwrap();
        let metrics = &projection.metrics;

        assert_eq!(metrics.gross_yield, dec!(4.80));
        // (31200 - 7496) / 650000
        assert_eq!(metrics.cap_rate, dec!(3.65));
        let expected = percentage(projection.years[0].net_cash_flow, dec!(250000));
        assert_eq!(metrics.cash_on_cash_return, Some(expected));
    }

    #[test]
    fn no_financing_fields_means_no_loan() {
        let mut req = request();
        req.interest_rate = None;
        req.loan_term = None;
        req.downpayment = None;
        req.rental_income = None;
        let projection = project(&req).unwrap();

        assert!(projection.loan_principal.is_zero());
        assert!(projection.years.iter().all(|y| y.loan_repayments.is_zero()));
        assert_eq!(projection.years[0].net_cash_flow, dec!(-5000) + dec!(3200));
        assert_eq!(projection.metrics.cash_on_cash_return, None);
        assert!(projection.metrics.gross_yield.is_zero());
    }

    #[test]
    fn financing_bounds_are_checked() {
        let mut req = request();
        req.interest_rate = Some(dec!(21));
        req.loan_term = Some(0);
        req.downpayment = Some(dec!(700000));
        req.rental_income = Some(dec!(-1));

        let fields: Vec<String> = validate_financing(&req).iter().map(|e| e.field()).collect();
        assert_eq!(fields, vec!["interest_rate", "loan_term", "downpayment", "rental_income"]);
        assert_eq!(project(&req).unwrap_err().field(), "interest_rate");
    }

    #[test]
    fn boundary_financing_values_accepted() {
        let mut req = request();
        req.interest_rate = Some(dec!(20));
        req.loan_term = Some(40);
        req.downpayment = Some(req.purchase_price);
        assert!(validate_financing(&req).is_empty());

        // fully paid in cash: no loan left to amortize
        let projection = project(&req).unwrap();
        assert!(projection.monthly_repayment.is_zero());
    }
}
