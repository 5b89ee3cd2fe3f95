//! Loan EMI and amortization schedule

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};
use crate::rates::{check_compounded, check_finite, check_rate, compound_factor, round2, Tenure};

/// Inputs for the EMI calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmiInput {
    pub principal: f64,
    pub annual_rate_pct: f64,
    pub years: u32,
}

impl Default for EmiInput {
    fn default() -> Self {
        Self {
            principal: 500_000.0,
            annual_rate_pct: 8.0,
            years: 5,
        }
    }
}

/// Monthly installment and loan totals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmiSummary {
    pub monthly: f64,
    pub total_interest: f64,
    pub total_payment: f64,
}

/// Summary plus the amortization schedule that produces it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmiResult {
    pub summary: EmiSummary,
    pub schedule: AmortizationSchedule,
}

/// Equated monthly installment for a loan of `principal` over `years`.
///
/// A zero rate degenerates to straight-line repayment `principal / n`.
pub fn emi(principal: f64, annual_rate_pct: f64, years: u32) -> CalcResult<EmiSummary> {
    let principal = check_finite("principal", principal)?;
    let tenure = loan_tenure(years)?;
    let rate = check_rate("annual_rate_pct", annual_rate_pct)?;
    let r = rate.monthly_fraction();

    let n = tenure.in_months();
    let monthly = if rate.is_zero() {
        warn!("emi: zero interest rate, using straight-line repayment");
        principal / n as f64
    } else {
        let growth = compound_factor(r, n);
        principal * r * growth / (growth - 1.0)
    };

    let monthly = check_compounded("annual_rate_pct", monthly)?;

    let total_payment = monthly * n as f64;
    Ok(EmiSummary {
        monthly,
        total_interest: total_payment - principal,
        total_payment,
    })
}

/// Month-by-month split of each installment into principal and interest
pub fn amortization_schedule(
    principal: f64,
    annual_rate_pct: f64,
    years: u32,
) -> CalcResult<AmortizationSchedule> {
    let summary = emi(principal, annual_rate_pct, years)?;
    Ok(AmortizationSchedule {
        principal,
        monthly_rate: check_rate("annual_rate_pct", annual_rate_pct)?.monthly_fraction(),
        installment: summary.monthly,
        months: loan_tenure(years)?.in_months(),
    })
}

fn loan_tenure(years: u32) -> CalcResult<Tenure> {
    let tenure = Tenure::new(years)?;
    if tenure.is_empty() {
        return Err(CalcError::invalid("years", "loan tenure must be at least one year"));
    }
    Ok(tenure)
}

pub fn calculate(input: &EmiInput) -> CalcResult<EmiResult> {
    let summary = emi(input.principal, input.annual_rate_pct, input.years)?;
    debug!(
        "emi: P={} at {}% for {}y -> monthly {:.2}",
        input.principal, input.annual_rate_pct, input.years, summary.monthly
    );

    Ok(EmiResult {
        summary,
        schedule: amortization_schedule(input.principal, input.annual_rate_pct, input.years)?,
    })
}

/// Amortization schedule parameters; rows are generated on demand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub principal: f64,
    pub monthly_rate: f64,
    pub installment: f64,
    pub months: u32,
}

impl AmortizationSchedule {
    /// Iterate months 1..=n, carrying the running balance
    pub fn rows(&self) -> AmortizationRows<'_> {
        AmortizationRows {
            schedule: self,
            month: 0,
            balance: self.principal,
        }
    }

    pub fn len(&self) -> usize {
        self.months as usize
    }

    pub fn is_empty(&self) -> bool {
        self.months == 0
    }
}

/// One installment, rounded to cents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub principal: f64,
    pub interest: f64,
    /// Outstanding balance after this installment
    pub balance: f64,
}

/// Iterator over an [`AmortizationSchedule`]
#[derive(Debug, Clone)]
pub struct AmortizationRows<'a> {
    schedule: &'a AmortizationSchedule,
    month: u32,
    balance: f64,
}

impl AmortizationRows<'_> {
    /// Unrounded balance after the rows yielded so far
    pub fn balance(&self) -> f64 {
        self.balance
    }
}

impl Iterator for AmortizationRows<'_> {
    type Item = AmortizationRow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.month >= self.schedule.months {
            return None;
        }
        self.month += 1;

        let interest = self.balance * self.schedule.monthly_rate;
        let principal = self.schedule.installment - interest;
        self.balance -= principal;

        Some(AmortizationRow {
            month: self.month,
            principal: round2(principal),
            interest: round2(interest),
            balance: round2(self.balance),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.schedule.months - self.month) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for AmortizationRows<'_> {}
