//! Systematic investment plan: lump sum plus a fixed monthly contribution

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::CalcResult;
use crate::rates::{
    annuity_factor, check_compounded, check_finite, check_rate, round2, AnnualRate, Tenure,
};
use crate::series::Sampled;

/// Inputs for the SIP calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SipInput {
    pub initial_investment: f64,
    pub monthly_contribution: f64,
    pub annual_rate_pct: f64,
    pub years: u32,
}

impl Default for SipInput {
    fn default() -> Self {
        Self {
            initial_investment: 0.0,
            monthly_contribution: 0.0,
            annual_rate_pct: 12.0,
            years: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipResult {
    pub total_value: f64,
    pub total_investment: f64,
    pub actual_returns: f64,
    pub growth: SipGrowth,
}

/// Future value after `years` of monthly compounding.
///
/// Contributions are made at the end of each month. At a zero rate the value
/// is simply everything paid in.
pub fn sip_future_value(
    initial_investment: f64,
    monthly_contribution: f64,
    annual_rate_pct: f64,
    years: u32,
) -> CalcResult<f64> {
    let growth = SipGrowth::new(initial_investment, monthly_contribution, annual_rate_pct, years)?;
    growth.final_value()
}

pub fn calculate(input: &SipInput) -> CalcResult<SipResult> {
    let growth = SipGrowth::new(
        input.initial_investment,
        input.monthly_contribution,
        input.annual_rate_pct,
        input.years,
    )?;

    let total_value = growth.final_value()?;
    let total_investment = growth.invested_after_months(growth.months());
    debug!(
        "sip: {} + {}/month at {}% for {}y -> {:.2}",
        input.initial_investment,
        input.monthly_contribution,
        input.annual_rate_pct,
        input.years,
        total_value
    );

    Ok(SipResult {
        total_value,
        total_investment,
        actual_returns: total_value - total_investment,
        growth,
    })
}

/// Year-wise portfolio value against money paid in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipGrowth {
    pub initial_investment: f64,
    pub monthly_contribution: f64,
    pub rate: AnnualRate,
    pub years: u32,
}

impl SipGrowth {
    pub fn new(
        initial_investment: f64,
        monthly_contribution: f64,
        annual_rate_pct: f64,
        years: u32,
    ) -> CalcResult<Self> {
        Ok(Self {
            initial_investment: check_finite("initial_investment", initial_investment)?,
            monthly_contribution: check_finite("monthly_contribution", monthly_contribution)?,
            rate: check_rate("annual_rate_pct", annual_rate_pct)?,
            years: Tenure::new(years)?.in_years(),
        })
    }

    fn months(&self) -> u32 {
        self.years.saturating_mul(12)
    }

    fn final_value(&self) -> CalcResult<f64> {
        check_compounded("years", self.value_after_months(self.months()))
    }

    pub fn value_after_months(&self, months: u32) -> f64 {
        let r = self.rate.monthly_fraction();
        self.monthly_contribution * annuity_factor(r, months)
            + self.initial_investment * self.rate.monthly_growth(months)
    }

    pub fn invested_after_months(&self, months: u32) -> f64 {
        self.initial_investment + self.monthly_contribution * months as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SipPoint {
    pub year: u32,
    pub value: f64,
    pub invested: f64,
}

impl Sampled for SipGrowth {
    type Point = SipPoint;

    fn last_period(&self) -> u32 {
        self.years
    }

    fn sample(&self, year: u32) -> SipPoint {
        let months = year.saturating_mul(12);
        SipPoint {
            year,
            value: round2(self.value_after_months(months)),
            invested: round2(self.invested_after_months(months)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_monthly_contribution_twenty_years() {
        let value = sip_future_value(0.0, 1_000.0, 12.0, 20).unwrap();
        assert_abs_diff_eq!(value, 989_255.37, epsilon = 1.0);
    }

    #[test]
    fn test_zero_rate_is_exact() {
        assert_eq!(sip_future_value(0.0, 1_000.0, 0.0, 10).unwrap(), 120_000.0);
        assert_eq!(sip_future_value(5_000.0, 1_000.0, 0.0, 10).unwrap(), 125_000.0);
    }

    #[test]
    fn test_non_finite_inputs_rejected() {
        for rate in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -100.0] {
            let err = sip_future_value(0.0, 1_000.0, rate, 10).unwrap_err();
            assert_eq!(err.field(), "annual_rate_pct");
        }
        let err = sip_future_value(f64::NAN, 1_000.0, 12.0, 10).unwrap_err();
        assert_eq!(err.field(), "initial_investment");

        let input = SipInput { monthly_contribution: f64::INFINITY, ..SipInput::default() };
        assert_eq!(calculate(&input).unwrap_err().field(), "monthly_contribution");
    }

    #[test]
    fn test_overflowing_horizon_rejected() {
        assert_eq!(sip_future_value(0.0, 1_000.0, 12.0, u32::MAX).unwrap_err().field(), "years");
        // fits the month count but the value itself overflows
        assert!(sip_future_value(1.0, 1.0, 50.0, 100_000).is_err());
    }

    #[test]
    fn test_matches_negated_present_value_identity() {
        // FV = -( -PMT * ((1+r)^n - 1)/r - PV * (1+r)^n )
        for &(pv, pmt, rate, years) in &[
            (0.0, 1_000.0, 12.0, 20),
            (100_000.0, 5_000.0, 8.5, 15),
            (25_000.0, 0.0, 6.0, 7),
            (1.0, 1.0, 0.5, 1),
        ] {
            let r: f64 = rate / 100.0 / 12.0;
            let n = years * 12;
            let growth = (1.0 + r).powi(n as i32);
            let negated = -(pmt * ((growth - 1.0) / r)) - pv * growth;
            assert_relative_eq!(
                sip_future_value(pv, pmt, rate, years).unwrap(),
                -negated,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_totals() {
        let input = SipInput {
            initial_investment: 10_000.0,
            monthly_contribution: 2_000.0,
            annual_rate_pct: 10.0,
            years: 5,
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.total_investment, 130_000.0);
        assert_abs_diff_eq!(
            result.actual_returns,
            result.total_value - 130_000.0,
            epsilon = 1e-9
        );
        assert!(result.actual_returns > 0.0);
    }

    #[test]
    fn test_yearly_series() {
        let input = SipInput {
            initial_investment: 0.0,
            monthly_contribution: 1_000.0,
            annual_rate_pct: 12.0,
            years: 20,
        };
        let result = calculate(&input).unwrap();
        let points: Vec<_> = result.growth.points().collect();

        assert_eq!(points.len(), 21);
        assert_eq!(points[0], SipPoint { year: 0, value: 0.0, invested: 0.0 });
        assert_eq!(points[1].invested, 12_000.0);
        assert_abs_diff_eq!(points[1].value, 12_682.50, epsilon = 0.01);
        assert_eq!(points[20].value, round2(result.total_value));
        assert_eq!(points[20].invested, 240_000.0);
    }

    #[test]
    fn test_default_input_is_all_zero_value() {
        let result = calculate(&SipInput::default()).unwrap();
        assert_eq!(result.total_value, 0.0);
        assert_eq!(result.actual_returns, 0.0);
    }
}
