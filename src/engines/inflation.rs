//! Inflation and value depreciation
//!
//! Two duals of the same compounding model: what a fixed basket will cost in
//! `years` (inflate), and what a fixed sum will be worth in today's money
//! after `years` (deflate).

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::CalcResult;
use crate::rates::{check_compounded, check_finite, check_rate, round2, AnnualRate, Tenure};
use crate::series::Sampled;

/// Direction of the adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Adjustment {
    /// Nominal cost growth: amount × (1 + r)^t
    Inflate,
    /// Purchasing-power loss: amount / (1 + r)^t
    Deflate,
}

/// Inputs shared by the inflation and value-depreciation calculators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InflationInput {
    pub amount: f64,
    pub rate_pct: f64,
    pub years: u32,
}

impl Default for InflationInput {
    fn default() -> Self {
        Self {
            amount: 1_000.0,
            rate_pct: 6.0,
            years: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InflationResult {
    pub adjustment: Adjustment,
    pub result: f64,
    /// result - amount
    pub difference: f64,
    pub path: ValuePath,
}

/// What `amount` grows to after `years` at `rate_pct`
pub fn future_value(amount: f64, rate_pct: f64, years: u32) -> CalcResult<f64> {
    ValuePath::new(amount, rate_pct, years, Adjustment::Inflate)?.final_value()
}

/// What `amount` is worth in today's money after `years` at `rate_pct`
pub fn present_value_deflated(amount: f64, rate_pct: f64, years: u32) -> CalcResult<f64> {
    ValuePath::new(amount, rate_pct, years, Adjustment::Deflate)?.final_value()
}

pub fn calculate(input: &InflationInput, adjustment: Adjustment) -> CalcResult<InflationResult> {
    let path = ValuePath::new(input.amount, input.rate_pct, input.years, adjustment)?;
    let result = path.final_value()?;
    debug!(
        "{:?}: {} at {}% for {}y -> {:.2}",
        adjustment, input.amount, input.rate_pct, input.years, result
    );

    Ok(InflationResult {
        adjustment,
        result,
        difference: result - input.amount,
        path,
    })
}

/// Adjusted value at every whole year 0..=years
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuePath {
    pub amount: f64,
    pub rate: AnnualRate,
    pub years: u32,
    pub adjustment: Adjustment,
}

impl ValuePath {
    pub fn new(amount: f64, rate_pct: f64, years: u32, adjustment: Adjustment) -> CalcResult<Self> {
        Ok(Self {
            amount: check_finite("amount", amount)?,
            rate: check_rate("rate_pct", rate_pct)?,
            years: Tenure::new(years)?.in_years(),
            adjustment,
        })
    }

    fn final_value(&self) -> CalcResult<f64> {
        check_compounded("years", self.value_at(self.years))
    }

    pub fn value_at(&self, year: u32) -> f64 {
        match self.adjustment {
            Adjustment::Inflate => self.amount * self.rate.annual_growth(year),
            Adjustment::Deflate => self.amount / self.rate.annual_growth(year),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuePoint {
    pub year: u32,
    pub value: f64,
}

impl Sampled for ValuePath {
    type Point = ValuePoint;

    fn last_period(&self) -> u32 {
        self.years
    }

    fn sample(&self, year: u32) -> ValuePoint {
        ValuePoint {
            year,
            value: round2(self.value_at(year)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_future_cost() {
        let result = calculate(&InflationInput::default(), Adjustment::Inflate).unwrap();
        assert_abs_diff_eq!(result.result, 1_790.85, epsilon = 0.01);
        assert_abs_diff_eq!(result.difference, 790.85, epsilon = 0.01);
    }

    #[test]
    fn test_depreciated_value() {
        let result = calculate(&InflationInput::default(), Adjustment::Deflate).unwrap();
        assert_abs_diff_eq!(result.result, 558.39, epsilon = 0.01);
        assert!(result.difference < 0.0);
    }

    #[test]
    fn test_round_trip() {
        for &amount in &[0.01, 1.0, 1_000.0, 2_500_000.0] {
            for &rate in &[0.0, 0.5, 6.0, 12.5, 50.0] {
                for years in [0, 1, 10, 37, 100] {
                    let grown = future_value(amount, rate, years).unwrap();
                    let back = present_value_deflated(grown, rate, years).unwrap();
                    assert_relative_eq!(back, amount, max_relative = 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_zero_years_is_identity() {
        assert_eq!(future_value(1_234.5, 7.0, 0).unwrap(), 1_234.5);
        assert_eq!(present_value_deflated(1_234.5, 7.0, 0).unwrap(), 1_234.5);
    }

    #[test]
    fn test_rejects_rate_at_minus_hundred() {
        assert!(present_value_deflated(100.0, -100.0, 3).is_err());
        assert!(future_value(100.0, f64::INFINITY, 3).is_err());
    }

    #[test]
    fn test_non_finite_inputs_rejected() {
        for rate in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(future_value(100.0, rate, 3).unwrap_err().field(), "rate_pct");
            assert_eq!(present_value_deflated(100.0, rate, 3).unwrap_err().field(), "rate_pct");
        }
        assert_eq!(future_value(f64::NAN, 6.0, 3).unwrap_err().field(), "amount");

        let input = InflationInput { rate_pct: f64::NAN, ..InflationInput::default() };
        assert!(calculate(&input, Adjustment::Deflate).is_err());
    }

    #[test]
    fn test_huge_horizon_rejected() {
        assert_eq!(future_value(100.0, 10.0, 3_000_000_000).unwrap_err().field(), "years");
        assert!(present_value_deflated(100.0, 10.0, u32::MAX).is_err());
        // within the tenure bound but past f64 range
        assert_eq!(future_value(100.0, 10.0, 10_000).unwrap_err().field(), "years");
        assert_eq!(present_value_deflated(100.0, 10.0, 10_000).unwrap(), 0.0);
    }

    #[test]
    fn test_series_follows_direction() {
        let input = InflationInput { amount: 100.0, rate_pct: 10.0, years: 3 };

        let up = calculate(&input, Adjustment::Inflate).unwrap();
        let values: Vec<f64> = up.path.points().map(|p| p.value).collect();
        assert_eq!(values, vec![100.0, 110.0, 121.0, 133.1]);

        let down = calculate(&input, Adjustment::Deflate).unwrap();
        let values: Vec<f64> = down.path.points().map(|p| p.value).collect();
        assert_eq!(values, vec![100.0, 90.91, 82.64, 75.13]);
    }
}
