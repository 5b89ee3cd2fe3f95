//! Compound annual growth rate

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};
use crate::rates::{round2, AnnualRate};
use crate::series::Sampled;

/// Inputs for the CAGR calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CagrInput {
    pub initial_value: f64,
    pub final_value: f64,
    pub years: u32,
}

impl Default for CagrInput {
    fn default() -> Self {
        Self {
            initial_value: 10_000.0,
            final_value: 20_000.0,
            years: 5,
        }
    }
}

/// CAGR with the growth curve it implies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CagrResult {
    /// Annual growth rate in percent
    pub rate_pct: f64,
    pub growth: GrowthCurve,
}

/// Compound annual growth rate in percent.
///
/// Defined only for finite positive start and end values and at least one year.
pub fn cagr(initial_value: f64, final_value: f64, years: u32) -> CalcResult<f64> {
    if !(initial_value > 0.0 && initial_value.is_finite()) {
        return Err(CalcError::invalid("initial_value", "must be finite and greater than zero"));
    }
    if !(final_value > 0.0 && final_value.is_finite()) {
        return Err(CalcError::invalid("final_value", "must be finite and greater than zero"));
    }
    if years == 0 {
        return Err(CalcError::invalid("years", "must be at least one year"));
    }

    Ok(((final_value / initial_value).powf(1.0 / years as f64) - 1.0) * 100.0)
}

/// Year-by-year value of `initial_value` growing at `rate_pct`, years 0..=years
pub fn growth_series(initial_value: f64, rate_pct: f64, years: u32) -> GrowthCurve {
    GrowthCurve {
        initial_value,
        rate: AnnualRate::from_percent(rate_pct),
        years,
    }
}

pub fn calculate(input: &CagrInput) -> CalcResult<CagrResult> {
    let rate_pct = cagr(input.initial_value, input.final_value, input.years)?;
    debug!(
        "cagr: {} -> {} over {}y = {:.4}%",
        input.initial_value, input.final_value, input.years, rate_pct
    );

    Ok(CagrResult {
        rate_pct,
        growth: growth_series(input.initial_value, rate_pct, input.years),
    })
}

/// Growth curve sampled at whole years
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthCurve {
    pub initial_value: f64,
    pub rate: AnnualRate,
    pub years: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthPoint {
    pub year: u32,
    pub value: f64,
}

impl Sampled for GrowthCurve {
    type Point = GrowthPoint;

    fn last_period(&self) -> u32 {
        self.years
    }

    fn sample(&self, year: u32) -> GrowthPoint {
        GrowthPoint {
            year,
            value: round2(self.initial_value * self.rate.annual_growth(year)),
        }
    }
}
