//! Rate and duration inputs shared by every calculator
//!
//! Rates arrive as annual percentages (8.0 means 8%) and are converted to
//! annual or monthly fractions here, the same way for every engine.

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};

/// Rates with magnitude below this are treated as exactly zero
pub const ZERO_RATE_EPSILON: f64 = 1e-10;

/// Longest tenure whose month count still fits a compounding exponent
pub const MAX_TENURE_YEARS: u32 = i32::MAX as u32 / 12;

/// Accept an annual percentage that compounds to a finite, positive factor
pub fn check_rate(field: &'static str, rate_pct: f64) -> CalcResult<AnnualRate> {
    if !rate_pct.is_finite() || rate_pct <= -100.0 {
        return Err(CalcError::invalid(field, "rate must be finite and above -100%"));
    }
    Ok(AnnualRate::from_percent(rate_pct))
}

pub fn check_finite(field: &'static str, value: f64) -> CalcResult<f64> {
    if !value.is_finite() {
        return Err(CalcError::invalid(field, "must be a finite number"));
    }
    Ok(value)
}

/// Reject a computed value that compounding pushed out of range
pub fn check_compounded(field: &'static str, value: f64) -> CalcResult<f64> {
    if !value.is_finite() {
        return Err(CalcError::invalid(field, "result overflows at this rate and tenure"));
    }
    Ok(value)
}

/// Annual percentage rate as entered by the user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnualRate(f64);

impl AnnualRate {
    pub fn from_percent(percent: f64) -> Self {
        Self(percent)
    }

    pub fn percent(&self) -> f64 {
        self.0
    }

    /// Annual rate as a decimal (8% -> 0.08)
    pub fn annual_fraction(&self) -> f64 {
        self.0 / 100.0
    }

    /// Nominal monthly rate as a decimal (8% -> 0.08 / 12)
    pub fn monthly_fraction(&self) -> f64 {
        self.0 / 12.0 / 100.0
    }

    pub fn is_zero(&self) -> bool {
        self.monthly_fraction().abs() < ZERO_RATE_EPSILON
    }

    /// Annual growth factor over whole years: (1 + r)^years
    pub fn annual_growth(&self, years: u32) -> f64 {
        compound_factor(self.annual_fraction(), years)
    }

    /// Monthly growth factor over whole months: (1 + r/12)^months
    pub fn monthly_growth(&self, months: u32) -> f64 {
        compound_factor(self.monthly_fraction(), months)
    }
}

/// Whole-year duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tenure(u32);

impl Tenure {
    /// Whole years, bounded so the month count cannot overflow
    pub fn new(years: u32) -> CalcResult<Self> {
        if years > MAX_TENURE_YEARS {
            return Err(CalcError::invalid(
                "years",
                format!("must be at most {MAX_TENURE_YEARS}"),
            ));
        }
        Ok(Self(years))
    }

    pub fn in_years(&self) -> u32 {
        self.0
    }

    pub fn in_months(&self) -> u32 {
        self.0 * 12
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// (1 + rate)^periods
pub fn compound_factor(rate: f64, periods: u32) -> f64 {
    match i32::try_from(periods) {
        Ok(n) => (1.0 + rate).powi(n),
        Err(_) => (1.0 + rate).powf(f64::from(periods)),
    }
}

/// Future value of 1 paid at the end of each period: ((1 + r)^n - 1) / r
///
/// At r = 0 the limit is simply n.
pub fn annuity_factor(rate: f64, periods: u32) -> f64 {
    if rate.abs() < ZERO_RATE_EPSILON {
        return periods as f64;
    }
    (compound_factor(rate, periods) - 1.0) / rate
}

/// Round to 2 decimal places, the precision used for every emitted series point
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}
