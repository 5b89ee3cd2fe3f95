//! Engine configuration: planning horizon and input bounds

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::engines::DEFAULT_LIFE_EXPECTANCY_AGE;
use crate::error::{CalcError, CalcResult, DataError};

/// Bounds applied to user input before it reaches an engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputLimits {
    /// Longest duration accepted, in years
    pub max_years: u32,
    /// Highest annual rate accepted, in percent
    pub max_rate_pct: f64,
    /// Oldest age accepted
    pub max_age: u32,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_years: 100,
            max_rate_pct: 50.0,
            max_age: 100,
        }
    }
}

impl InputLimits {
    pub fn check_years(&self, field: &'static str, years: u32) -> CalcResult<()> {
        if years > self.max_years {
            return Err(CalcError::invalid(
                field,
                format!("{} years exceeds the maximum of {}", years, self.max_years),
            ));
        }
        Ok(())
    }

    pub fn check_rate(&self, field: &'static str, rate_pct: f64) -> CalcResult<()> {
        if !rate_pct.is_finite() || rate_pct < 0.0 || rate_pct > self.max_rate_pct {
            return Err(CalcError::invalid(
                field,
                format!("{}% is outside 0-{}%", rate_pct, self.max_rate_pct),
            ));
        }
        Ok(())
    }

    pub fn check_amount(&self, field: &'static str, amount: f64) -> CalcResult<()> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(CalcError::invalid(field, "must be a non-negative amount"));
        }
        Ok(())
    }

    pub fn check_age(&self, field: &'static str, age: u32) -> CalcResult<()> {
        if age > self.max_age {
            return Err(CalcError::invalid(
                field,
                format!("{} exceeds the maximum age of {}", age, self.max_age),
            ));
        }
        Ok(())
    }
}

/// Settings shared by every calculation a runner performs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Age retirement withdrawals must last until
    pub life_expectancy_age: u32,
    pub limits: InputLimits,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            life_expectancy_age: DEFAULT_LIFE_EXPECTANCY_AGE,
            limits: InputLimits::default(),
        }
    }
}

impl EngineConfig {
    /// Load a config from JSON; omitted fields keep their defaults
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let file = File::open(path)?;
        Self::from_json_reader(BufReader::new(file))
    }

    pub fn from_json_reader<R: std::io::Read>(reader: R) -> Result<Self, DataError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Override the retirement planning horizon
    pub fn with_life_expectancy(mut self, age: u32) -> Self {
        self.life_expectancy_age = age;
        self
    }
}
