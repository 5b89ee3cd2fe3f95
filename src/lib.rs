//! fincalc - Personal-finance calculation engines
//!
//! This library provides:
//! - CAGR, EMI/amortization and SIP future-value engines
//! - Inflation and value-depreciation projections
//! - Retirement corpus sizing with a year-by-year drawdown simulation
//! - Goal-based SIP / lump sum planning
//! - Reports (table, JSON, CSV) and a parallel scenario runner
//!
//! Every engine is a pure function of its inputs. Chart series are generated
//! lazily from the closed-form formulas and can be iterated any number of times.

pub mod error;
pub mod rates;
pub mod series;
pub mod engines;
pub mod catalog;
pub mod config;
pub mod report;
pub mod scenario;
pub mod loader;

// Re-export commonly used types
pub use error::{CalcError, CalcResult, DataError};
pub use catalog::CalculatorKind;
pub use config::{EngineConfig, InputLimits};
pub use report::{CalculationReport, Reportable};
pub use scenario::{CalculationRequest, ScenarioRunner};
pub use series::Sampled;
