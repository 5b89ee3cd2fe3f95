//! Calculation engines, one per calculator
//!
//! Each engine is a set of pure functions from an input struct to a result
//! struct. Results carry their chart series as lazy [`Sampled`](crate::series::Sampled)
//! sources or iterators; nothing is cached between calls.

pub mod cagr;
pub mod emi;
pub mod sip;
pub mod inflation;
pub mod retirement;
pub mod goal;

pub use cagr::{cagr, growth_series, CagrInput, CagrResult, GrowthCurve, GrowthPoint};
pub use emi::{
    amortization_schedule, emi, AmortizationRow, AmortizationSchedule, EmiInput, EmiResult,
    EmiSummary,
};
pub use sip::{sip_future_value, SipGrowth, SipInput, SipPoint, SipResult};
pub use inflation::{
    future_value, present_value_deflated, Adjustment, InflationInput, InflationResult, ValuePath,
    ValuePoint,
};
pub use retirement::{
    corpus_longevity, retirement_plan, retirement_plan_with_horizon, CorpusDrawdown,
    CorpusLongevity, DrawdownPoint, ExpenseGrowth, ExpensePoint, RetirementInput, RetirementPlan,
    DEFAULT_LIFE_EXPECTANCY_AGE,
};
pub use goal::{
    goal_plan, GoalInput, GoalMode, GoalPlan, GoalPoint, GoalProgress, RequiredInvestment,
};
