//! Goal-based investment: the SIP or lump sum needed to reach a target

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};
use crate::rates::{
    annuity_factor, check_compounded, check_finite, check_rate, round2, AnnualRate, Tenure,
};
use crate::series::Sampled;

/// How the goal is funded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalMode {
    /// Fixed monthly contribution
    #[default]
    Sip,
    /// Single investment today
    Lumpsum,
}

/// Inputs for the goal calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalInput {
    pub goal_amount: f64,
    pub years: u32,
    pub expected_return_pct: f64,
    pub mode: GoalMode,
}

impl Default for GoalInput {
    fn default() -> Self {
        Self {
            goal_amount: 1_000_000.0,
            years: 10,
            expected_return_pct: 12.0,
            mode: GoalMode::Sip,
        }
    }
}

/// Amount that must be invested
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredInvestment {
    MonthlySip {
        amount: f64,
        /// amount × months
        total_invested: f64,
    },
    Lumpsum {
        amount: f64,
    },
}

impl RequiredInvestment {
    pub fn amount(&self) -> f64 {
        match self {
            RequiredInvestment::MonthlySip { amount, .. } => *amount,
            RequiredInvestment::Lumpsum { amount } => *amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalPlan {
    pub required: RequiredInvestment,
    /// Goal escalated by the expected return over the horizon.
    ///
    /// The expected return doubles as the escalation rate here; there is no
    /// separate inflation input.
    pub inflation_adjusted_goal: f64,
    pub progress: GoalProgress,
}

pub fn goal_plan(input: &GoalInput) -> CalcResult<GoalPlan> {
    let goal_amount = check_finite("goal_amount", input.goal_amount)?;
    let rate = check_rate("expected_return_pct", input.expected_return_pct)?;
    let tenure = Tenure::new(input.years)?;

    let required = match input.mode {
        GoalMode::Sip => {
            if tenure.is_empty() {
                return Err(CalcError::invalid("years", "a SIP needs at least one year"));
            }
            let n = tenure.in_months();
            if rate.is_zero() {
                warn!("goal: zero expected return, SIP is goal / months");
            }
            let amount = goal_amount / annuity_factor(rate.monthly_fraction(), n);
            RequiredInvestment::MonthlySip {
                amount,
                total_invested: amount * n as f64,
            }
        }
        GoalMode::Lumpsum => RequiredInvestment::Lumpsum {
            amount: goal_amount / rate.annual_growth(tenure.in_years()),
        },
    };

    let inflation_adjusted_goal =
        check_compounded("years", goal_amount * rate.annual_growth(tenure.in_years()))?;
    debug!(
        "goal: {} in {}y at {}% via {:?} -> {:.2}",
        input.goal_amount,
        input.years,
        input.expected_return_pct,
        input.mode,
        required.amount()
    );

    Ok(GoalPlan {
        required,
        inflation_adjusted_goal,
        progress: GoalProgress {
            required,
            rate,
            years: input.years,
        },
    })
}

/// Value accumulated towards the goal at each whole year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub required: RequiredInvestment,
    pub rate: AnnualRate,
    pub years: u32,
}

impl GoalProgress {
    pub fn value_at(&self, year: u32) -> f64 {
        match self.required {
            RequiredInvestment::MonthlySip { amount, .. } => {
                amount * annuity_factor(self.rate.monthly_fraction(), year.saturating_mul(12))
            }
            RequiredInvestment::Lumpsum { amount } => amount * self.rate.annual_growth(year),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalPoint {
    pub year: u32,
    pub value: f64,
}

impl Sampled for GoalProgress {
    type Point = GoalPoint;

    fn last_period(&self) -> u32 {
        self.years
    }

    fn sample(&self, year: u32) -> GoalPoint {
        GoalPoint {
            year,
            value: round2(self.value_at(year)),
        }
    }
}
