//! Calculator catalog

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every calculator the crate provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalculatorKind {
    Inflation,
    ValueDepreciation,
    Sip,
    Cagr,
    Retirement,
    Emi,
    GoalBased,
}

impl CalculatorKind {
    pub const ALL: [CalculatorKind; 7] = [
        CalculatorKind::Inflation,
        CalculatorKind::ValueDepreciation,
        CalculatorKind::Sip,
        CalculatorKind::Cagr,
        CalculatorKind::Retirement,
        CalculatorKind::Emi,
        CalculatorKind::GoalBased,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            CalculatorKind::Inflation => "inflation",
            CalculatorKind::ValueDepreciation => "value-depreciation",
            CalculatorKind::Sip => "sip",
            CalculatorKind::Cagr => "cagr",
            CalculatorKind::Retirement => "retirement",
            CalculatorKind::Emi => "emi",
            CalculatorKind::GoalBased => "goal-based",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            CalculatorKind::Inflation => "Inflation Calculator",
            CalculatorKind::ValueDepreciation => "Value Depreciation Calculator",
            CalculatorKind::Sip => "SIP Calculator",
            CalculatorKind::Cagr => "CAGR Calculator",
            CalculatorKind::Retirement => "Retirement Calculator",
            CalculatorKind::Emi => "EMI Calculator",
            CalculatorKind::GoalBased => "Goal-Based Investment Calculator",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CalculatorKind::Inflation => {
                "See future inflation adjusted value of the current amount"
            }
            CalculatorKind::ValueDepreciation => "Loss of purchasing power over time",
            CalculatorKind::Sip => "Plan your mutual fund SIP returns",
            CalculatorKind::Cagr => "Compound annual growth rate",
            CalculatorKind::Retirement => "Plan how much you need to retire",
            CalculatorKind::Emi => "Calculate your monthly loan payments",
            CalculatorKind::GoalBased => "Monthly SIP or lump sum needed to reach a goal",
        }
    }
}

impl fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for CalculatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        CalculatorKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.slug() == wanted)
            .ok_or_else(|| format!("Unknown calculator: {}", s))
    }
}
