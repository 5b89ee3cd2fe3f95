//! Retirement corpus planning
//!
//! Projects today's monthly expense to the retirement date, sizes the corpus
//! that funds inflation-adjusted withdrawals until the life-expectancy horizon,
//! and simulates the corpus being drawn down year by year.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};
use crate::rates::{
    check_compounded, check_finite, check_rate, compound_factor, round2, ZERO_RATE_EPSILON,
};
use crate::series::Sampled;

/// Age the plan assumes withdrawals must last until
pub const DEFAULT_LIFE_EXPECTANCY_AGE: u32 = 85;

/// Inputs for the retirement calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetirementInput {
    pub current_age: u32,
    pub retirement_age: u32,
    /// Today's monthly expense
    pub monthly_expense: f64,
    pub inflation_pct: f64,
    /// Nominal annual return earned on the corpus after retirement
    pub post_retirement_return_pct: f64,
}

impl Default for RetirementInput {
    fn default() -> Self {
        Self {
            current_age: 30,
            retirement_age: 60,
            monthly_expense: 30_000.0,
            inflation_pct: 6.0,
            post_retirement_return_pct: 5.0,
        }
    }
}

/// How long the required corpus lasts when withdrawing a level annual expense
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorpusLongevity {
    /// Exhausted after this many (fractional) years
    Years(f64),
    /// Returns cover the expense; the corpus never runs out
    Forever,
}

impl CorpusLongevity {
    pub fn is_forever(&self) -> bool {
        matches!(self, CorpusLongevity::Forever)
    }

    pub fn years(&self) -> Option<f64> {
        match self {
            CorpusLongevity::Years(years) => Some(*years),
            CorpusLongevity::Forever => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementPlan {
    pub years_to_retire: u32,
    pub years_in_retirement: u32,
    /// Monthly expense at the retirement date
    pub future_monthly_expense: f64,
    /// First-year expense in retirement
    pub annual_expense: f64,
    /// Inflation-adjusted post-retirement return, as a decimal
    pub real_return: f64,
    pub required_corpus: f64,
    pub years_corpus_lasts: CorpusLongevity,
    pub expenses: ExpenseGrowth,
    pub drawdown: CorpusDrawdown,
}

/// Plan against the default 85-year horizon
pub fn retirement_plan(input: &RetirementInput) -> CalcResult<RetirementPlan> {
    retirement_plan_with_horizon(input, DEFAULT_LIFE_EXPECTANCY_AGE)
}

pub fn retirement_plan_with_horizon(
    input: &RetirementInput,
    life_expectancy_age: u32,
) -> CalcResult<RetirementPlan> {
    if input.retirement_age <= input.current_age {
        return Err(CalcError::invalid(
            "retirement_age",
            "must be later than the current age",
        ));
    }
    if input.retirement_age >= life_expectancy_age {
        return Err(CalcError::invalid(
            "retirement_age",
            format!("must be earlier than the planning horizon ({life_expectancy_age})"),
        ));
    }
    let monthly_expense = check_finite("monthly_expense", input.monthly_expense)?;
    let inflation = check_rate("inflation_pct", input.inflation_pct)?.annual_fraction();
    let nominal_return =
        check_rate("post_retirement_return_pct", input.post_retirement_return_pct)?
            .annual_fraction();

    let years_to_retire = input.retirement_age - input.current_age;
    let years_in_retirement = life_expectancy_age - input.retirement_age;
    let real_return = (1.0 + nominal_return) / (1.0 + inflation) - 1.0;

    let future_monthly_expense = check_compounded(
        "inflation_pct",
        monthly_expense * compound_factor(inflation, years_to_retire),
    )?;
    let annual_expense = future_monthly_expense * 12.0;
    let required_corpus = check_compounded(
        "post_retirement_return_pct",
        required_corpus(annual_expense, real_return, years_in_retirement),
    )?;
    let years_corpus_lasts = corpus_longevity(required_corpus, annual_expense, nominal_return);

    debug!(
        "retirement: {}y to retire, {}y retired, corpus {:.2}, lasts {:?}",
        years_to_retire, years_in_retirement, required_corpus, years_corpus_lasts
    );

    Ok(RetirementPlan {
        years_to_retire,
        years_in_retirement,
        future_monthly_expense,
        annual_expense,
        real_return,
        required_corpus,
        years_corpus_lasts,
        expenses: ExpenseGrowth {
            current_age: input.current_age,
            monthly_expense,
            inflation,
            years_to_retire,
        },
        drawdown: CorpusDrawdown {
            retirement_age: input.retirement_age,
            corpus: required_corpus,
            annual_expense,
            inflation,
            nominal_return,
            years_in_retirement,
        },
    })
}

/// Present value of `years` annual withdrawals of `annual_expense` discounted at the real return
pub fn required_corpus(annual_expense: f64, real_return: f64, years: u32) -> f64 {
    if real_return.abs() < ZERO_RATE_EPSILON {
        warn!("retirement: zero real return, corpus is expense x years");
        return annual_expense * years as f64;
    }
    annual_expense * (1.0 - compound_factor(real_return, years).recip()) / real_return
}

/// Years until `corpus` is exhausted by a level `annual_expense` while earning `nominal_return`
pub fn corpus_longevity(corpus: f64, annual_expense: f64, nominal_return: f64) -> CorpusLongevity {
    let annual_interest = corpus * nominal_return;
    if annual_expense <= annual_interest {
        return CorpusLongevity::Forever;
    }
    if nominal_return.abs() < ZERO_RATE_EPSILON {
        return CorpusLongevity::Years(corpus / annual_expense);
    }
    let years =
        (annual_expense / (annual_expense - annual_interest)).ln() / (1.0 + nominal_return).ln();
    CorpusLongevity::Years(years)
}

/// Monthly expense at each age from today until retirement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseGrowth {
    pub current_age: u32,
    pub monthly_expense: f64,
    pub inflation: f64,
    pub years_to_retire: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpensePoint {
    pub age: u32,
    pub monthly_expense: f64,
}

impl Sampled for ExpenseGrowth {
    type Point = ExpensePoint;

    fn last_period(&self) -> u32 {
        self.years_to_retire
    }

    fn sample(&self, year: u32) -> ExpensePoint {
        ExpensePoint {
            age: self.current_age + year,
            monthly_expense: round2(self.monthly_expense * compound_factor(self.inflation, year)),
        }
    }
}

/// Year-by-year corpus balance from the retirement date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusDrawdown {
    pub retirement_age: u32,
    pub corpus: f64,
    pub annual_expense: f64,
    pub inflation: f64,
    pub nominal_return: f64,
    pub years_in_retirement: u32,
}

impl CorpusDrawdown {
    /// Simulate until the horizon or until the corpus is exhausted
    pub fn years(&self) -> DrawdownYears<'_> {
        DrawdownYears {
            drawdown: self,
            year: 0,
            balance: self.corpus,
            exhausted: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawdownPoint {
    pub age: u32,
    /// End-of-year balance, floored at zero
    pub balance: f64,
    pub annual_expense: f64,
}

/// Iterator over a [`CorpusDrawdown`]
#[derive(Debug, Clone)]
pub struct DrawdownYears<'a> {
    drawdown: &'a CorpusDrawdown,
    year: u32,
    balance: f64,
    exhausted: bool,
}

impl Iterator for DrawdownYears<'_> {
    type Item = DrawdownPoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted || self.year > self.drawdown.years_in_retirement {
            return None;
        }

        let expense =
            self.drawdown.annual_expense * compound_factor(self.drawdown.inflation, self.year);
        let interest = self.balance * self.drawdown.nominal_return;
        self.balance = self.balance + interest - expense;

        let point = DrawdownPoint {
            age: self.drawdown.retirement_age + self.year,
            balance: round2(self.balance.max(0.0)),
            annual_expense: round2(expense),
        };

        self.year += 1;
        if self.balance <= 0.0 {
            self.exhausted = true;
        }
        Some(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_default_plan() {
        let plan = retirement_plan(&RetirementInput::default()).unwrap();

        assert_eq!(plan.years_to_retire, 30);
        assert_eq!(plan.years_in_retirement, 25);
        assert_abs_diff_eq!(plan.future_monthly_expense, 172_304.74, epsilon = 0.01);
        assert_abs_diff_eq!(plan.annual_expense, 2_067_656.82, epsilon = 0.01);
        assert_relative_eq!(plan.required_corpus, 58_606_781.19, max_relative = 1e-9);
        assert!(plan.real_return < 0.0);
        // 5% of the corpus exceeds the first-year expense
        assert!(plan.years_corpus_lasts.is_forever());
    }

    #[test]
    fn test_invalid_ages() {
        let mut input = RetirementInput::default();
        input.retirement_age = input.current_age;
        assert_eq!(retirement_plan(&input).unwrap_err().field(), "retirement_age");

        input.retirement_age = 85;
        assert!(retirement_plan(&input).is_err());

        input.retirement_age = 84;
        let plan = retirement_plan(&input).unwrap();
        assert_eq!(plan.years_in_retirement, 1);
    }

    #[test]
    fn test_custom_horizon() {
        let plan = retirement_plan_with_horizon(&RetirementInput::default(), 90).unwrap();
        assert_eq!(plan.years_in_retirement, 30);
    }

    #[test]
    fn test_zero_real_return_limit() {
        let input = RetirementInput {
            inflation_pct: 5.0,
            post_retirement_return_pct: 5.0,
            ..RetirementInput::default()
        };
        let plan = retirement_plan(&input).unwrap();
        assert_abs_diff_eq!(plan.real_return, 0.0, epsilon = 1e-12);
        assert_relative_eq!(
            plan.required_corpus,
            plan.annual_expense * 25.0,
            max_relative = 1e-12
        );
        assert!(plan.required_corpus.is_finite());
    }

    #[test]
    fn test_finite_longevity_exhausts_level_drawdown() {
        let input = RetirementInput {
            current_age: 40,
            retirement_age: 70,
            monthly_expense: 10_000.0,
            inflation_pct: 2.0,
            post_retirement_return_pct: 8.0,
        };
        let plan = retirement_plan(&input).unwrap();
        let years = plan.years_corpus_lasts.years().expect("corpus should run out");
        assert_abs_diff_eq!(years, 19.85, epsilon = 0.01);

        // balance of a level withdrawal recurrence, evaluated at fractional t
        let g = 0.08;
        let growth = (1.0_f64 + g).powf(years);
        let balance = plan.required_corpus * growth - plan.annual_expense * (growth - 1.0) / g;
        assert_abs_diff_eq!(balance, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_level_drawdown_exhausts_at_longevity() {
        let plan = retirement_plan(&RetirementInput {
            current_age: 40,
            retirement_age: 70,
            monthly_expense: 10_000.0,
            inflation_pct: 2.0,
            post_retirement_return_pct: 8.0,
        })
        .unwrap();
        let from_plan = CorpusDrawdown {
            inflation: 0.0,
            years_in_retirement: 40,
            ..plan.drawdown.clone()
        };
        let textbook = CorpusDrawdown {
            retirement_age: 60,
            corpus: 1_000_000.0,
            annual_expense: 100_000.0,
            inflation: 0.0,
            nominal_return: 0.05,
            years_in_retirement: 30,
        };

        for drawdown in [from_plan, textbook] {
            let lasts = corpus_longevity(
                drawdown.corpus,
                drawdown.annual_expense,
                drawdown.nominal_return,
            )
            .years()
            .expect("level withdrawals should exhaust the corpus");
            let points: Vec<_> = drawdown.years().collect();

            assert_eq!(points.len(), lasts.ceil() as usize);
            let (last, funded) = points.split_last().unwrap();
            assert_eq!(last.balance, 0.0);
            assert!(funded.iter().all(|p| p.balance > 0.0));
            assert!(points.iter().all(|p| p.annual_expense == round2(drawdown.annual_expense)));
        }
    }

    #[test]
    fn test_non_finite_inputs_rejected() {
        for rate in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -100.0] {
            let input = RetirementInput { inflation_pct: rate, ..RetirementInput::default() };
            assert_eq!(retirement_plan(&input).unwrap_err().field(), "inflation_pct");

            let input = RetirementInput {
                post_retirement_return_pct: rate,
                ..RetirementInput::default()
            };
            assert_eq!(retirement_plan(&input).unwrap_err().field(), "post_retirement_return_pct");
        }
        let input = RetirementInput { monthly_expense: f64::NAN, ..RetirementInput::default() };
        assert_eq!(retirement_plan(&input).unwrap_err().field(), "monthly_expense");
    }

    #[test]
    fn test_long_horizon_approaches_perpetuity() {
        let input = RetirementInput {
            current_age: 0,
            retirement_age: 1,
            inflation_pct: 5.0,
            post_retirement_return_pct: 8.0,
            ..RetirementInput::default()
        };
        let plan = retirement_plan_with_horizon(&input, 3_000_000_000).unwrap();
        assert_relative_eq!(
            plan.required_corpus,
            plan.annual_expense / plan.real_return,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_longevity_boundary() {
        // interest exactly covers the expense
        assert!(corpus_longevity(1_000_000.0, 50_000.0, 0.05).is_forever());
        assert!(corpus_longevity(1_000_000.0, 40_000.0, 0.05).is_forever());

        let years = corpus_longevity(1_000_000.0, 100_000.0, 0.05).years().unwrap();
        assert_abs_diff_eq!(years, 2f64.ln() / 1.05f64.ln(), epsilon = 1e-12);

        let mut balance = 1_000_000.0;
        for _ in 0..14 {
            balance = balance * 1.05 - 100_000.0;
        }
        assert!(balance > 0.0);
        assert!(balance * 1.05 - 100_000.0 < 0.0);
    }

    #[test]
    fn test_longevity_zero_return() {
        let years = corpus_longevity(1_000_000.0, 100_000.0, 0.0).years().unwrap();
        assert_eq!(years, 10.0);
    }

    #[test]
    fn test_expense_series() {
        let plan = retirement_plan(&RetirementInput::default()).unwrap();
        let points: Vec<_> = plan.expenses.points().collect();
        assert_eq!(points.len(), 31);
        assert_eq!(points[0], ExpensePoint { age: 30, monthly_expense: 30_000.0 });
        assert_eq!(points[1].monthly_expense, 31_800.0);
        assert_eq!(points[30].age, 60);
        assert_eq!(points[30].monthly_expense, round2(plan.future_monthly_expense));
    }

    #[test]
    fn test_drawdown_runs_to_horizon() {
        let plan = retirement_plan(&RetirementInput::default()).unwrap();
        let years: Vec<_> = plan.drawdown.years().collect();
        assert_eq!(years.len(), 26);
        assert_eq!(years[0].age, 60);
        assert_abs_diff_eq!(years[0].balance, 59_469_463.42, epsilon = 0.01);
        assert_eq!(years[25].age, 85);
        assert!(years.iter().all(|p| p.balance >= 0.0));
    }

    #[test]
    fn test_drawdown_stops_when_exhausted() {
        let drawdown = CorpusDrawdown {
            retirement_age: 60,
            corpus: 100_000.0,
            annual_expense: 30_000.0,
            inflation: 0.0,
            nominal_return: 0.0,
            years_in_retirement: 25,
        };
        let years: Vec<_> = drawdown.years().collect();
        assert_eq!(years.len(), 4);
        assert_eq!(years[2].balance, 10_000.0);
        assert_eq!(years[3].balance, 0.0);
        assert_eq!(years[3].age, 63);
    }
}
