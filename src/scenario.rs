//! Scenario runner for single and batch calculations
//!
//! Holds the engine configuration once, validates each request against its
//! limits, and dispatches to the matching engine. Batches and rate sweeps are
//! evaluated in parallel; results come back in input order.

use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::CalculatorKind;
use crate::config::EngineConfig;
use crate::engines::{
    cagr, emi, goal, inflation, retirement, sip, Adjustment, CagrInput, EmiInput, GoalInput,
    InflationInput, RetirementInput, SipInput,
};
use crate::error::{CalcError, CalcResult};
use crate::report::{CalculationReport, Reportable};

/// Inputs for any calculator, tagged by calculator slug
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "calculator", rename_all = "kebab-case")]
pub enum CalculationRequest {
    Cagr(CagrInput),
    Emi(EmiInput),
    Sip(SipInput),
    Inflation(InflationInput),
    ValueDepreciation(InflationInput),
    Retirement(RetirementInput),
    GoalBased(GoalInput),
}

impl CalculationRequest {
    /// Request carrying the default inputs of `kind`
    pub fn default_for(kind: CalculatorKind) -> Self {
        match kind {
            CalculatorKind::Cagr => CalculationRequest::Cagr(CagrInput::default()),
            CalculatorKind::Emi => CalculationRequest::Emi(EmiInput::default()),
            CalculatorKind::Sip => CalculationRequest::Sip(SipInput::default()),
            CalculatorKind::Inflation => CalculationRequest::Inflation(InflationInput::default()),
            CalculatorKind::ValueDepreciation => {
                CalculationRequest::ValueDepreciation(InflationInput::default())
            }
            CalculatorKind::Retirement => {
                CalculationRequest::Retirement(RetirementInput::default())
            }
            CalculatorKind::GoalBased => CalculationRequest::GoalBased(GoalInput::default()),
        }
    }

    pub fn kind(&self) -> CalculatorKind {
        match self {
            CalculationRequest::Cagr(_) => CalculatorKind::Cagr,
            CalculationRequest::Emi(_) => CalculatorKind::Emi,
            CalculationRequest::Sip(_) => CalculatorKind::Sip,
            CalculationRequest::Inflation(_) => CalculatorKind::Inflation,
            CalculationRequest::ValueDepreciation(_) => CalculatorKind::ValueDepreciation,
            CalculationRequest::Retirement(_) => CalculatorKind::Retirement,
            CalculationRequest::GoalBased(_) => CalculatorKind::GoalBased,
        }
    }

    /// Check the request against the configured input bounds
    pub fn validate(&self, config: &EngineConfig) -> CalcResult<()> {
        let limits = &config.limits;
        match self {
            CalculationRequest::Cagr(input) => {
                limits.check_amount("initial_value", input.initial_value)?;
                limits.check_amount("final_value", input.final_value)?;
                limits.check_years("years", input.years)
            }
            CalculationRequest::Emi(input) => {
                limits.check_amount("principal", input.principal)?;
                limits.check_rate("annual_rate_pct", input.annual_rate_pct)?;
                limits.check_years("years", input.years)
            }
            CalculationRequest::Sip(input) => {
                limits.check_amount("initial_investment", input.initial_investment)?;
                limits.check_amount("monthly_contribution", input.monthly_contribution)?;
                limits.check_rate("annual_rate_pct", input.annual_rate_pct)?;
                limits.check_years("years", input.years)
            }
            CalculationRequest::Inflation(input) | CalculationRequest::ValueDepreciation(input) => {
                limits.check_amount("amount", input.amount)?;
                limits.check_rate("rate_pct", input.rate_pct)?;
                limits.check_years("years", input.years)
            }
            CalculationRequest::Retirement(input) => {
                limits.check_age("current_age", input.current_age)?;
                limits.check_age("retirement_age", input.retirement_age)?;
                limits.check_amount("monthly_expense", input.monthly_expense)?;
                limits.check_rate("inflation_pct", input.inflation_pct)?;
                limits.check_rate("post_retirement_return_pct", input.post_retirement_return_pct)
            }
            CalculationRequest::GoalBased(input) => {
                limits.check_amount("goal_amount", input.goal_amount)?;
                limits.check_rate("expected_return_pct", input.expected_return_pct)?;
                limits.check_years("years", input.years)
            }
        }
    }

    /// Copy of this request with its headline rate replaced
    pub fn with_rate(&self, rate_pct: f64) -> Self {
        let mut request = self.clone();
        match &mut request {
            // CAGR solves for the rate; there is nothing to replace
            CalculationRequest::Cagr(_) => {}
            CalculationRequest::Emi(input) => input.annual_rate_pct = rate_pct,
            CalculationRequest::Sip(input) => input.annual_rate_pct = rate_pct,
            CalculationRequest::Inflation(input) | CalculationRequest::ValueDepreciation(input) => {
                input.rate_pct = rate_pct
            }
            CalculationRequest::Retirement(input) => input.post_retirement_return_pct = rate_pct,
            CalculationRequest::GoalBased(input) => input.expected_return_pct = rate_pct,
        }
        request
    }
}

/// Outcome of one request in a batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub index: usize,
    pub calculator: CalculatorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<CalculationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of one rate in a sweep
#[derive(Debug, Clone, Serialize)]
pub struct SweepEntry {
    pub rate_pct: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<CalculationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Runs calculation requests against a shared configuration
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let report = runner.run(&CalculationRequest::default_for(CalculatorKind::Emi))?;
///
/// // Same loan at several rates
/// let sweep = runner.run_rate_sweep(&request, &[7.0, 8.0, 9.0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    config: EngineConfig,
}

impl ScenarioRunner {
    /// Create runner with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Validate and evaluate a single request
    pub fn run(&self, request: &CalculationRequest) -> CalcResult<CalculationReport> {
        if let Err(err) = request.validate(&self.config) {
            warn!("{} request rejected: {}", request.kind(), err);
            return Err(err);
        }
        debug!("running {} request", request.kind());

        let report = match request {
            CalculationRequest::Cagr(input) => cagr::calculate(input)?.report(),
            CalculationRequest::Emi(input) => emi::calculate(input)?.report(),
            CalculationRequest::Sip(input) => sip::calculate(input)?.report(),
            CalculationRequest::Inflation(input) => {
                inflation::calculate(input, Adjustment::Inflate)?.report()
            }
            CalculationRequest::ValueDepreciation(input) => {
                inflation::calculate(input, Adjustment::Deflate)?.report()
            }
            CalculationRequest::Retirement(input) => {
                retirement::retirement_plan_with_horizon(input, self.config.life_expectancy_age)?
                    .report()
            }
            CalculationRequest::GoalBased(input) => goal::goal_plan(input)?.report(),
        };
        Ok(report)
    }

    /// Evaluate many requests in parallel; a failing request does not stop the batch
    pub fn run_batch(&self, requests: &[CalculationRequest]) -> Vec<BatchEntry> {
        requests
            .par_iter()
            .enumerate()
            .map(|(index, request)| {
                let (report, error) = split(self.run(request));
                BatchEntry {
                    index,
                    calculator: request.kind(),
                    report,
                    error,
                }
            })
            .collect()
    }

    /// Evaluate one request at each of `rates_pct`
    pub fn run_rate_sweep(
        &self,
        request: &CalculationRequest,
        rates_pct: &[f64],
    ) -> CalcResult<Vec<SweepEntry>> {
        if matches!(request, CalculationRequest::Cagr(_)) {
            return Err(CalcError::invalid(
                "calculator",
                "CAGR derives its rate from the inputs and cannot be swept",
            ));
        }

        Ok(rates_pct
            .par_iter()
            .map(|&rate_pct| {
                let (report, error) = split(self.run(&request.with_rate(rate_pct)));
                SweepEntry {
                    rate_pct,
                    report,
                    error,
                }
            })
            .collect())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

fn split(result: CalcResult<CalculationReport>) -> (Option<CalculationReport>, Option<String>) {
    match result {
        Ok(report) => (Some(report), None),
        Err(err) => (None, Some(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::MetricValue;

    fn number(report: &CalculationReport, name: &str) -> f64 {
        match report.metric(name) {
            Some(MetricValue::Number(value)) => value,
            other => panic!("metric {} missing or not numeric: {:?}", name, other),
        }
    }

    #[test]
    fn test_every_default_request_runs() {
        let runner = ScenarioRunner::new();
        for kind in CalculatorKind::ALL {
            let report = runner.run(&CalculationRequest::default_for(kind)).unwrap();
            assert_eq!(report.calculator, kind);
        }
    }

    #[test]
    fn test_limits_rejected_before_engine() {
        let runner = ScenarioRunner::new();
        let request = CalculationRequest::Emi(EmiInput {
            years: 101,
            ..EmiInput::default()
        });
        assert_eq!(runner.run(&request).unwrap_err().field(), "years");

        let request = CalculationRequest::Sip(SipInput {
            annual_rate_pct: 75.0,
            ..SipInput::default()
        });
        assert_eq!(runner.run(&request).unwrap_err().field(), "annual_rate_pct");
    }

    #[test]
    fn test_engine_errors_surface() {
        let runner = ScenarioRunner::new();
        let request = CalculationRequest::Cagr(CagrInput {
            initial_value: 0.0,
            ..CagrInput::default()
        });
        assert_eq!(runner.run(&request).unwrap_err().field(), "initial_value");
    }

    #[test]
    fn test_horizon_from_config() {
        let runner = ScenarioRunner::with_config(EngineConfig::default().with_life_expectancy(90));
        let report = runner
            .run(&CalculationRequest::default_for(CalculatorKind::Retirement))
            .unwrap();
        assert_eq!(number(&report, "years_in_retirement"), 30.0);
    }

    #[test]
    fn test_batch_keeps_order_and_failures() {
        let runner = ScenarioRunner::new();
        let requests = vec![
            CalculationRequest::default_for(CalculatorKind::Emi),
            CalculationRequest::Retirement(RetirementInput {
                retirement_age: 20,
                ..RetirementInput::default()
            }),
            CalculationRequest::default_for(CalculatorKind::GoalBased),
        ];

        let results = runner.run_batch(&requests);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].index, 0);
        assert_eq!(results[0].calculator, CalculatorKind::Emi);
        assert!(results[0].report.is_some());
        assert!(results[1].report.is_none());
        assert!(results[1].error.as_deref().unwrap().contains("retirement_age"));
        assert_eq!(results[2].calculator, CalculatorKind::GoalBased);
    }

    #[test]
    fn test_rate_sweep() {
        let runner = ScenarioRunner::new();
        let request = CalculationRequest::default_for(CalculatorKind::Emi);
        let sweep = runner.run_rate_sweep(&request, &[6.0, 8.0, 10.0, 80.0]).unwrap();

        assert_eq!(sweep.len(), 4);
        let emis: Vec<f64> = sweep[..3]
            .iter()
            .map(|entry| number(entry.report.as_ref().unwrap(), "monthly_emi"))
            .collect();
        // higher rate means a higher installment
        assert!(emis[0] < emis[1] && emis[1] < emis[2]);
        assert!(sweep[3].error.is_some());
    }

    #[test]
    fn test_cagr_cannot_be_swept() {
        let runner = ScenarioRunner::new();
        let request = CalculationRequest::default_for(CalculatorKind::Cagr);
        assert!(runner.run_rate_sweep(&request, &[5.0]).is_err());
    }

    #[test]
    fn test_request_json_shape() {
        let json = r#"{ "calculator": "goal-based", "goal_amount": 500000, "mode": "lumpsum" }"#;
        let request: CalculationRequest = serde_json::from_str(json).unwrap();
        let CalculationRequest::GoalBased(input) = &request else {
            panic!("expected a goal request");
        };
        assert_eq!(input.goal_amount, 500_000.0);
        assert_eq!(input.years, 10);
        assert_eq!(input.mode, goal::GoalMode::Lumpsum);
    }
}
