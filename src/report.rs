//! Calculation reports: headline metrics plus materialized series tables
//!
//! Engines hand back lazy series; a report samples them once so the result
//! can be printed, serialized to JSON or written as CSV.

use serde::Serialize;
use std::fmt;
use std::io::Write;

use crate::catalog::CalculatorKind;
use crate::engines::{
    Adjustment, AmortizationRow, CagrResult, CorpusLongevity, DrawdownPoint, EmiResult,
    ExpensePoint, GoalPlan, GoalPoint, GrowthPoint, InflationResult, RequiredInvestment,
    RetirementPlan, SipPoint, SipResult, ValuePoint,
};
use crate::error::DataError;
use crate::rates::round_to;
use crate::series::Sampled;

/// How a metric should be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Currency,
    Percent,
    Years,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(&'static str),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(value) => write!(f, "{:.2}", value),
            MetricValue::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub name: &'static str,
    pub value: MetricValue,
    pub unit: Unit,
}

impl Metric {
    fn number(name: &'static str, value: f64, unit: Unit) -> Self {
        Self {
            name,
            value: MetricValue::Number(value),
            unit,
        }
    }
}

/// A chart series sampled into rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesTable {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    pub rows: Vec<Vec<f64>>,
}

impl SeriesTable {
    pub fn from_rows<R: SeriesRow>(name: &'static str, rows: impl IntoIterator<Item = R>) -> Self {
        Self {
            name,
            columns: R::COLUMNS,
            rows: rows.into_iter().map(|row| row.values()).collect(),
        }
    }
}

/// A series point that can be laid out as a table row
pub trait SeriesRow {
    const COLUMNS: &'static [&'static str];

    fn values(&self) -> Vec<f64>;
}

impl SeriesRow for GrowthPoint {
    const COLUMNS: &'static [&'static str] = &["year", "value"];

    fn values(&self) -> Vec<f64> {
        vec![self.year as f64, self.value]
    }
}

impl SeriesRow for AmortizationRow {
    const COLUMNS: &'static [&'static str] = &["month", "principal", "interest", "balance"];

    fn values(&self) -> Vec<f64> {
        vec![self.month as f64, self.principal, self.interest, self.balance]
    }
}

impl SeriesRow for SipPoint {
    const COLUMNS: &'static [&'static str] = &["year", "value", "invested"];

    fn values(&self) -> Vec<f64> {
        vec![self.year as f64, self.value, self.invested]
    }
}

impl SeriesRow for ValuePoint {
    const COLUMNS: &'static [&'static str] = &["year", "value"];

    fn values(&self) -> Vec<f64> {
        vec![self.year as f64, self.value]
    }
}

impl SeriesRow for ExpensePoint {
    const COLUMNS: &'static [&'static str] = &["age", "monthly_expense"];

    fn values(&self) -> Vec<f64> {
        vec![self.age as f64, self.monthly_expense]
    }
}

impl SeriesRow for DrawdownPoint {
    const COLUMNS: &'static [&'static str] = &["age", "balance", "annual_expense"];

    fn values(&self) -> Vec<f64> {
        vec![self.age as f64, self.balance, self.annual_expense]
    }
}

impl SeriesRow for GoalPoint {
    const COLUMNS: &'static [&'static str] = &["year", "value"];

    fn values(&self) -> Vec<f64> {
        vec![self.year as f64, self.value]
    }
}

/// Complete output of one calculation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationReport {
    pub calculator: CalculatorKind,
    pub metrics: Vec<Metric>,
    pub series: Vec<SeriesTable>,
}

impl CalculationReport {
    pub fn metric(&self, name: &str) -> Option<MetricValue> {
        self.metrics.iter().find(|m| m.name == name).map(|m| m.value)
    }

    pub fn series(&self, name: &str) -> Option<&SeriesTable> {
        self.series.iter().find(|s| s.name == name)
    }

    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), DataError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Metrics and every series in one CSV; the first column names the section
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), DataError> {
        let mut csv = csv::WriterBuilder::new().flexible(true).from_writer(writer);

        csv.write_record(["metrics", "name", "value", "unit"])?;
        for metric in &self.metrics {
            let unit = match metric.unit {
                Unit::Currency => "currency",
                Unit::Percent => "percent",
                Unit::Years => "years",
            };
            let value = match metric.value {
                MetricValue::Number(value) => format!("{:.8}", value),
                MetricValue::Text(text) => text.to_string(),
            };
            csv.write_record(["metrics", metric.name, value.as_str(), unit])?;
        }

        for table in &self.series {
            let mut header = vec![table.name];
            header.extend_from_slice(table.columns);
            csv.write_record(&header)?;
            for row in &table.rows {
                let mut record = vec![table.name.to_string()];
                record.extend(row.iter().map(|v| v.to_string()));
                csv.write_record(&record)?;
            }
        }

        csv.flush()?;
        Ok(())
    }
}

impl fmt::Display for CalculationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.calculator.title())?;
        writeln!(f, "{}", "=".repeat(self.calculator.title().len()))?;
        for metric in &self.metrics {
            let suffix = match (metric.unit, metric.value) {
                (Unit::Percent, MetricValue::Number(_)) => "%",
                (Unit::Years, MetricValue::Number(_)) => " years",
                _ => "",
            };
            writeln!(f, "  {:<28} {:>18}{}", metric.name, metric.value.to_string(), suffix)?;
        }

        for table in &self.series {
            writeln!(f)?;
            writeln!(f, "{} ({} rows)", table.name, table.rows.len())?;
            for column in table.columns {
                write!(f, "{:>16}", column)?;
            }
            writeln!(f)?;
            writeln!(f, "{}", "-".repeat(16 * table.columns.len()))?;
            for row in &table.rows {
                for (i, value) in row.iter().enumerate() {
                    if i == 0 {
                        write!(f, "{:>16}", value)?;
                    } else {
                        write!(f, "{:>16.2}", value)?;
                    }
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Engine results that can be turned into a [`CalculationReport`]
pub trait Reportable {
    fn report(&self) -> CalculationReport;
}

impl Reportable for CagrResult {
    fn report(&self) -> CalculationReport {
        CalculationReport {
            calculator: CalculatorKind::Cagr,
            metrics: vec![Metric::number("cagr", self.rate_pct, Unit::Percent)],
            series: vec![SeriesTable::from_rows("growth", self.growth.points())],
        }
    }
}

impl Reportable for EmiResult {
    fn report(&self) -> CalculationReport {
        CalculationReport {
            calculator: CalculatorKind::Emi,
            metrics: vec![
                Metric::number("monthly_emi", self.summary.monthly, Unit::Currency),
                Metric::number("total_interest", self.summary.total_interest, Unit::Currency),
                Metric::number("total_payment", self.summary.total_payment, Unit::Currency),
            ],
            series: vec![SeriesTable::from_rows("amortization", self.schedule.rows())],
        }
    }
}

impl Reportable for SipResult {
    fn report(&self) -> CalculationReport {
        CalculationReport {
            calculator: CalculatorKind::Sip,
            metrics: vec![
                Metric::number("total_value", self.total_value, Unit::Currency),
                Metric::number("total_investment", self.total_investment, Unit::Currency),
                Metric::number("actual_returns", self.actual_returns, Unit::Currency),
            ],
            series: vec![SeriesTable::from_rows("growth", self.growth.points())],
        }
    }
}

impl Reportable for InflationResult {
    fn report(&self) -> CalculationReport {
        let (calculator, name) = match self.adjustment {
            Adjustment::Inflate => (CalculatorKind::Inflation, "future_value"),
            Adjustment::Deflate => (CalculatorKind::ValueDepreciation, "present_value"),
        };
        CalculationReport {
            calculator,
            metrics: vec![
                Metric::number(name, self.result, Unit::Currency),
                Metric::number("difference", self.difference, Unit::Currency),
            ],
            series: vec![SeriesTable::from_rows("value", self.path.points())],
        }
    }
}

impl Reportable for RetirementPlan {
    fn report(&self) -> CalculationReport {
        let lasts = match self.years_corpus_lasts {
            CorpusLongevity::Years(years) => {
                Metric::number("years_corpus_lasts", round_to(years, 1), Unit::Years)
            }
            CorpusLongevity::Forever => Metric {
                name: "years_corpus_lasts",
                value: MetricValue::Text("forever"),
                unit: Unit::Years,
            },
        };
        CalculationReport {
            calculator: CalculatorKind::Retirement,
            metrics: vec![
                Metric::number("years_to_retire", self.years_to_retire as f64, Unit::Years),
                Metric::number("years_in_retirement", self.years_in_retirement as f64, Unit::Years),
                Metric::number(
                    "future_monthly_expense",
                    self.future_monthly_expense,
                    Unit::Currency,
                ),
                Metric::number("annual_expense", self.annual_expense, Unit::Currency),
                Metric::number("real_return", self.real_return * 100.0, Unit::Percent),
                Metric::number("required_corpus", self.required_corpus, Unit::Currency),
                lasts,
            ],
            series: vec![
                SeriesTable::from_rows("expense_growth", self.expenses.points()),
                SeriesTable::from_rows("corpus_drawdown", self.drawdown.years()),
            ],
        }
    }
}

impl Reportable for GoalPlan {
    fn report(&self) -> CalculationReport {
        let mut metrics = match self.required {
            RequiredInvestment::MonthlySip { amount, total_invested } => vec![
                Metric::number("monthly_sip", amount, Unit::Currency),
                Metric::number("total_sip_investment", total_invested, Unit::Currency),
            ],
            RequiredInvestment::Lumpsum { amount } => {
                vec![Metric::number("lumpsum", amount, Unit::Currency)]
            }
        };
        metrics.push(Metric::number(
            "inflation_adjusted_goal",
            self.inflation_adjusted_goal,
            Unit::Currency,
        ));
        CalculationReport {
            calculator: CalculatorKind::GoalBased,
            metrics,
            series: vec![SeriesTable::from_rows("progress", self.progress.points())],
        }
    }
}
