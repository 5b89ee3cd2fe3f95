//! fincalc CLI
//!
//! Command-line interface for running the finance calculators

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{info, warn};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use fincalc::engines::{
    CagrInput, EmiInput, GoalInput, GoalMode, InflationInput, RetirementInput, SipInput,
};
use fincalc::loader::{load_requests, load_requests_csv};
use fincalc::scenario::{BatchEntry, SweepEntry};
use fincalc::{CalculationReport, CalculationRequest, CalculatorKind, EngineConfig, ScenarioRunner};

#[derive(Parser, Debug)]
#[command(name = "fincalc", version, about = "Personal-finance calculators")]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// JSON engine configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Age retirement savings must last until
    #[arg(long, global = true)]
    life_expectancy: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available calculators
    List,
    /// Compound annual growth rate between two values
    Cagr(CagrArgs),
    /// Monthly loan installment and amortization schedule
    Emi(EmiArgs),
    /// Future value of a lump sum plus monthly contributions
    Sip(SipArgs),
    /// Future cost of an amount under inflation
    Inflation(InflationArgs),
    /// Today's value of an amount after inflation erodes it
    Depreciation(InflationArgs),
    /// Retirement corpus and drawdown
    Retirement(RetirementArgs),
    /// SIP or lump sum needed for a goal
    Goal(GoalArgs),
    /// Run every request in a JSON (or CSV) file
    Batch {
        file: PathBuf,
        /// Calculator of every row when FILE is a CSV
        #[arg(long)]
        calculator: Option<CalculatorKind>,
    },
    /// Re-run one calculator over several rates
    Sweep {
        calculator: CalculatorKind,
        /// Comma-separated annual rates in percent
        #[arg(long, value_delimiter = ',', required = true)]
        rates: Vec<f64>,
        /// JSON request to sweep instead of the calculator's defaults
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct CagrArgs {
    #[arg(long, default_value_t = 10_000.0)]
    initial: f64,
    #[arg(long = "final", default_value_t = 20_000.0)]
    final_value: f64,
    #[arg(long, default_value_t = 5)]
    years: u32,
}

#[derive(Args, Debug)]
struct EmiArgs {
    #[arg(long, default_value_t = 500_000.0)]
    principal: f64,
    /// Annual interest rate in percent
    #[arg(long, default_value_t = 8.0)]
    rate: f64,
    #[arg(long, default_value_t = 5)]
    years: u32,
}

#[derive(Args, Debug)]
struct SipArgs {
    #[arg(long, default_value_t = 0.0)]
    initial: f64,
    #[arg(long, default_value_t = 0.0)]
    monthly: f64,
    /// Expected annual return in percent
    #[arg(long, default_value_t = 12.0)]
    rate: f64,
    #[arg(long, default_value_t = 20)]
    years: u32,
}

#[derive(Args, Debug)]
struct InflationArgs {
    #[arg(long, default_value_t = 1_000.0)]
    amount: f64,
    /// Annual inflation in percent
    #[arg(long, default_value_t = 6.0)]
    rate: f64,
    #[arg(long, default_value_t = 10)]
    years: u32,
}

#[derive(Args, Debug)]
struct RetirementArgs {
    #[arg(long, default_value_t = 30)]
    age: u32,
    #[arg(long, default_value_t = 60)]
    retire_at: u32,
    /// Current monthly expense
    #[arg(long, default_value_t = 30_000.0)]
    expense: f64,
    /// Annual inflation in percent
    #[arg(long, default_value_t = 6.0)]
    inflation: f64,
    /// Nominal annual return after retirement in percent
    #[arg(long = "return", default_value_t = 5.0)]
    return_pct: f64,
}

#[derive(Args, Debug)]
struct GoalArgs {
    #[arg(long, default_value_t = 1_000_000.0)]
    goal: f64,
    #[arg(long, default_value_t = 10)]
    years: u32,
    /// Expected annual return in percent
    #[arg(long, default_value_t = 12.0)]
    rate: f64,
    #[arg(long, value_enum, default_value_t = ModeArg::Sip)]
    mode: ModeArg,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ModeArg {
    Sip,
    Lumpsum,
}

impl From<ModeArg> for GoalMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Sip => GoalMode::Sip,
            ModeArg::Lumpsum => GoalMode::Lumpsum,
        }
    }
}

#[derive(Serialize)]
struct CatalogEntry {
    slug: &'static str,
    title: &'static str,
    description: &'static str,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_json_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(age) = cli.life_expectancy {
        config = config.with_life_expectancy(age);
    }
    let runner = ScenarioRunner::with_config(config);

    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    let request = match cli.command {
        Command::List => return write_catalog(&mut out, cli.format),
        Command::Batch { file, calculator } => {
            let requests = match calculator {
                Some(kind) => load_requests_csv(kind, &file),
                None => load_requests(&file),
            }
            .with_context(|| format!("loading requests from {}", file.display()))?;
            info!("loaded {} requests from {}", requests.len(), file.display());
            let entries = runner.run_batch(&requests);
            return write_batch(&mut out, cli.format, &entries);
        }
        Command::Sweep { calculator, rates, input } => {
            let request = match input {
                Some(path) => read_request(&path)?,
                None => CalculationRequest::default_for(calculator),
            };
            if request.kind() != calculator {
                bail!("--input holds a {} request, not {}", request.kind(), calculator);
            }
            let entries = runner.run_rate_sweep(&request, &rates)?;
            return write_sweep(&mut out, cli.format, &entries);
        }
        Command::Cagr(args) => CalculationRequest::Cagr(CagrInput {
            initial_value: args.initial,
            final_value: args.final_value,
            years: args.years,
        }),
        Command::Emi(args) => CalculationRequest::Emi(EmiInput {
            principal: args.principal,
            annual_rate_pct: args.rate,
            years: args.years,
        }),
        Command::Sip(args) => CalculationRequest::Sip(SipInput {
            initial_investment: args.initial,
            monthly_contribution: args.monthly,
            annual_rate_pct: args.rate,
            years: args.years,
        }),
        Command::Inflation(args) => CalculationRequest::Inflation(inflation_input(args)),
        Command::Depreciation(args) => CalculationRequest::ValueDepreciation(inflation_input(args)),
        Command::Retirement(args) => CalculationRequest::Retirement(RetirementInput {
            current_age: args.age,
            retirement_age: args.retire_at,
            monthly_expense: args.expense,
            inflation_pct: args.inflation,
            post_retirement_return_pct: args.return_pct,
        }),
        Command::Goal(args) => CalculationRequest::GoalBased(GoalInput {
            goal_amount: args.goal,
            years: args.years,
            expected_return_pct: args.rate,
            mode: args.mode.into(),
        }),
    };

    let report = runner.run(&request)?;
    write_report(&mut out, cli.format, &report)?;
    out.flush()?;
    Ok(())
}

fn inflation_input(args: InflationArgs) -> InflationInput {
    InflationInput {
        amount: args.amount,
        rate_pct: args.rate,
        years: args.years,
    }
}

fn read_request(path: &Path) -> Result<CalculationRequest> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("decoding request in {}", path.display()))
}

fn write_report(
    out: &mut dyn Write,
    format: OutputFormat,
    report: &CalculationReport,
) -> Result<()> {
    match format {
        OutputFormat::Table => write!(out, "{}", report)?,
        OutputFormat::Json => {
            report.write_json(&mut *out)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => report.write_csv(&mut *out)?,
    }
    Ok(())
}

fn write_catalog(out: &mut dyn Write, format: OutputFormat) -> Result<()> {
    let entries: Vec<CatalogEntry> = CalculatorKind::ALL
        .iter()
        .map(|kind| CatalogEntry {
            slug: kind.slug(),
            title: kind.title(),
            description: kind.description(),
        })
        .collect();

    match format {
        OutputFormat::Table => {
            for entry in &entries {
                writeln!(out, "{:<20} {:<34} {}", entry.slug, entry.title, entry.description)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &entries)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut csv = csv::Writer::from_writer(&mut *out);
            for entry in &entries {
                csv.serialize(entry)?;
            }
            csv.flush()?;
        }
    }
    out.flush()?;
    Ok(())
}

fn write_batch(out: &mut dyn Write, format: OutputFormat, entries: &[BatchEntry]) -> Result<()> {
    let failed = entries.iter().filter(|e| e.error.is_some()).count();
    if failed > 0 {
        warn!("{} of {} requests failed", failed, entries.len());
    }

    if format == OutputFormat::Json {
        serde_json::to_writer_pretty(&mut *out, entries)?;
        writeln!(out)?;
    } else {
        for entry in entries {
            match (&entry.report, &entry.error) {
                (Some(report), _) => write_report(out, format, report)?,
                (None, Some(error)) if format == OutputFormat::Table => {
                    writeln!(out, "request {} ({}): {}", entry.index, entry.calculator, error)?
                }
                _ => {}
            }
            if format == OutputFormat::Table {
                writeln!(out)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn write_sweep(out: &mut dyn Write, format: OutputFormat, entries: &[SweepEntry]) -> Result<()> {
    if format == OutputFormat::Json {
        serde_json::to_writer_pretty(&mut *out, entries)?;
        writeln!(out)?;
    } else {
        for entry in entries {
            if format == OutputFormat::Table {
                writeln!(out, "--- rate {}% ---", entry.rate_pct)?;
            }
            match (&entry.report, &entry.error) {
                (Some(report), _) => write_report(out, format, report)?,
                (None, Some(error)) => warn!("rate {}%: {}", entry.rate_pct, error),
                _ => {}
            }
        }
    }
    out.flush()?;
    Ok(())
}
