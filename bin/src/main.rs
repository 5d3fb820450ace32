//! backstrat CLI binary.
//!
//! Loads the return panel, size-factor panel, and benchmark series from
//! wide CSV files and runs the selected long/short strategy against them.

mod data;

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};

use backstrat_eval::{run_backtest, BacktestParams, BacktestRun};
use backstrat_signals::registry::{available_strategies, StrategyKind};
use backstrat_traits::BacktestData;

#[derive(Parser)]
#[command(name = "backstrat")]
#[command(about = "Long/short factor strategy backtesting", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a strategy backtest over CSV panels
    Backtest {
        /// Strategy selector (momentum, smb, hml)
        strategy: String,

        /// Return panel CSV (one column per asset)
        #[arg(long)]
        returns: PathBuf,

        /// Size-factor panel CSV (one column per entity)
        #[arg(long)]
        factor: PathBuf,

        /// Benchmark CSV (date plus periodic-return column)
        #[arg(long)]
        benchmark: PathBuf,

        /// Estimation window in periods (momentum only)
        #[arg(short, long, default_value = "1")]
        window: usize,

        /// Selection quantile in (0, 1)
        #[arg(short, long, default_value = "0.1")]
        quantile: f64,

        /// Annualized risk-free rate
        #[arg(long, default_value = "0.03")]
        risk_free_rate: f64,

        /// Non-investable return column excluded from SMB aggregation
        #[arg(long)]
        exclude: Option<String>,

        /// Name of the date column in all three CSVs
        #[arg(long, default_value = "Date")]
        date_column: String,

        /// Name of the benchmark's periodic-return column
        #[arg(long, default_value = "Close")]
        benchmark_column: String,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List recognized strategy selectors
    Strategies {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Backtest {
            strategy,
            returns,
            factor,
            benchmark,
            window,
            quantile,
            risk_free_rate,
            exclude,
            date_column,
            benchmark_column,
            format,
        } => cmd_backtest(&BacktestArgs {
            strategy,
            returns,
            factor,
            benchmark,
            window,
            quantile,
            risk_free_rate,
            exclude,
            date_column,
            benchmark_column,
            format,
        }),
        Commands::Strategies { verbose } => {
            cmd_strategies(verbose);
            Ok(())
        }
    }
}

struct BacktestArgs {
    strategy: String,
    returns: PathBuf,
    factor: PathBuf,
    benchmark: PathBuf,
    window: usize,
    quantile: f64,
    risk_free_rate: f64,
    exclude: Option<String>,
    date_column: String,
    benchmark_column: String,
    format: String,
}

fn cmd_backtest(args: &BacktestArgs) -> Result<()> {
    let kind: StrategyKind = args
        .strategy
        .parse()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let returns = data::load_panel(&args.returns, &args.date_column)
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    let factor = data::load_panel(&args.factor, &args.date_column)
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    let benchmark =
        data::load_benchmark(&args.benchmark, &args.date_column, &args.benchmark_column)
            .map_err(|e| anyhow::anyhow!("{e}"))?;

    println!(
        "Loaded {} periods x {} assets, factor panel {} entities",
        returns.n_periods(),
        returns.n_entities(),
        factor.n_entities()
    );

    let data = BacktestData::new(returns, factor, benchmark)
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    let params = BacktestParams {
        strategy: kind,
        window: args.window,
        quantile: args.quantile,
        risk_free_rate: args.risk_free_rate,
        excluded: args.exclude.clone(),
    };

    let run = run_backtest(&data, &params).map_err(|e| anyhow::anyhow!("{e}"))?;

    if args.format == "json" {
        let json = serde_json::to_string_pretty(&run)
            .map_err(|e| anyhow::anyhow!("JSON serialization error: {e}"))?;
        println!("{json}");
    } else {
        print_run(&run);
    }

    Ok(())
}

fn print_run(run: &BacktestRun) {
    println!();
    println!("{} backtest", run.strategy_name);
    println!("══════════════════════");
    println!(
        "Window: {} periods, quantile: {}, risk-free rate: {}",
        run.params.window, run.params.quantile, run.params.risk_free_rate
    );
    println!();

    println!("Performance:");
    println!("  {:<12} {:>10} {:>10} {:>10}", "account", "ret_ann", "vol_ann", "sharpe");
    for (label, stats) in run.summary.rows() {
        println!(
            "  {:<12} {:>10.2} {:>10.2} {:>10.2}",
            label, stats.annualized_return, stats.annualized_volatility, stats.sharpe_ratio
        );
    }
    println!();

    if let (Some(last), Some(date)) = (run.output.curve.last(), run.output.dates.last()) {
        println!(
            "Cumulative index at {date}: {last:.4} (spread std {:.4})",
            run.output.volatility
        );
    }
}

fn cmd_strategies(verbose: bool) {
    println!("Recognized strategies:\n");
    for info in available_strategies() {
        let status = if info.implemented {
            ""
        } else {
            "  [not implemented]"
        };
        if verbose {
            println!("  {:<10} {}{status}", info.selector, info.description);
        } else {
            println!("  {}{status}", info.selector);
        }
    }
}
