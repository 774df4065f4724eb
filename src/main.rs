use analyzer::{ComparisonAnalyzer, ComparisonReport};
use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use configuration::Config;
use core_types::{Cadence, NavPoint, SubnetId};
use emissions::SnapshotTable;
use portfolio::{calculate_target_weights, WeightSchedule};
use rust_decimal::Decimal;
use simulator::{CadenceSimulator, SimulationResult};
use std::io::Write;
use std::path::{Path, PathBuf};
use sweep::SweepRunner;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use yield_model::create_model;

/// The main entry point for the alphabasket simulation application.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sweep(args) => handle_sweep(args),
        Commands::Simulate(args) => handle_simulate(args),
        Commands::Inspect(args) => handle_inspect(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Simulates subnet basket rebalancing cadences over emission snapshots.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every configured cadence and rank them against the benchmark.
    Sweep(SweepArgs),
    /// Run a single cadence and print its performance report.
    Simulate(SimulateArgs),
    /// Validate a snapshot directory and summarize what a sweep would see.
    Inspect(InspectArgs),
}

#[derive(Parser)]
struct SweepArgs {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "config.toml")]
    config: String,

    /// Directory holding the emissions_v2_*.json snapshot files.
    #[arg(long, default_value = "data/emissions")]
    data_dir: PathBuf,

    /// Optional JSON weight schedule that replaces top-N emission weighting.
    #[arg(long)]
    schedule: Option<PathBuf>,

    /// Override the configured basket size.
    #[arg(long)]
    top_n: Option<usize>,

    /// Override the configured initial capital.
    #[arg(long)]
    capital: Option<Decimal>,
}

#[derive(Parser)]
struct SimulateArgs {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "config.toml")]
    config: String,

    /// Directory holding the emissions_v2_*.json snapshot files.
    #[arg(long, default_value = "data/emissions")]
    data_dir: PathBuf,

    /// The rebalance cadence to simulate (e.g. "1h", "2d", "1w", "continuous").
    #[arg(long)]
    cadence: Cadence,

    /// Optional JSON weight schedule that replaces top-N emission weighting.
    #[arg(long)]
    schedule: Option<PathBuf>,

    /// Override the configured basket size.
    #[arg(long)]
    top_n: Option<usize>,

    /// Override the configured initial capital.
    #[arg(long)]
    capital: Option<Decimal>,
}

#[derive(Parser)]
struct InspectArgs {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "config.toml")]
    config: String,

    /// Directory holding the emissions_v2_*.json snapshot files.
    #[arg(long, default_value = "data/emissions")]
    data_dir: PathBuf,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_sweep(args: SweepArgs) -> anyhow::Result<()> {
    let (config, _guard) = prepare(&args.config, args.top_n, args.capital)?;
    let table = load_table(&config, &args.data_dir)?;
    let model = create_model(&config.yield_model)?;
    let schedule = load_schedule(args.schedule.as_deref())?;

    let mut runner = SweepRunner::new(&config, model.as_ref());
    if let Some(schedule) = &schedule {
        runner = runner.with_weight_schedule(schedule);
    }
    let results = runner.run(&table)?;

    let comparison = ComparisonAnalyzer::new(config.simulation.risk_free_rate).analyze(&results)?;
    print_comparison(&comparison);
    if let Some(recommended) = comparison.recommended {
        println!("Recommended cadence (best Sharpe): {}", recommended.label());
    }

    std::fs::create_dir_all(&config.output.report_dir).with_context(|| {
        format!(
            "failed to create report directory {}",
            config.output.report_dir.display()
        )
    })?;
    let comparison_path = config.output.report_dir.join("rebalance_comparison.csv");
    write_comparison_csv(&comparison_path, &comparison)?;
    println!("Wrote {}", comparison_path.display());

    for result in &results {
        let nav_path = config
            .output
            .report_dir
            .join(format!("nav_{}.csv", result.cadence.label()));
        write_nav_csv(&nav_path, &result.nav_history)?;
    }
    println!(
        "Wrote {} per-cadence NAV histories to {}",
        results.len(),
        config.output.report_dir.display()
    );

    Ok(())
}

fn handle_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let (config, _guard) = prepare(&args.config, args.top_n, args.capital)?;
    let table = load_table(&config, &args.data_dir)?;
    let model = create_model(&config.yield_model)?;
    let schedule = load_schedule(args.schedule.as_deref())?;

    let mut engine = CadenceSimulator::new(&config, model.as_ref());
    if args.cadence.is_continuous() {
        // Continuous is the costless benchmark; it never pays the bps charges.
        engine = engine.with_costs(config.costs.frictionless());
    }
    if let Some(schedule) = &schedule {
        engine = engine.with_weight_schedule(schedule);
    }
    let result = engine.run(&table, args.cadence)?;
    print_single_result(&result);

    std::fs::create_dir_all(&config.output.report_dir)?;
    let nav_path = config
        .output
        .report_dir
        .join(format!("nav_{}.csv", result.cadence.label()));
    write_nav_csv(&nav_path, &result.nav_history)?;
    println!("Wrote {}", nav_path.display());

    Ok(())
}

fn handle_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let (config, _guard) = prepare(&args.config, None, None)?;
    let table = load_table(&config, &args.data_dir)?;

    println!("Snapshots:        {}", table.len());
    println!(
        "Span:             {} -> {} ({:.1} days)",
        table.first_timestamp(),
        table.last_timestamp(),
        table.span_days()
    );
    println!("Subnets observed: {}", table.subnet_ids().len());

    let last_idx = table.len() - 1;
    let weights = calculate_target_weights(table.emissions_at(last_idx), config.index.top_n);
    let mut entries: Vec<(SubnetId, Decimal)> = weights.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut basket = Table::new();
    basket
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Subnet", "Emission", "Weight %", "Price"]);
    for (subnet, weight) in entries {
        let emission = table
            .emissions_at(last_idx)
            .get(&subnet)
            .copied()
            .unwrap_or(Decimal::ZERO);
        let price = table
            .price_series(subnet)
            .and_then(|series| series.last().copied())
            .unwrap_or(Decimal::ZERO);
        basket.add_row(vec![
            subnet.to_string(),
            format!("{:.6}", emission),
            format!("{:.4}", weight * Decimal::from(100)),
            format!("{:.4}", price),
        ]);
    }
    println!();
    println!("Top {} basket at the last snapshot:", config.index.top_n);
    println!("{basket}");

    Ok(())
}

// ==============================================================================
// Shared Setup
// ==============================================================================

/// Loads the configuration, applies CLI overrides and starts file logging.
/// The returned guard must stay alive for the duration of the command so
/// buffered log lines are flushed on exit.
fn prepare(
    config_path: &str,
    top_n: Option<usize>,
    capital: Option<Decimal>,
) -> anyhow::Result<(Config, WorkerGuard)> {
    let mut config = configuration::load_config(config_path)
        .with_context(|| format!("failed to load configuration from {config_path}"))?;
    if let Some(top_n) = top_n {
        config.index.top_n = top_n;
    }
    if let Some(capital) = capital {
        config.simulation.initial_capital = capital;
    }
    config.validate()?;

    std::fs::create_dir_all(&config.output.logs_dir).with_context(|| {
        format!(
            "failed to create log directory {}",
            config.output.logs_dir.display()
        )
    })?;
    let guard = init_logging(&config.output.logs_dir)?;
    info!("Configuration loaded from {}", config_path);

    Ok((config, guard))
}

fn init_logging(logs_dir: &Path) -> anyhow::Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(logs_dir, "alphabasket.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(guard)
}

fn load_table(config: &Config, data_dir: &Path) -> anyhow::Result<SnapshotTable> {
    let snapshots = emissions::load_snapshot_dir(data_dir)
        .with_context(|| format!("failed to load snapshots from {}", data_dir.display()))?;
    println!(
        "Loaded {} snapshots from {}",
        snapshots.len(),
        data_dir.display()
    );
    let table = SnapshotTable::build(snapshots, &config.price_model)?;
    Ok(table)
}

fn load_schedule(path: Option<&Path>) -> anyhow::Result<Option<WeightSchedule>> {
    match path {
        Some(path) => {
            let schedule = WeightSchedule::load(path)
                .with_context(|| format!("failed to load weight schedule from {}", path.display()))?;
            println!(
                "Using weight schedule with {} dated entries from {}",
                schedule.len(),
                path.display()
            );
            Ok(Some(schedule))
        }
        None => Ok(None),
    }
}

// ==============================================================================
// Rendering and Export
// ==============================================================================

fn print_comparison(comparison: &ComparisonReport) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Cadence",
            "Total Ret %",
            "Annual Ret %",
            "Vol %",
            "Sharpe",
            "Max DD %",
            "Rebalances",
            "Cost",
            "Cost %",
            "Tracking Err",
            "Final NAV",
        ]);
    for row in &comparison.rows {
        table.add_row(vec![
            row.cadence.label(),
            format!("{:.2}", row.total_return_pct),
            format!("{:.2}", row.annualized_return_pct),
            format!("{:.2}", row.annualized_volatility_pct),
            format!("{:.3}", row.sharpe_ratio),
            format!("{:.2}", row.max_drawdown_pct),
            row.rebalance_count.to_string(),
            format!("{:.2}", row.total_transaction_cost),
            format!("{:.4}", row.transaction_cost_pct),
            format!("{:.4}", row.tracking_error),
            format!("{:.2}", row.final_nav),
        ]);
    }
    println!("{table}");
}

fn print_single_result(result: &SimulationResult) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Cadence".to_string(), result.cadence.label()]);
    table.add_row(vec![
        "Final NAV".to_string(),
        format!("{:.2}", result.final_nav),
    ]);
    table.add_row(vec![
        "Total return %".to_string(),
        format!("{:.4}", result.report.total_return_pct),
    ]);
    table.add_row(vec![
        "Annualized return %".to_string(),
        format!("{:.4}", result.report.annualized_return_pct),
    ]);
    table.add_row(vec![
        "Annualized volatility %".to_string(),
        format!("{:.4}", result.report.annualized_volatility_pct),
    ]);
    table.add_row(vec![
        "Sharpe ratio".to_string(),
        format!("{:.4}", result.report.sharpe_ratio),
    ]);
    table.add_row(vec![
        "Max drawdown %".to_string(),
        format!("{:.4}", result.report.max_drawdown_pct),
    ]);
    table.add_row(vec![
        "Rebalances".to_string(),
        result.rebalance_count.to_string(),
    ]);
    table.add_row(vec![
        "Transaction cost".to_string(),
        format!("{:.2}", result.total_transaction_cost),
    ]);
    table.add_row(vec![
        "Transaction cost %".to_string(),
        format!("{:.6}", result.transaction_cost_pct),
    ]);
    table.add_row(vec![
        "Simulated days".to_string(),
        result.report.simulated_days.to_string(),
    ]);
    println!("{table}");
}

fn write_comparison_csv(path: &Path, comparison: &ComparisonReport) -> anyhow::Result<()> {
    let mut f = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    writeln!(
        f,
        "cadence,total_return_pct,annualized_return_pct,annualized_volatility_pct,sharpe_ratio,max_drawdown_pct,rebalances,transaction_cost,transaction_cost_pct,tracking_error,final_nav,simulated_days"
    )?;
    for row in &comparison.rows {
        writeln!(
            f,
            "{},{:.6},{:.6},{:.6},{:.6},{:.6},{},{},{:.6},{:.8},{},{}",
            row.cadence.label(),
            row.total_return_pct,
            row.annualized_return_pct,
            row.annualized_volatility_pct,
            row.sharpe_ratio,
            row.max_drawdown_pct,
            row.rebalance_count,
            row.total_transaction_cost,
            row.transaction_cost_pct,
            row.tracking_error,
            row.final_nav,
            row.simulated_days,
        )?;
    }

    Ok(())
}

fn write_nav_csv(path: &Path, history: &[NavPoint]) -> anyhow::Result<()> {
    let mut f = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    writeln!(f, "timestamp,nav,cash")?;
    for point in history {
        writeln!(
            f,
            "{},{},{}",
            point.timestamp.to_rfc3339(),
            point.nav,
            point.cash
        )?;
    }

    Ok(())
}
