use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Once;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use lockbench_core::{
    BenchConfig, DryRun, Driver, LockKind, ProcessExecutor, Profile, ResultLayout, Summary, kind::canonical_order,
    report,
};


static TRACE_INIT: Once = Once::new();
const DEFAULT_TRACE_FILTER: &str = "lockbench=info";

#[derive(Debug, Parser)]
#[command(
    name = "lockbench",
    author,
    version,
    about = "Sweep locking-primitive benchmarks and summarise their throughput",
    long_about = None,
    after_help = "Set LOCKBENCH_LOG=1 (or a filter such as `lockbench=debug`) to log each invocation."
)]
struct CliArgs {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the benchmark sweep, one result file per repetition.
    Run {
        #[command(flatten)]
        sweep: SweepArgs,
        /// Print the invocations instead of running them
        #[arg(long)]
        dry_run: bool,
    },
    /// Print every invocation of the sweep without running anything.
    Plan {
        #[command(flatten)]
        sweep: SweepArgs,
    },
    /// Aggregate existing result files into the throughput CSV.
    Report {
        #[command(flatten)]
        sweep: SweepArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Run the sweep, then write the report.
    All {
        #[command(flatten)]
        sweep: SweepArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Debug, Clone, Args)]
struct SweepArgs {
    /// Workload profile
    #[arg(long, value_enum, default_value_t = ProfileArg::Contended)]
    profile: ProfileArg,
    /// Restrict to these lock kinds (repeatable); defaults to every kind in the profile
    #[arg(long = "kind", short = 'k', value_enum)]
    kinds: Vec<KindArg>,
    /// TOML file overriding executables, sweep and iteration counts
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Result directory (defaults to `res` or `noreading` depending on the profile)
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct OutputArgs {
    /// CSV destination (defaults to `<root>/res.csv`)
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,
    /// Also write per-repetition timings as JSON
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProfileArg {
    Contended,
    #[value(alias = "noreading")]
    NoReading,
}

impl From<ProfileArg> for Profile {
    fn from(value: ProfileArg) -> Self {
        match value {
            ProfileArg::Contended => Profile::Contended,
            ProfileArg::NoReading => Profile::NoReading,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KindArg {
    Rcu,
    Mutex,
    Comutex,
    Spinlock,
    Cospinlock,
    Smutex,
    Cosmutex,
}

impl From<KindArg> for LockKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Rcu => LockKind::Rcu,
            KindArg::Mutex => LockKind::Mutex,
            KindArg::Comutex => LockKind::CoMutex,
            KindArg::Spinlock => LockKind::Spinlock,
            KindArg::Cospinlock => LockKind::CoSpinlock,
            KindArg::Smutex => LockKind::SMutex,
            KindArg::Cosmutex => LockKind::CoSMutex,
        }
    }
}

/// Everything a subcommand needs, resolved from the CLI flags.
#[derive(Debug)]
pub(crate) struct SweepPlan {
    config: BenchConfig,
    profile: Profile,
    layout: ResultLayout,
    kinds: Vec<LockKind>,
}

impl SweepPlan {
    fn resolve(args: &SweepArgs) -> anyhow::Result<Self> {
        let config = match &args.config {
            Some(path) => BenchConfig::load(path)?,
            None => BenchConfig::default(),
        };
        let profile = Profile::from(args.profile);
        let root = args
            .root
            .clone()
            .unwrap_or_else(|| PathBuf::from(profile.default_root()));
        let kinds = if args.kinds.is_empty() {
            profile.kinds()
        } else {
            let requested: Vec<LockKind> = args.kinds.iter().copied().map(LockKind::from).collect();
            let kinds = canonical_order(&requested);
            if let Some(kind) = kinds.iter().find(|k| profile.workload(**k).is_none()) {
                anyhow::bail!("lock kind '{}' is not benchmarked by the '{}' profile", kind, profile);
            }
            kinds
        };
        tracing::debug!(
            target: "lockbench::cli",
            profile = %profile,
            root = %root.display(),
            ?kinds,
            "resolved sweep plan"
        );
        Ok(Self {
            config,
            profile,
            layout: ResultLayout::new(root),
            kinds,
        })
    }
}

fn env_toggle_enabled(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return false;
    }
    !(trimmed.eq_ignore_ascii_case("0") || trimmed.eq_ignore_ascii_case("false") || trimmed.eq_ignore_ascii_case("off"))
}

fn filter_expr_from(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("1")
        || trimmed.eq_ignore_ascii_case("true")
        || trimmed.eq_ignore_ascii_case("on")
    {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn maybe_init_tracing() {
    let raw = match std::env::var("LOCKBENCH_LOG") {
        Ok(value) => value,
        Err(_) => return,
    };

    if !env_toggle_enabled(&raw) {
        return;
    }

    TRACE_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        use tracing_subscriber::fmt;

        let filter_expr = filter_expr_from(&raw).or_else(|| std::env::var("RUST_LOG").ok());

        let builder = fmt().with_writer(std::io::stderr);

        let builder = match filter_expr.and_then(|expr| EnvFilter::try_new(expr).ok()) {
            Some(filter) => builder.with_env_filter(filter),
            None => builder.with_env_filter(DEFAULT_TRACE_FILTER),
        };

        let _ = builder.try_init();
    });
}

fn run_sweep(plan: &SweepPlan) -> anyhow::Result<()> {
    let mut driver = Driver::new(&plan.config, plan.profile, plan.layout.clone(), ProcessExecutor);
    let stats = driver.run_sweep(&plan.kinds)?;
    eprintln!(
        "Ran {} benchmark invocations ({} failed) under {}",
        stats.runs,
        stats.failures,
        plan.layout.root().display()
    );
    Ok(())
}

fn print_plan(plan: &SweepPlan) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut driver = Driver::new(
        &plan.config,
        plan.profile,
        plan.layout.clone(),
        DryRun::new(stdout.lock()),
    );
    driver.run_sweep(&plan.kinds)?;
    driver.into_executor().into_inner().flush()?;
    Ok(())
}

fn write_report(plan: &SweepPlan, output: &OutputArgs) -> anyhow::Result<()> {
    let summary = Summary::collect(&plan.config, plan.profile, &plan.layout, &plan.kinds)
        .with_context(|| format!("aggregate results under {}", plan.layout.root().display()))?;
    let csv_path = output.output.clone().unwrap_or_else(|| plan.layout.summary_csv());
    report::write_csv(&csv_path, &summary)?;
    eprintln!("Wrote {} rows to {}", summary.rows.len(), csv_path.display());
    if let Some(json_path) = &output.json {
        report::write_json(json_path, &summary, chrono::Utc::now())?;
        eprintln!("Wrote timings to {}", json_path.display());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    maybe_init_tracing();

    let CliArgs { command } = CliArgs::parse();

    match command {
        Commands::Run { sweep, dry_run } => {
            let plan = SweepPlan::resolve(&sweep)?;
            if dry_run { print_plan(&plan) } else { run_sweep(&plan) }
        }
        Commands::Plan { sweep } => {
            let plan = SweepPlan::resolve(&sweep)?;
            print_plan(&plan)
        }
        Commands::Report { sweep, output } => {
            let plan = SweepPlan::resolve(&sweep)?;
            write_report(&plan, &output)
        }
        Commands::All { sweep, output } => {
            let plan = SweepPlan::resolve(&sweep)?;
            run_sweep(&plan)?;
            write_report(&plan, &output)
        }
    }
}
