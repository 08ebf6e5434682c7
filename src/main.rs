use anyhow::{Context, Result};
use clap::Parser;
use ledgerbench::cli::{
    Cli, Command, CompareArgs, InputArgs, OutputArgs, ProfileArgs, RelativeArgs, ScalingArgs,
    SuperiorityArgs,
};
use ledgerbench::config::{AnalysisConfig, ConfigLayer};
use ledgerbench::distribution::resolve_backend;
use ledgerbench::measurement::ResultSet;
use ledgerbench::table::Tabular;
use ledgerbench::{comparison, profile, relative, report, scaling, superiority};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Merge config file, environment and command line
fn resolve_config(input: &InputArgs, cli: &ConfigLayer) -> Result<AnalysisConfig> {
    let env = ConfigLayer::from_env()?;
    AnalysisConfig::resolve(input.config.as_deref(), &env, cli)
}

fn load_results(config: &AnalysisConfig) -> Result<ResultSet> {
    let path = config.results_path()?;
    ResultSet::from_csv_path(path)
        .with_context(|| format!("Failed to load results from {}", path.display()))
}

fn write_report<T: Tabular + Serialize>(table: &T, kind: &str, output: &OutputArgs) -> Result<()> {
    let content = report::render(table, kind, output.format)?;
    report::emit(&content, output.output.as_deref())
}

fn run_superiority(args: &SuperiorityArgs) -> Result<()> {
    let config = resolve_config(&args.input, &args.config_layer())?;
    let label_a = config
        .label_a
        .as_deref()
        .context("Missing label A (use --label-a or `label_a` in the config file)")?;
    let label_b = config
        .label_b
        .as_deref()
        .context("Missing label B (use --label-b or `label_b` in the config file)")?;

    let results = load_results(&config)?;
    let backend = resolve_backend(config.p_value_method)?;
    tracing::info!("p-values: {}", backend.method());

    let table = superiority::run_superiority(
        &results,
        label_a,
        label_b,
        &config.superiority,
        backend.as_ref(),
    )
    .with_context(|| format!("Labels present: {}", results.labels().join(" | ")))?;

    write_report(&table, "superiority", &args.output)
}

fn run_profile(args: &ProfileArgs) -> Result<()> {
    let config = resolve_config(&args.input, &args.input.config_layer())?;
    let results = load_results(&config)?;
    let table = profile::latency_profile(&results, args.indexing, args.size)?;
    write_report(&table, "profile", &args.output)
}

fn run_compare(args: &CompareArgs) -> Result<()> {
    let config = resolve_config(&args.input, &args.input.config_layer())?;
    let results = load_results(&config)?;
    let table = comparison::compare_sizes(&results)?;
    write_report(&table, "compare", &args.output)
}

fn run_relative(args: &RelativeArgs) -> Result<()> {
    let wide = match &args.wide {
        Some(path) => relative::wide_from_csv_path(path)
            .with_context(|| format!("Failed to load wide table from {}", path.display()))?,
        None => {
            let config = resolve_config(&args.input, &args.input.config_layer())?;
            let results = load_results(&config)?;
            relative::wide_from_results(&results, args.size)
        }
    };
    let table = relative::relative_table(&wide, args.round, args.title.clone());
    write_report(&table, "relative", &args.output)
}

fn run_scaling(args: &ScalingArgs) -> Result<()> {
    let config = resolve_config(&args.input, &args.input.config_layer())?;
    let results = load_results(&config)?;
    let options = scaling::ScalingOptions {
        metric: args.metric,
        indexing: args.indexing,
        variants: args.variants.clone(),
    };
    let table = scaling::scaling_intervals(&results, &options)?;
    write_report(&table, "scaling", &args.output)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(cli.debug);

    match &cli.command {
        Command::Superiority(args) => run_superiority(args),
        Command::Profile(args) => run_profile(args),
        Command::Compare(args) => run_compare(args),
        Command::Relative(args) => run_relative(args),
        Command::Scaling(args) => run_scaling(args),
    }
}
