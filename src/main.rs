mod analyzer;
mod models;
mod parser;
mod report;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, Command};
use models::{Config, RunSummary, OCCUPATIONS_HEADER, STATES_HEADER};
use std::fs;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Count certified applications in `input` and write the occupation and state reports.
///
/// Both rankings are computed before any report is touched.
fn run(
    input: &Path,
    occupations_output: &Path,
    states_output: &Path,
    config: &Config,
) -> Result<RunSummary> {
    config.validate()?;

    info!(input = %input.display(), "reading input");
    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read file: {}", input.display()))?;

    let aggregation = parser::aggregate(&content)?;
    info!(
        lines = aggregation.lines_read,
        certified = aggregation.total_certified,
        occupations = aggregation.occupations.len(),
        states = aggregation.states.len(),
        "aggregated input"
    );

    let distinct_occupations = aggregation.occupations.len();
    let distinct_states = aggregation.states.len();
    let top_occupations = analyzer::rank(aggregation.occupations, aggregation.total_certified)?;
    let top_states = analyzer::rank(aggregation.states, aggregation.total_certified)?;

    let occupation_rows = report::write_report(
        occupations_output,
        &top_occupations,
        OCCUPATIONS_HEADER,
        config.max_rows,
    )?;
    info!(path = %occupations_output.display(), rows = occupation_rows, "wrote occupations report");

    let state_rows = report::write_report(states_output, &top_states, STATES_HEADER, config.max_rows)?;
    info!(path = %states_output.display(), rows = state_rows, "wrote states report");

    Ok(RunSummary {
        lines_read: aggregation.lines_read,
        total_certified: aggregation.total_certified,
        distinct_occupations,
        distinct_states,
        occupation_rows,
        state_rows,
    })
}

fn cli() -> Command {
    Command::new("h1b-stats")
        .version("0.1.0")
        .about("Ranks certified H-1B applications by occupation and by work state")
        .arg(
            Arg::new("input")
                .value_name("INPUT")
                .help("Semicolon-delimited input file with a header line")
                .required(true),
        )
        .arg(
            Arg::new("occupations")
                .value_name("OCCUPATIONS_OUT")
                .help("Output path for the top occupations report")
                .required(true),
        )
        .arg(
            Arg::new("states")
                .value_name("STATES_OUT")
                .help("Output path for the top states report")
                .required(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path"),
        )
        .arg(
            Arg::new("top")
                .short('n')
                .long("top")
                .value_name("N")
                .help("Maximum number of rows per report (overrides the config file)")
                .value_parser(value_parser!(usize)),
        )
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();

    let mut config = match matches.get_one::<String>("config") {
        Some(config_file) => {
            info!(path = %config_file, "loading configuration");
            Config::load_from_file(config_file)?
        }
        None => Config::default(),
    };
    if let Some(top) = matches.get_one::<usize>("top") {
        config.max_rows = *top;
    }

    // required args are enforced by clap
    let input = Path::new(matches.get_one::<String>("input").unwrap());
    let occupations = Path::new(matches.get_one::<String>("occupations").unwrap());
    let states = Path::new(matches.get_one::<String>("states").unwrap());

    let summary = run(input, occupations, states, &config)?;

    println!("✅ Processed {} records, {} certified", summary.lines_read, summary.total_certified);
    println!(
        "📊 {} occupations ({} written) -> {}",
        summary.distinct_occupations,
        summary.occupation_rows,
        occupations.display()
    );
    println!(
        "📊 {} states ({} written) -> {}",
        summary.distinct_states,
        summary.state_rows,
        states.display()
    );
    Ok(())
}
