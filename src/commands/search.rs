use clap::{Arg, ArgMatches, Command};
use color_eyre::eyre::{Result, WrapErr};
use rayon::prelude::*;
use std::{fs, path::PathBuf};
use tracing::{debug, info};
use wave_search::{
    WaveSummary,
    config::Config,
    query::{QueryCompiler, SearchFilter, build_comparator},
};

/// Register search command
pub fn register_command() -> Command {
    Command::new("search")
        .about("Filter and sort wave summaries from a JSON file")
        .arg(
            Arg::new("records")
                .long("records")
                .short('r')
                .help("Path to a JSON array of wave summaries")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("limit")
                .long("limit")
                .help("Maximum number of wave ids to print")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(super::query_positional())
}

/// Run the query against the records file and print matching wave ids in order
pub fn execute(config: &Config, args: &ArgMatches) -> Result<()> {
    let query = super::query_arg(config, args);
    let zone = config.eval_zone()?;
    let parsed = QueryCompiler::new(zone).parse(&query)?;

    let filter = SearchFilter::from_parsed(&parsed, &config.local_domain, zone)?;
    let ordering = build_comparator(&parsed);

    let path = args
        .get_one::<PathBuf>("records")
        .ok_or_else(|| color_eyre::eyre::eyre!("--records is required"))?;
    let raw = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read records from {}", path.display()))?;
    let records: Vec<WaveSummary> = serde_json::from_str(&raw)
        .wrap_err_with(|| format!("Failed to parse records in {}", path.display()))?;
    let total = records.len();

    let mut matched: Vec<WaveSummary> =
        records.into_par_iter().filter(|record| filter.matches(record)).collect();
    debug!(total, matched = matched.len(), "Applied search filter");

    matched.par_sort_by(ordering.comparator());

    let limit = args.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);
    for record in matched.iter().take(limit) {
        println!("{}", record.id);
    }

    info!(
        total,
        matched = matched.len(),
        orderby = ?ordering.keys().iter().map(|spec| spec.token()).collect::<Vec<_>>(),
        "Search completed"
    );
    Ok(())
}
