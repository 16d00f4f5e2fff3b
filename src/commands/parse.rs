use clap::{ArgMatches, Command};
use color_eyre::eyre::Result;
use serde_json::json;
use tracing::info;
use wave_search::{
    config::Config,
    query::{QueryCompiler, build_comparator},
};

/// Register parse command
pub fn register_command() -> Command {
    Command::new("parse")
        .about("Compile a search query and print the parsed parameters as JSON")
        .arg(super::query_positional())
}

/// Compile the query and print its parameters, ordering and canonical form
pub fn execute(config: &Config, args: &ArgMatches) -> Result<()> {
    let query = super::query_arg(config, args);
    let compiler = QueryCompiler::new(config.eval_zone()?);

    let parsed = compiler.parse(&query)?;
    let ordering = build_comparator(&parsed);
    info!(keys = parsed.len(), "Parsed query");

    let order: Vec<&str> = ordering.keys().iter().map(|spec| spec.token()).collect();
    let output = json!({
        "query": query,
        "zone": compiler.zone().to_string(),
        "canonical": compiler.render(&parsed),
        "params": parsed,
        "orderby": order,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
