pub mod build;
pub mod parse;
pub mod search;

use clap::Command;
use color_eyre::eyre::Result;
use wave_search::config::Config;

/// Register all application commands
pub fn register_commands(app: Command) -> Command {
    app.subcommand(parse::register_command())
        .subcommand(search::register_command())
        .subcommand(build::register_command())
}

/// Handle all application commands
pub fn handle_commands(matches: clap::ArgMatches, config: &Config) -> Result<()> {
    match matches.subcommand() {
        Some(("parse", args)) => parse::execute(config, args),
        Some(("search", args)) => search::execute(config, args),
        Some(("build", args)) => build::execute(config, args),
        _ => {
            println!("Please specify a subcommand. Use --help for more information.");
            Ok(())
        },
    }
}

/// The query argument shared by `parse` and `search`, falling back to the
/// configured default
fn query_arg(config: &Config, args: &clap::ArgMatches) -> String {
    args.get_many::<String>("query")
        .map(|words| words.cloned().collect::<Vec<_>>().join(" "))
        .unwrap_or_else(|| config.default_query.clone())
}

fn query_positional() -> clap::Arg {
    clap::Arg::new("query")
        .help("Search query, e.g. 'in:inbox creator:alice orderby:dateasc'")
        .num_args(1..)
        .trailing_var_arg(true)
        .value_parser(clap::value_parser!(String))
}
