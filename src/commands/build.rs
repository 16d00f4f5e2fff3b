use chrono::NaiveDate;
use clap::{Arg, ArgAction, ArgMatches, Command};
use color_eyre::eyre::Result;
use wave_search::{
    config::Config,
    query::{OrderSpec, QueryBuilder, SearchScope, dates::FILTER_DATE_FORMAT},
};

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, FILTER_DATE_FORMAT)
        .map_err(|e| format!("expected yyyyMMdd: {}", e))
}

fn parse_order(value: &str) -> Result<OrderSpec, String> {
    OrderSpec::from_token(value).ok_or_else(|| {
        let known: Vec<&str> = OrderSpec::ALL.iter().map(|spec| spec.token()).collect();
        format!("expected one of {}", known.join(", "))
    })
}

fn date_arg(id: &'static str, long: &'static str, help: &'static str) -> Arg {
    Arg::new(id).long(long).help(help).value_parser(parse_date)
}

/// Register build command
pub fn register_command() -> Command {
    Command::new("build")
        .about("Build a search query from form fields")
        .arg(
            Arg::new("scope")
                .long("scope")
                .help("Folder to search: inbox, shared or all")
                .default_value("inbox")
                .value_parser(|s: &str| s.parse::<SearchScope>().map_err(|e| e.to_string())),
        )
        .arg(
            Arg::new("creator")
                .long("creator")
                .help("Wave creators, separated by commas or spaces")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("with")
                .long("with")
                .help("Participants, separated by commas or spaces")
                .action(ArgAction::Append),
        )
        .arg(date_arg("created_from", "created-from", "Created on or after (yyyyMMdd)"))
        .arg(date_arg("created_to", "created-to", "Created on or before (yyyyMMdd)"))
        .arg(date_arg("modified_from", "modified-from", "Modified on or after (yyyyMMdd)"))
        .arg(date_arg("modified_to", "modified-to", "Modified on or before (yyyyMMdd)"))
        .arg(
            Arg::new("orderby")
                .long("orderby")
                .help("Sort key, repeatable; earlier keys take precedence")
                .action(ArgAction::Append)
                .value_parser(parse_order),
        )
}

/// Build the query string and print it
pub fn execute(_config: &Config, args: &ArgMatches) -> Result<()> {
    let scope = args.get_one::<SearchScope>("scope").copied().unwrap_or_default();
    let date = |id: &str| args.get_one::<NaiveDate>(id).copied();

    let mut builder = QueryBuilder::new()
        .scope(scope)
        .created_between(date("created_from"), date("created_to"))
        .last_modified_between(date("modified_from"), date("modified_to"));

    for field in args.get_many::<String>("creator").into_iter().flatten() {
        builder = builder.creators(field);
    }
    for field in args.get_many::<String>("with").into_iter().flatten() {
        builder = builder.with_participants(field);
    }
    for spec in args.get_many::<OrderSpec>("orderby").into_iter().flatten() {
        builder = builder.order_by(*spec);
    }

    println!("{}", builder.build()?);
    Ok(())
}
