//! # ruletable
//!
//! A CLI for turning rule-inference results into display tables.
//!
//! ## Overview
//!
//! ruletable is built on top of ruletablelib. It reads result rows from
//! JSON, picks and formats columns as described on the command line, and
//! prints an aligned table, JSON or CSV.
//!
//! ## Usage
//!
//! ```bash
//! # Domain, inference time and derivability of each run
//! ruletable table results.json \
//!     -c Domain=domain -c "Time (s)=time" -c Derivability=derive:derivability
//!
//! # Rule lists with bidirectional pairs merged, as JSON
//! ruletable table results.json -c Domain=domain -c Rules=rules:rules --output json
//!
//! # Pretty-print a rule list (JSON array or one rule per line)
//! ruletable rules rules.txt
//!
//! # A single percentage
//! ruletable percent 17 40 --decimals 1
//! ```

use std::process::ExitCode;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use ruletablelib::{
    format_rules_with, json_column_map, read_rows, read_rules, to_percentage, ColumnSpec,
    FormatOptions, OutputFormat, ResultTable, LINE_BREAK, MAX_FIXED_DIGITS,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod render;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("ruletable")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Format rule-inference results as display tables")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log debug information to stderr"),
        )
        .subcommand(
            Command::new("table")
                .about("Reshape result rows into a table")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .help("JSON file with an array of result rows"),
                )
                .arg(
                    Arg::new("column")
                        .short('c')
                        .long("column")
                        .required(true)
                        .action(ArgAction::Append)
                        .value_name("KEY=PATH[:FORMAT]")
                        .help(
                            "Output column (can be specified multiple times). \
                             FORMAT is one of value, derivability, rules, count",
                        ),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_parser(OutputFormat::NAMES)
                        .default_value("table")
                        .help("Output format"),
                )
                .arg(
                    Arg::new("title")
                        .long("title")
                        .help("Caption printed above the table"),
                )
                .arg(
                    Arg::new("separator")
                        .long("separator")
                        .default_value(LINE_BREAK)
                        .help("Separator between rules inside a rules cell"),
                )
                .arg(
                    Arg::new("precision")
                        .short('p')
                        .long("precision")
                        .value_parser(digits_parser())
                        .help("Digits after the decimal point in value columns (default 2)"),
                ),
        )
        .subcommand(
            Command::new("rules")
                .about("Pretty-print a rule list, merging bidirectional pairs")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .help("JSON array of rules, or one rule per line"),
                )
                .arg(
                    Arg::new("separator")
                        .long("separator")
                        .default_value("\n")
                        .help("Separator between printed rules"),
                ),
        )
        .subcommand(
            Command::new("percent")
                .about("Print numerator / denominator as a percentage")
                .arg(
                    Arg::new("numerator")
                        .required(true)
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(f64)),
                )
                .arg(
                    Arg::new("denominator")
                        .required(true)
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(f64)),
                )
                .arg(
                    Arg::new("decimals")
                        .short('d')
                        .long("decimals")
                        .value_parser(digits_parser())
                        .help("Digits after the decimal point (default 0)"),
                ),
        )
}

/// Parser for fraction digit counts
fn digits_parser() -> clap::builder::RangedI64ValueParser<u32> {
    value_parser!(u32).range(0..=i64::from(MAX_FIXED_DIGITS))
}

/// Install the stderr log subscriber
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "ruletable=debug,ruletablelib=debug,warn"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Fetch a required string argument
fn required<'a>(matches: &'a ArgMatches, name: &str) -> anyhow::Result<&'a str> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing argument <{}>", name))
}

/// Handler for the table command
fn table_handler(matches: &ArgMatches) -> anyhow::Result<String> {
    let file = required(matches, "file")?;
    let specs = matches
        .get_many::<String>("column")
        .into_iter()
        .flatten()
        .map(|spec| spec.parse::<ColumnSpec>())
        .collect::<Result<Vec<_>, _>>()?;
    let format: OutputFormat = required(matches, "output")?.parse()?;
    let options = FormatOptions::new()
        .rule_separator(required(matches, "separator")?)
        .precision(matches.get_one::<u32>("precision").copied());

    let rows = read_rows(file)?;
    let columns = json_column_map(&specs, &options);
    tracing::debug!(columns = ?columns, format = %format, "rendering table");

    let mut table = ResultTable::from_rows(&columns, &rows);
    if let Some(title) = matches.get_one::<String>("title") {
        table = table.with_title(title);
    }

    render::render_table(&table, format)
}

/// Handler for the rules command
fn rules_handler(matches: &ArgMatches) -> anyhow::Result<String> {
    let rules = read_rules(required(matches, "file")?)?;
    let separator = required(matches, "separator")?;
    Ok(format!(
        "{}\n",
        format_rules_with(Some(&rules[..]), separator)
    ))
}

/// Handler for the percent command
fn percent_handler(matches: &ArgMatches) -> anyhow::Result<String> {
    let numerator = *matches
        .get_one::<f64>("numerator")
        .context("missing argument <numerator>")?;
    let denominator = *matches
        .get_one::<f64>("denominator")
        .context("missing argument <denominator>")?;
    let decimals = matches.get_one::<u32>("decimals").copied();
    Ok(format!(
        "{}\n",
        to_percentage(numerator, denominator, decimals)
    ))
}

fn run(matches: &ArgMatches) -> anyhow::Result<String> {
    match matches.subcommand() {
        Some(("table", sub)) => table_handler(sub),
        Some(("rules", sub)) => rules_handler(sub),
        Some(("percent", sub)) => percent_handler(sub),
        Some((name, _)) => Err(anyhow::anyhow!("unknown command: {}", name)),
        None => Err(anyhow::anyhow!("no command given")),
    }
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_logging(matches.get_flag("verbose"));

    match run(&matches) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
