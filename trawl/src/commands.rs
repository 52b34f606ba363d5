use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::{ArgAction, arg, value_parser};
use trawl_scanner::CapPolicy;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("trawl")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Breadth-first web crawler. Follows absolute links from a seed URL.")
        .bin_name("trawl")
        .styles(CLAP_STYLING)
        .arg(
            arg!([URL])
                .required(false)
                .help("The seed URL to crawl (prompted for when omitted)"),
        )
        .arg(arg!(-q --"quiet" "Suppress banner, spinner and per-link output").required(false))
        .arg(
            arg!(-t --"threads" <NUM_WORKERS>)
                .required(false)
                .help("The number of async workers pulling from the queue")
                .value_parser(value_parser!(usize))
                .default_value("1"),
        )
        .arg(
            arg!(-m --"max-visited" <COUNT>)
                .required(false)
                .help("Stop once this many unique URLs have been discovered")
                .value_parser(value_parser!(usize))
                .default_value("500"),
        )
        .arg(
            arg!(--"max-body-bytes" <BYTES>)
                .required(false)
                .help("Read at most this many bytes of each response body")
                .value_parser(value_parser!(usize))
                .default_value("50000"),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds")
                .value_parser(value_parser!(u64))
                .default_value("10"),
        )
        .arg(
            arg!(--"on-cap" <POLICY>)
                .required(false)
                .help("What to do with queued URLs when the visited cap is hit")
                .value_parser(
                    PossibleValuesParser::new(["retain", "drop"])
                        .try_map(|policy| policy.parse::<CapPolicy>()),
                )
                .default_value("retain"),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Save report to file (default: display to screen)"),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Report format: text, json, csv, markdown")
                .value_parser(["text", "json", "csv", "markdown"])
                .default_value("text"),
        )
        .arg(
            arg!(--"no-progress")
                .required(false)
                .help("Disable the progress spinner")
                .action(ArgAction::SetTrue),
        )
}
