use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("taxigraph")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("taxigraph")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(arg!(-v --"verbose" "Log debug output to stderr").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("table")
                .about("Flattens the taxi CSV tables into the addon data file")
                .arg(
                    arg!(<INPUT>)
                        .required(true)
                        .help("Directory holding the taxinodes, taxipath and taxipathnode CSV files"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Where to write the data file")
                        .default_value("db.lua"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Output format: lua, json")
                        .value_parser(["lua", "json"])
                        .default_value("lua"),
                )
                .arg(
                    arg!(--"all-fields")
                        .required(false)
                        .help("Keep every column of every table")
                        .action(clap::ArgAction::SetTrue)
                        .conflicts_with("fields"),
                )
                .arg(
                    arg!(--"fields" <PATH>)
                        .required(false)
                        .help("JSON file mapping table names to the columns to keep")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .conflicts_with("all-fields"),
                ),
        )
        .subcommand(
            command!("render")
                .about("Renders the taxi graph as one SVG image per map")
                .arg(
                    arg!(<INPUT>)
                        .required(true)
                        .help("Directory holding the taxinodes, taxipath and taxipathnode CSV files"),
                )
                .arg(
                    arg!(-o --"output" <DIR>)
                        .required(false)
                        .help("Directory to write the images to")
                        .default_value("svg"),
                )
                .arg(
                    arg!(-m --"map" <MAP_ID>)
                        .required(false)
                        .help("Render a single map")
                        .value_parser(clap::value_parser!(i64))
                        .conflicts_with("no-split"),
                )
                .arg(
                    arg!(--"no-split")
                        .required(false)
                        .help("Render every map into a single db.svg")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"no-waypoints")
                        .required(false)
                        .help("Do not draw path waypoints")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"no-direct-edges")
                        .required(false)
                        .help("Do not draw straight node to node connectors")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("maps")
                .about("Lists the map ids that have connected taxi nodes")
                .arg(
                    arg!(<INPUT>)
                        .required(true)
                        .help("Directory holding the taxinodes, taxipath and taxipathnode CSV files"),
                ),
        )
}
