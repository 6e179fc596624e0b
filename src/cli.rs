//! Command line plumbing shared by the `decision-tree` and `ensemble` programs
use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;

use crate::classifier::ClassifierKind;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::pipeline::{run, Outcome};
use crate::plot::{NoopVisualizer, SvgVisualizer};

/// Environment variable holding the `env_logger` filter
pub const LOG_ENV: &str = "TREE_CLASSIFY_LOG";

pub fn init_logging() {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Warn)
        .parse_env(env_logger::Env::default().filter_or(LOG_ENV, "warn"))
        .init();
}

fn with_common_args(command: Command) -> Command {
    command
        .version(clap::crate_version!())
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .help("Labeled data, one comma separated record per line with the label last")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("TOML file overriding the default configuration")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("plot_dir")
                .long("plot-dir")
                .help("Directory the SVG figures are written to")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::DirPath),
        )
        .arg(
            Arg::new("no_plots")
                .long("no-plots")
                .help("Do not render any figure")
                .action(ArgAction::SetTrue)
                .conflicts_with("plot_dir"),
        )
}

pub fn decision_tree_command() -> Command {
    with_common_args(
        Command::new("decision-tree")
            .about("Classify data with a single decision tree"),
    )
}

pub fn ensemble_command() -> Command {
    with_common_args(
        Command::new("ensemble")
            .about("Classify data using Ensemble Learning techniques")
            .arg(
                Arg::new("classifier_type")
                    .long("classifier-type")
                    .help("Type of classifier to use; can be either 'rf' or 'erf'")
                    .required(true)
                    .value_parser(["rf", "erf"]),
            ),
    )
}

/// Selected ensemble kind, the parser only lets `rf` and `erf` through
pub fn ensemble_kind(matches: &ArgMatches) -> Result<ClassifierKind> {
    let selector = matches
        .try_get_one::<String>("classifier_type")
        .ok()
        .flatten()
        .map(String::as_str)
        .unwrap_or_default();

    selector.parse()
}

/// Apply the config file and the command line overrides to `defaults`
pub fn resolve_config(defaults: PipelineConfig, matches: &ArgMatches) -> Result<PipelineConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => defaults.with_file(path)?,
        None => defaults,
    };

    if let Some(input) = matches.get_one::<PathBuf>("input") {
        config.input = input.clone();
    }
    if let Some(dir) = matches.get_one::<PathBuf>("plot_dir") {
        config.plot_dir = Some(dir.clone());
    }
    if matches.get_flag("no_plots") {
        config.plot_dir = None;
    }

    Ok(config)
}

/// Run the pipeline writing the console output to stdout
pub fn execute(config: &PipelineConfig, kind: ClassifierKind) -> Result<Outcome> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &config.plot_dir {
        Some(dir) => run(config, kind, &mut SvgVisualizer::new(dir)?, &mut out),
        None => run(config, kind, &mut NoopVisualizer, &mut out),
    }
}
