//! Command-line interface for inpmap
//! Discovers the dynamic interface of a SWMM model and writes the document the GoldSim
//! bridge loads at run time.
//!
//! Usage:
//!   inpmap generate `<path>` [-i `<name>`]... [-o `<name>`]... [-f `<file>`] [--allow-errors]
//!   inpmap validate `<path>`
//!   inpmap check `<path>` --mapping `<json>`
//!
//! Global flags: --config `<toml>` layers a user configuration file over the built-in
//! defaults, --log-level sets the diagnostics level on stderr.

mod commands;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use inpmap_config::{ConfigError, LogLevel, Loader, MapperConfig};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn model_arg() -> Arg {
    Arg::new("path")
        .help("Path to the SWMM .inp model")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .index(1)
}

fn cli() -> Command {
    Command::new("inpmap")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate and check SWMM/GoldSim interface documents")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_name("TOML")
                .value_parser(value_parser!(PathBuf))
                .help("Configuration file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .value_parser(["error", "warn", "info", "debug", "trace"])
                .help("Diagnostics level on stderr (default from config: info)"),
        )
        .subcommand(
            Command::new("generate")
                .about("Discover interface slots and write the interface document")
                .arg(model_arg())
                .arg(
                    Arg::new("input")
                        .long("input")
                        .short('i')
                        .value_name("NAME")
                        .action(ArgAction::Append)
                        .help("Expose this element as an input instead of sentinel discovery"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_name("NAME")
                        .action(ArgAction::Append)
                        .help("Expose this element as an output instead of every candidate"),
                )
                .arg(
                    Arg::new("file")
                        .long("file")
                        .short('f')
                        .value_name("FILE")
                        .help("Interface document to write (default: SwmmGoldSimBridge.json)"),
                )
                .arg(
                    Arg::new("allow-errors")
                        .long("allow-errors")
                        .action(ArgAction::SetTrue)
                        .help("Write the document even when validation reports errors"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Report structural problems in a model")
                .arg(model_arg()),
        )
        .subcommand(
            Command::new("check")
                .about("Verify an interface document and whether it matches the model")
                .arg(model_arg())
                .arg(
                    Arg::new("mapping")
                        .long("mapping")
                        .short('m')
                        .required(true)
                        .value_name("JSON")
                        .value_parser(value_parser!(PathBuf))
                        .help("Interface document to check"),
                ),
        )
}

fn main() {
    let matches = cli().get_matches();

    let config = load_config(&matches).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });
    init_logging(config.logging.level);

    let result = match matches.subcommand() {
        Some(("generate", sub)) => commands::generate(sub, &config),
        Some(("validate", sub)) => commands::validate(sub),
        Some(("check", sub)) => commands::check(sub),
        _ => unreachable!("a subcommand is required"),
    };

    if let Err(err) = result {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

/// Defaults, then `./inpmap.toml` if present, then `--config`, then flag overrides.
fn load_config(matches: &ArgMatches) -> Result<MapperConfig, ConfigError> {
    let mut loader = Loader::new().with_local_file(".");
    if let Some(path) = matches.get_one::<PathBuf>("config") {
        loader = loader.with_file(path);
    }
    if let Some(level) = matches.get_one::<String>("log-level") {
        loader = loader.with_log_level(level)?;
    }
    if let Some(("generate", sub)) = matches.subcommand() {
        if let Some(file) = sub.get_one::<String>("file") {
            loader = loader.with_output_file(file)?;
        }
        if sub.get_flag("allow-errors") {
            loader = loader.allow_errors()?;
        }
    }
    loader.build()
}

fn init_logging(level: LogLevel) {
    let level = match level {
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install logger: {}", err);
    }
}
