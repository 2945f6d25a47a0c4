//! Command-line interface for re-classify
//!
//! Usage:
//!   re-classify `<config.yaml>`           - Classify tokens read from stdin, one per line
//!   re-classify --check `<config.yaml>`   - Validate the configuration only
//!   re-classify --version               - Print the version
use clap::{Arg, ArgAction, Command};
use re_classify::{compile, ClassifierConfig, ClassifyError, Pipeline};
use std::io;

fn main() {
    init_tracing();

    let mut cmd = Command::new("re-classify")
        .about("Classifies tokens using the regex patterns in a YAML configuration")
        .after_help(
            "Tokens are read from stdin, one per line, and one classification \
             is written to stdout for each non-blank line.",
        )
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .long("version")
                .help("Show version information")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .help("Validate configuration syntax only (don't process input)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .help("Path to the YAML rule configuration")
                .value_name("config.yaml")
                .num_args(0..)
                .action(ArgAction::Append),
        );
    let matches = cmd.get_matches_mut();

    // --version wins over everything else on the command line
    if matches.get_flag("version") {
        println!("re-classify version {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let paths: Vec<&String> = matches
        .get_many::<String>("config")
        .map(|values| values.collect())
        .unwrap_or_default();
    let [path] = paths.as_slice() else {
        eprintln!("Error: exactly one config file must be specified\n");
        eprintln!("{}", cmd.render_usage());
        std::process::exit(1);
    };

    let result = if matches.get_flag("check") {
        handle_check_command(path)
    } else {
        handle_classify_command(path)
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Compile the configuration, including its start/end patterns, without reading stdin
fn handle_check_command(path: &str) -> Result<(), ClassifyError> {
    let config = ClassifierConfig::load(path)?;
    compile(&config)?.bind::<&str>(&[])?;
    println!("Configuration syntax is valid");
    Ok(())
}

fn handle_classify_command(path: &str) -> Result<(), ClassifyError> {
    let config = ClassifierConfig::load(path)?;
    let rules = compile(&config)?;
    let written = Pipeline::new(rules).run(io::stdin().lock(), io::stdout().lock())?;
    tracing::debug!(written, "classification finished");
    Ok(())
}

/// Log to stderr, and only when `RUST_LOG` is set, so stdout stays clean
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}
