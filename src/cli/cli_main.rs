// Main CLI entrypoint
// (c) 2024 Ross Younger

use std::{fs::File, io, path::Path, process::ExitCode};

use anstream::{eprintln, print, println};
use anyhow::Context as _;
use clap::Parser as _;
use tracing::{debug, info};

use super::{
    args::{CliArgs, Command, STDIN},
    styles::{tag, ERROR, SUCCESS},
};
use crate::{
    config::{self, Configuration, Parser},
    util::{setup_tracing, Verbosity},
};

/// Main CLI entrypoint
pub fn cli() -> anyhow::Result<ExitCode> {
    let args = CliArgs::parse();
    let verbosity = Verbosity::from_flags(args.quiet, args.debug);
    setup_tracing(verbosity, args.log_file.as_deref()).inspect_err(|e| eprintln!("{e:?}"))?;
    debug!("{args:?}");

    run(&args)
        .inspect_err(|e| eprintln!("{} {e:#}", tag(ERROR, "ERROR")))
        .or(Ok(ExitCode::FAILURE))
}

fn run(args: &CliArgs) -> anyhow::Result<ExitCode> {
    match &args.command {
        Command::Check { files } => Ok(if check_files(files, args.quiet) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }),
        Command::Format { file, output } => {
            format_file(file, output.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Show { file, json } => {
            let config = load(file)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("{}", config.to_display_adapter());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Query {
            file,
            user,
            address,
        } => {
            let config = load(file)?;
            match config.authentication_methods_for(user, address) {
                Some(methods) => println!("{methods}"),
                None => info!("no matching block sets AuthenticationMethods for {user} at {address}"),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Defaults => {
            print!("{}", Configuration::default());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Parses a named file, or standard input
fn load(file: &str) -> Result<Configuration, config::Error> {
    if file == STDIN {
        Parser::for_reader(io::stdin().lock(), "<stdin>").parse()
    } else {
        Parser::for_path(file)?.parse()
    }
}

/// Reports on each file in turn. Returns true if they all parsed.
fn check_files(files: &[String], quiet: bool) -> bool {
    let mut all_ok = true;
    for file in files {
        match load(file) {
            Ok(config) => {
                debug!("{file}: {} match blocks", config.match_blocks().len());
                if !quiet {
                    println!("{} {file}", tag(SUCCESS, "OK"));
                }
            }
            Err(e) => {
                eprintln!("{} {:#}", tag(ERROR, "ERROR"), anyhow::Error::from(e));
                all_ok = false;
            }
        }
    }
    all_ok
}

fn format_file(file: &str, output: Option<&Path>) -> anyhow::Result<()> {
    let config = load(file)?;
    match output {
        Some(path) => {
            let mut out = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            config
                .write_to(&mut out)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => config
            .write_to(&mut io::stdout().lock())
            .context("Failed to write output")?,
    }
    Ok(())
}
