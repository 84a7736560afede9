use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the command tree in src/main.rs.
// Build scripts can't reach src/ modules, so the shape is repeated here.
const LOG_LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input file path, or - for stdin")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("rsdn")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Format forum markup as XHTML")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .value_parser(clap::builder::PossibleValuesParser::new(LOG_LEVELS))
                .global(true),
        )
        .subcommand(
            Command::new("format")
                .arg(input_arg())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                )
                .arg(Arg::new("no-smiles").long("no-smiles").action(ArgAction::SetTrue))
                .arg(Arg::new("raw").long("raw").action(ArgAction::SetTrue))
                .arg(
                    Arg::new("explicit-links-only")
                        .long("explicit-links-only")
                        .action(ArgAction::SetTrue),
                )
                .arg(Arg::new("secure").long("secure").action(ArgAction::SetTrue))
                .arg(Arg::new("xhtml").long("xhtml").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("colorize").arg(input_arg()).arg(
                Arg::new("lang")
                    .long("lang")
                    .required(true)
                    .value_hint(ValueHint::Other),
            ),
        )
        .subcommand(Command::new("languages"));

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "rsdn", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "rsdn", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "rsdn", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
