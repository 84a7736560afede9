// Command-line interface for the rsdn formatter
//
// The binary turns forum markup into the XHTML fragment the forum pages embed. All of the work
// happens in the rsdn-format library; this crate reads input, layers configuration and writes
// the result.
//
// Usage:
//  rsdn <input> [-o <file>] [flags]           - Format markup (default)
//  rsdn format <input> [-o <file>] [flags]    - Same as above (explicit)
//  rsdn colorize <input> --lang <tag>         - Colorize a code fragment
//  rsdn languages                             - List languages and their tags as JSON
//
// An input of `-` reads stdin.
//
// Configuration:
//
// The embedded defaults are layered with an optional rsdn.toml in the working directory and
// then with the file given by --config. Format flags (--no-smiles, --explicit-links-only,
// --secure) are applied on top of the loaded configuration.

mod logger;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::{debug, info};
use logger::LogLevel;
use rsdn_config::{Loader, RsdnConfig};
use rsdn_format::escape::escape_html;
use rsdn_format::grammar::CodeLanguage;
use rsdn_format::xhtml::to_xhtml;
use rsdn_format::{FormatOptions, LanguageRegistry, RequestContext, TextFormatter};
use std::fs;
use std::io::{self, Read};
use std::sync::Arc;

const SUBCOMMANDS: &[&str] = &["format", "colorize", "languages", "help"];

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input file path, or - for stdin")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn build_cli() -> Command {
    Command::new("rsdn")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Format forum markup as XHTML")
        .long_about(
            "rsdn turns forum markup ([b], [q], [code=cs], [url=...], smileys, citation lines)\n\
            into the XHTML fragment embedded in forum pages.\n\n\
            Examples:\n  \
            rsdn message.txt                       # Format to stdout\n  \
            rsdn message.txt -o message.html       # Format to a file\n  \
            cat message.txt | rsdn -               # Read stdin\n  \
            rsdn colorize Program.cs --lang cs     # Colorize a bare code fragment\n  \
            rsdn languages                         # List languages and tags",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to an rsdn.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Diagnostics written to stderr (default: warn)")
                .value_parser(clap::value_parser!(LogLevel))
                .global(true),
        )
        .subcommand(
            Command::new("format")
                .about("Format markup as XHTML (default command)")
                .arg(input_arg())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("no-smiles")
                        .long("no-smiles")
                        .help("Leave smiley glyphs as text")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("raw")
                        .long("raw")
                        .help("The input is already HTML-escaped")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("explicit-links-only")
                        .long("explicit-links-only")
                        .help("Only [url] tags become links, bare URLs stay text")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("secure")
                        .long("secure")
                        .help("The page is served over https")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("xhtml")
                        .long("xhtml")
                        .help("Reduced rendering for feeds: emphasis, headers and paragraphs only")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("colorize")
                .about("Colorize a code fragment")
                .arg(input_arg())
                .arg(
                    Arg::new("lang")
                        .long("lang")
                        .help("Code tag or language name (see `rsdn languages`)")
                        .required(true)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("languages").about("List registered languages and their code tags as JSON"),
        )
}

/// Arguments with `format` inserted when the first one names an input rather
/// than a subcommand.
fn inject_default_subcommand(args: &[String]) -> Option<Vec<String>> {
    let first = args.get(1)?;
    if (first.starts_with('-') && first != "-") || SUBCOMMANDS.contains(&first.as_str()) {
        return None;
    }
    let mut new_args = vec![args[0].clone(), "format".to_string()];
    new_args.extend_from_slice(&args[1..]);
    Some(new_args)
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&args) {
        Ok(m) => m,
        Err(e) => match inject_default_subcommand(&args) {
            Some(new_args) => match cli.try_get_matches_from(&new_args) {
                Ok(m) => m,
                Err(e2) => e2.exit(),
            },
            None => e.exit(),
        },
    };

    let level = matches
        .get_one::<LogLevel>("log-level")
        .copied()
        .unwrap_or(LogLevel::Warn);
    logger::init(level.into());

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));

    match matches.subcommand() {
        Some(("format", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            apply_format_flags(&mut config, sub_matches);
            handle_format_command(
                input,
                output,
                sub_matches.get_flag("raw"),
                sub_matches.get_flag("xhtml"),
                &config,
            );
        }
        Some(("colorize", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let lang = sub_matches
                .get_one::<String>("lang")
                .expect("lang is required");
            handle_colorize_command(input, lang);
        }
        Some(("languages", _)) => {
            handle_languages_command();
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// Handle the format command
fn handle_format_command(
    input: &str,
    output: Option<&str>,
    raw: bool,
    xhtml: bool,
    config: &RsdnConfig,
) {
    let source = read_input(input);

    let html = if xhtml {
        to_xhtml(&source)
    } else {
        let formatter = TextFormatter::new(shared_registry(), (&config.formatter).into());
        let options = FormatOptions {
            raw,
            ..FormatOptions::from(&config.formatter)
        };
        let host = RequestContext::from(&config.host);
        debug!("formatting with {options:?}, secure: {}", config.host.secure);
        formatter.format_for(&source, options, &host)
    };
    info!("formatted {} bytes into {} bytes", source.len(), html.len());

    write_output(output, &html);
}

/// Handle the colorize command
fn handle_colorize_command(input: &str, lang: &str) {
    let source = read_input(input);
    let registry = shared_registry();

    // Grammars match against escaped code, the same as inside [code] blocks.
    let code = escape_html(&source);
    let html = match registry.resolve_tag(lang) {
        Some(CodeLanguage::Colored(language)) => language.colorizer().render(&code),
        Some(CodeLanguage::Plain) => code,
        None => registry.markup_code(lang, &code).unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }),
    };

    write_output(None, &html);
}

/// Handle the languages command
fn handle_languages_command() {
    let registry = shared_registry();
    let json = serde_json::to_string_pretty(&registry.summaries()).unwrap_or_else(|e| {
        eprintln!("Serialization error: {e}");
        std::process::exit(1);
    });
    println!("{json}");
}

fn shared_registry() -> Arc<LanguageRegistry> {
    LanguageRegistry::shared().unwrap_or_else(|e| {
        eprintln!("Failed to load grammars: {e}");
        std::process::exit(1);
    })
}

fn read_input(input: &str) -> String {
    if input == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source).unwrap_or_else(|e| {
            eprintln!("Error reading stdin: {e}");
            std::process::exit(1);
        });
        return source;
    }
    fs::read_to_string(input).unwrap_or_else(|e| {
        eprintln!("Error reading file '{input}': {e}");
        std::process::exit(1);
    })
}

fn write_output(output: Option<&str>, text: &str) {
    match output {
        Some(path) => {
            fs::write(path, text).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => println!("{text}"),
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> RsdnConfig {
    let loader = Loader::new().with_optional_file("rsdn.toml");
    let loader = if let Some(path) = explicit_path {
        debug!("loading configuration from {path}");
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn apply_format_flags(config: &mut RsdnConfig, matches: &ArgMatches) {
    if matches.get_flag("no-smiles") {
        config.formatter.smiles = false;
    }
    if matches.get_flag("explicit-links-only") {
        config.formatter.implicit_links = false;
    }
    if matches.get_flag("secure") {
        config.host.secure = true;
    }
}
