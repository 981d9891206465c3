//! CLI argument parsing for Portolan
//!
//! Defines the Command enum and parse_args() function for all CLI commands.

use anyhow::Result;
use portolan::{Language, OutputFormat};
use std::path::PathBuf;

pub fn print_usage() {
    eprintln!("Portolan - Call-graph reachability tool for code auditing");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  portolan <command> [arguments]");
    eprintln!("  portolan --help");
    eprintln!();
    eprintln!("  portolan index --project <DIR> [--force]");
    eprintln!("  portolan build --project <DIR> [--language c|java|python] [--overrides <FILE>] [--force]");
    eprintln!("  portolan show --project <DIR> [--no-auto-build]");
    eprintln!("  portolan callees --project <DIR> --function <NAME> [--no-auto-build]");
    eprintln!("  portolan callers --project <DIR> --function <NAME> [--no-auto-build]");
    eprintln!("  portolan find --project <DIR> --source <FN> --target <FN> [--max-depth <N>] [--language <LANG>] [--overrides <FILE>] [--no-annotate]");
    eprintln!("  portolan lookup --project <DIR> --symbol <NAME> [--kind definitions|references|both]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  index     Create or refresh the symbol index");
    eprintln!("  build     Build the call graph (served from cache when current)");
    eprintln!("  show      Dump the full call graph");
    eprintln!("  callees   List direct callees of a function");
    eprintln!("  callers   List direct callers of a function");
    eprintln!("  find      Enumerate call paths from a source to a target function");
    eprintln!("  lookup    Look up definitions/references for a symbol");
    eprintln!();
    eprintln!("Global arguments:");
    eprintln!("  --output <FORMAT>   Output format: human (default), json (compact), or pretty (formatted)");
    eprintln!();
    eprintln!("Index arguments:");
    eprintln!("  --project <DIR>     Path to the project root");
    eprintln!("  --force             Rebuild the index even if it exists");
    eprintln!();
    eprintln!("Build arguments:");
    eprintln!("  --project <DIR>     Path to the project root");
    eprintln!("  --language <LANG>   Language hint: c, java, or python (auto-detected if omitted)");
    eprintln!("  --overrides <FILE>  Manual override edges (JSON: caller -> [callees])");
    eprintln!("  --force             Rebuild even if the cached graph is current");
    eprintln!();
    eprintln!("Show/callees/callers arguments:");
    eprintln!("  --project <DIR>     Path to the project root");
    eprintln!("  --function <NAME>   Function to query (callees/callers)");
    eprintln!("  --no-auto-build     Fail if no current graph exists instead of building one");
    eprintln!();
    eprintln!("Find arguments:");
    eprintln!("  --project <DIR>     Path to the project root");
    eprintln!("  --source <FN>       Starting function name");
    eprintln!("  --target <FN>       Target function name");
    eprintln!("  --max-depth <N>     Maximum hops per path (default: 10)");
    eprintln!("  --language <LANG>   Language hint (auto-detected if omitted)");
    eprintln!("  --overrides <FILE>  Manual override edges (JSON)");
    eprintln!("  --no-annotate       Skip call-site annotation of hops");
    eprintln!();
    eprintln!("Lookup arguments:");
    eprintln!("  --project <DIR>     Path to the project root");
    eprintln!("  --symbol <NAME>     Symbol to look up");
    eprintln!("  --kind <KIND>       definitions, references, or both (default: both)");
}

/// Which locations the lookup command reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Definitions,
    References,
    Both,
}

impl LookupKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "definitions" | "defs" => Some(LookupKind::Definitions),
            "references" | "refs" => Some(LookupKind::References),
            "both" => Some(LookupKind::Both),
            _ => None,
        }
    }
}

pub enum Command {
    Index {
        project_dir: PathBuf,
        force: bool,
        output_format: OutputFormat,
    },
    Build {
        project_dir: PathBuf,
        language: Option<Language>,
        overrides: Option<PathBuf>,
        force: bool,
        output_format: OutputFormat,
    },
    Show {
        project_dir: PathBuf,
        auto_build: bool,
        output_format: OutputFormat,
    },
    Callees {
        project_dir: PathBuf,
        function: String,
        auto_build: bool,
        output_format: OutputFormat,
    },
    Callers {
        project_dir: PathBuf,
        function: String,
        auto_build: bool,
        output_format: OutputFormat,
    },
    Find {
        project_dir: PathBuf,
        source: String,
        target: String,
        max_depth: usize,
        language: Option<Language>,
        overrides: Option<PathBuf>,
        annotate: bool,
        output_format: OutputFormat,
    },
    Lookup {
        project_dir: PathBuf,
        symbol: String,
        kind: LookupKind,
        output_format: OutputFormat,
    },
}

/// Parse CLI arguments into a Command
///
/// For the --version and -V flags, it prints the version and exits.
/// For the --help and -h flags, it prints usage and exits.
///
/// The version display is handled via a closure passed in to avoid
/// circular dependencies with the version module.
pub fn parse_args_impl<F>(print_version: F) -> Result<Command>
where
    F: FnOnce(),
{
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        return Err(anyhow::anyhow!("Missing command"));
    }

    let command = &args[1];

    // Handle --version and -V flags
    if command == "--version" || command == "-V" {
        print_version();
        std::process::exit(0);
    }

    // Handle --help and -h flags
    if command == "--help" || command == "-h" {
        print_usage();
        std::process::exit(0);
    }

    match command.as_str() {
        "index" => {
            let mut project_dir: Option<PathBuf> = None;
            let mut force = false;
            let mut output_format = OutputFormat::Human;

            let mut i = 2;
            while i < args.len() {
                match args[i].as_str() {
                    "--project" => {
                        project_dir = Some(PathBuf::from(required_value(&args, i, "--project")?));
                        i += 2;
                    }
                    "--force" => {
                        force = true;
                        i += 1;
                    }
                    "--output" => {
                        output_format = parse_output(&args, i)?;
                        i += 2;
                    }
                    _ => return Err(anyhow::anyhow!("Unknown argument: {}", args[i])),
                }
            }

            Ok(Command::Index {
                project_dir: require(project_dir, "--project")?,
                force,
                output_format,
            })
        }
        "build" => {
            let mut project_dir: Option<PathBuf> = None;
            let mut language: Option<Language> = None;
            let mut overrides: Option<PathBuf> = None;
            let mut force = false;
            let mut output_format = OutputFormat::Human;

            let mut i = 2;
            while i < args.len() {
                match args[i].as_str() {
                    "--project" => {
                        project_dir = Some(PathBuf::from(required_value(&args, i, "--project")?));
                        i += 2;
                    }
                    "--language" => {
                        language = Some(parse_language(&args, i)?);
                        i += 2;
                    }
                    "--overrides" => {
                        overrides = Some(PathBuf::from(required_value(&args, i, "--overrides")?));
                        i += 2;
                    }
                    "--force" => {
                        force = true;
                        i += 1;
                    }
                    "--output" => {
                        output_format = parse_output(&args, i)?;
                        i += 2;
                    }
                    _ => return Err(anyhow::anyhow!("Unknown argument: {}", args[i])),
                }
            }

            Ok(Command::Build {
                project_dir: require(project_dir, "--project")?,
                language,
                overrides,
                force,
                output_format,
            })
        }
        "show" => {
            let mut project_dir: Option<PathBuf> = None;
            let mut auto_build = true;
            let mut output_format = OutputFormat::Human;

            let mut i = 2;
            while i < args.len() {
                match args[i].as_str() {
                    "--project" => {
                        project_dir = Some(PathBuf::from(required_value(&args, i, "--project")?));
                        i += 2;
                    }
                    "--no-auto-build" => {
                        auto_build = false;
                        i += 1;
                    }
                    "--output" => {
                        output_format = parse_output(&args, i)?;
                        i += 2;
                    }
                    _ => return Err(anyhow::anyhow!("Unknown argument: {}", args[i])),
                }
            }

            Ok(Command::Show {
                project_dir: require(project_dir, "--project")?,
                auto_build,
                output_format,
            })
        }
        "callees" | "callers" => {
            let mut project_dir: Option<PathBuf> = None;
            let mut function: Option<String> = None;
            let mut auto_build = true;
            let mut output_format = OutputFormat::Human;

            let mut i = 2;
            while i < args.len() {
                match args[i].as_str() {
                    "--project" => {
                        project_dir = Some(PathBuf::from(required_value(&args, i, "--project")?));
                        i += 2;
                    }
                    "--function" => {
                        function = Some(required_value(&args, i, "--function")?.to_string());
                        i += 2;
                    }
                    "--no-auto-build" => {
                        auto_build = false;
                        i += 1;
                    }
                    "--output" => {
                        output_format = parse_output(&args, i)?;
                        i += 2;
                    }
                    _ => return Err(anyhow::anyhow!("Unknown argument: {}", args[i])),
                }
            }

            let project_dir = require(project_dir, "--project")?;
            let function = require(function, "--function")?;
            if command == "callees" {
                Ok(Command::Callees {
                    project_dir,
                    function,
                    auto_build,
                    output_format,
                })
            } else {
                Ok(Command::Callers {
                    project_dir,
                    function,
                    auto_build,
                    output_format,
                })
            }
        }
        "find" => {
            let mut project_dir: Option<PathBuf> = None;
            let mut source: Option<String> = None;
            let mut target: Option<String> = None;
            let mut max_depth: usize = portolan::DEFAULT_MAX_DEPTH;
            let mut language: Option<Language> = None;
            let mut overrides: Option<PathBuf> = None;
            let mut annotate = true;
            let mut output_format = OutputFormat::Human;

            let mut i = 2;
            while i < args.len() {
                match args[i].as_str() {
                    "--project" => {
                        project_dir = Some(PathBuf::from(required_value(&args, i, "--project")?));
                        i += 2;
                    }
                    "--source" => {
                        source = Some(required_value(&args, i, "--source")?.to_string());
                        i += 2;
                    }
                    "--target" => {
                        target = Some(required_value(&args, i, "--target")?.to_string());
                        i += 2;
                    }
                    "--max-depth" => {
                        max_depth = required_value(&args, i, "--max-depth")?.parse()?;
                        i += 2;
                    }
                    "--language" => {
                        language = Some(parse_language(&args, i)?);
                        i += 2;
                    }
                    "--overrides" => {
                        overrides = Some(PathBuf::from(required_value(&args, i, "--overrides")?));
                        i += 2;
                    }
                    "--no-annotate" => {
                        annotate = false;
                        i += 1;
                    }
                    "--output" => {
                        output_format = parse_output(&args, i)?;
                        i += 2;
                    }
                    _ => return Err(anyhow::anyhow!("Unknown argument: {}", args[i])),
                }
            }

            Ok(Command::Find {
                project_dir: require(project_dir, "--project")?,
                source: require(source, "--source")?,
                target: require(target, "--target")?,
                max_depth,
                language,
                overrides,
                annotate,
                output_format,
            })
        }
        "lookup" => {
            let mut project_dir: Option<PathBuf> = None;
            let mut symbol: Option<String> = None;
            let mut kind = LookupKind::Both;
            let mut output_format = OutputFormat::Human;

            let mut i = 2;
            while i < args.len() {
                match args[i].as_str() {
                    "--project" => {
                        project_dir = Some(PathBuf::from(required_value(&args, i, "--project")?));
                        i += 2;
                    }
                    "--symbol" => {
                        symbol = Some(required_value(&args, i, "--symbol")?.to_string());
                        i += 2;
                    }
                    "--kind" => {
                        let value = required_value(&args, i, "--kind")?;
                        kind = LookupKind::from_str(value).ok_or_else(|| {
                            anyhow::anyhow!(
                                "Invalid kind: {}. Must be definitions, references, or both",
                                value
                            )
                        })?;
                        i += 2;
                    }
                    "--output" => {
                        output_format = parse_output(&args, i)?;
                        i += 2;
                    }
                    _ => return Err(anyhow::anyhow!("Unknown argument: {}", args[i])),
                }
            }

            Ok(Command::Lookup {
                project_dir: require(project_dir, "--project")?,
                symbol: require(symbol, "--symbol")?,
                kind,
                output_format,
            })
        }
        _ => Err(anyhow::anyhow!("Unknown command: {}", command)),
    }
}

fn required_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i + 1)
        .map(|s| s.as_str())
        .ok_or_else(|| anyhow::anyhow!("{} requires an argument", flag))
}

fn require<T>(value: Option<T>, flag: &str) -> Result<T> {
    value.ok_or_else(|| anyhow::anyhow!("{} is required", flag))
}

fn parse_output(args: &[String], i: usize) -> Result<OutputFormat> {
    let value = required_value(args, i, "--output")?;
    OutputFormat::from_str(value).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid output format: {}. Must be human, json, or pretty",
            value
        )
    })
}

fn parse_language(args: &[String], i: usize) -> Result<Language> {
    let value = required_value(args, i, "--language")?;
    Language::from_str(value)
        .ok_or_else(|| anyhow::anyhow!("Invalid language: {}. Must be c, java, or python", value))
}
