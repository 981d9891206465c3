//! Portolan CLI - Call-graph reachability tool for code auditing
//!
//! Usage: portolan <command> [arguments]

mod build_cmd;
mod callees_cmd;
mod callers_cmd;
mod cli;
mod find_cmd;
mod index_cmd;
mod lookup_cmd;
mod show_cmd;

use std::process::ExitCode;

use cli::{parse_args_impl, print_usage, Command};
use portolan::version;

fn main() -> ExitCode {
    let command = match parse_args_impl(|| println!("{}", version::version())) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage();
            return ExitCode::from(1);
        }
    };

    let result = match command {
        Command::Index {
            project_dir,
            force,
            output_format,
        } => index_cmd::run_index(project_dir, force, output_format),
        Command::Build {
            project_dir,
            language,
            overrides,
            force,
            output_format,
        } => build_cmd::run_build(project_dir, language, overrides, force, output_format),
        Command::Show {
            project_dir,
            auto_build,
            output_format,
        } => show_cmd::run_show(project_dir, auto_build, output_format),
        Command::Callees {
            project_dir,
            function,
            auto_build,
            output_format,
        } => callees_cmd::run_callees(project_dir, function, auto_build, output_format),
        Command::Callers {
            project_dir,
            function,
            auto_build,
            output_format,
        } => callers_cmd::run_callers(project_dir, function, auto_build, output_format),
        Command::Find {
            project_dir,
            source,
            target,
            max_depth,
            language,
            overrides,
            annotate,
            output_format,
        } => find_cmd::run_find(
            project_dir,
            source,
            target,
            max_depth,
            language,
            overrides,
            annotate,
            output_format,
        ),
        Command::Lookup {
            project_dir,
            symbol,
            kind,
            output_format,
        } => lookup_cmd::run_lookup(project_dir, symbol, kind, output_format),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}
