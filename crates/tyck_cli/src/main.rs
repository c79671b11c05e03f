//! tyck: type check TypeScript sources from the command line.
//!
//! Usage:
//!   tyck [options] [file...]
//!
//! Without files or `-p`, a `tyck.json` in the current directory is used.
//! Exit status is 0 when no errors were found, 2 when type errors were
//! reported and 1 for usage, configuration or I/O failures.

mod logging;
mod render;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;

use clap::error::ErrorKind;
use clap::Parser as ClapParser;
use miette::{bail, IntoDiagnostic, WrapErr};
use tracing::{debug, error};
use tyck_options::CheckerOptions;
use tyck_program::Program;

const DEFAULT_PROJECT_FILE: &str = "tyck.json";

const EXIT_OK: i32 = 0;
const EXIT_USAGE: i32 = 1;
const EXIT_TYPE_ERRORS: i32 = 2;

#[derive(ClapParser, Debug)]
#[command(name = "tyck", version, about = "A TypeScript type checker")]
struct Cli {
    /// Files to check.
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Path to a tyck.json project file.
    #[arg(short = 'p', long = "project", value_name = "FILE")]
    project: Option<PathBuf>,

    /// Enable all strict checking options.
    #[arg(long)]
    strict: bool,

    /// Treat null and undefined as distinct types.
    #[arg(long = "strictNullChecks")]
    strict_null_checks: bool,

    /// Report parameters and variables that implicitly have type any.
    #[arg(long = "noImplicitAny")]
    no_implicit_any: bool,

    /// Print the name of every file that is part of the program.
    #[arg(long = "listFiles")]
    list_files: bool,

    /// Render diagnostics with source excerpts.
    #[arg(long)]
    pretty: bool,

    /// Log progress at debug level.
    #[arg(long)]
    verbose: bool,

    /// Number of worker threads used for parsing and binding.
    #[arg(long, value_name = "N")]
    threads: Option<usize>,
}

impl Cli {
    /// Options given on the command line. Unset flags leave the project
    /// file's values alone.
    fn option_overrides(&self) -> CheckerOptions {
        CheckerOptions {
            strict: self.strict.then_some(true),
            strict_null_checks: self.strict_null_checks.then_some(true),
            no_implicit_any: self.no_implicit_any.then_some(true),
            ..CheckerOptions::default()
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => EXIT_OK,
                _ => EXIT_USAGE,
            };
            let _ = err.print();
            process::exit(code);
        }
    };
    logging::init_tracing(cli.verbose);
    process::exit(run(&cli));
}

fn run(cli: &Cli) -> i32 {
    let program = match configure_threads(cli).and_then(|()| load_program(cli)) {
        Ok(program) => program,
        Err(err) => {
            eprintln!("{err:?}");
            return EXIT_USAGE;
        }
    };

    if cli.list_files {
        for name in program.file_names() {
            println!("{name}");
        }
    }

    let report = match program.check().into_diagnostic() {
        Ok(report) => report,
        Err(err) => {
            error!(%err, "check failed");
            eprintln!("{err:?}");
            return EXIT_USAGE;
        }
    };

    let color = std::io::stderr().is_terminal();
    for diagnostic in report.diagnostics() {
        if cli.pretty {
            eprintln!("{}", render::pretty(&report, diagnostic, color));
        } else {
            eprintln!("{}", render::plain(&report, diagnostic));
        }
    }

    let errors = report.error_count();
    if errors > 0 {
        eprintln!();
        eprintln!("{}", render::summary(errors));
        EXIT_TYPE_ERRORS
    } else {
        EXIT_OK
    }
}

fn configure_threads(cli: &Cli) -> miette::Result<()> {
    let Some(threads) = cli.threads else {
        return Ok(());
    };
    if threads == 0 {
        bail!("--threads must be at least 1");
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .into_diagnostic()
        .wrap_err("cannot start worker threads")
}

/// `-p` wins, then explicit files, then `tyck.json` in the working
/// directory. Command-line options are layered over the project's.
fn load_program(cli: &Cli) -> miette::Result<Program> {
    let mut program = if let Some(project) = &cli.project {
        let project = if project.is_dir() {
            project.join(DEFAULT_PROJECT_FILE)
        } else {
            project.clone()
        };
        debug!(project = %project.display(), "loading project");
        Program::from_config(&project).into_diagnostic()?
    } else if !cli.files.is_empty() {
        let mut program = Program::new(CheckerOptions::default());
        program.load_files(&cli.files).into_diagnostic()?;
        program
    } else if Path::new(DEFAULT_PROJECT_FILE).exists() {
        Program::from_config(DEFAULT_PROJECT_FILE).into_diagnostic()?
    } else {
        bail!("no input files");
    };
    let options = program.options().merge(&cli.option_overrides());
    program.set_options(options);
    Ok(program)
}
