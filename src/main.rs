use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use codespan_reporting::term::{
    self,
    termcolor::{ColorChoice, StandardStream},
};

use ccfront::preprocess::{pretty_print, DEFAULT_EXPANSION_LIMIT};
use ccfront::unit::{Options, Outcome, TranslationUnit};
use ccfront::Source;

/// Preprocess C source and print the type of every expression statement
#[derive(Parser, Debug)]
#[command(name = "ccfront", version, about)]
struct Args {
    /// Only run the preprocessor and print its output
    #[arg(short = 'E')]
    preprocess_only: bool,

    /// Add a directory to the `#include "..."` search path
    #[arg(short = 'I', value_name = "DIR")]
    include_dirs: Vec<PathBuf>,

    /// How many macro expansions may be nested before giving up
    #[arg(long, value_name = "N", default_value_t = DEFAULT_EXPANSION_LIMIT)]
    expansion_limit: usize,

    /// Disable colored diagnostics
    #[arg(long)]
    no_color: bool,

    /// The file to compile
    file: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let code = match std::fs::read_to_string(&args.file) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("ccfront: cannot read {}: {}", args.file.display(), err);
            return ExitCode::FAILURE;
        }
    };
    let name = args.file.to_string_lossy().into_owned();
    let source = Source {
        code: code.into(),
        path: args.file.clone(),
    };
    let options = Options {
        search_path: args.include_dirs.clone(),
        expansion_limit: args.expansion_limit,
    };
    let unit = TranslationUnit::from_source(&name, source, options);

    let failed = if args.preprocess_only {
        let outcome = unit.preprocess();
        println!("{}", pretty_print(outcome.output.iter().copied()));
        report(&outcome, &args)
    } else {
        let outcome = unit.analyze();
        for expr in &outcome.output {
            println!("{}: {}", expr, expr.ctype);
        }
        report(&outcome, &args)
    };

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Print every diagnostic to stderr and return whether any of them was an error.
fn report<T>(outcome: &Outcome<T>, args: &Args) -> bool {
    let color = if args.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    let stream = StandardStream::stderr(color);
    let config = term::Config::default();

    for diagnostic in &outcome.diagnostics {
        let rendered = term::emit(
            &mut stream.lock(),
            &config,
            &outcome.files,
            &diagnostic.to_codespan(),
        );
        if let Err(err) = rendered {
            log::error!("could not render diagnostic {:?}: {}", diagnostic.kind, err);
        }
    }
    outcome.has_errors()
}
