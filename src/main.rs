use std::process::ExitCode;

use clap::Parser;
use guidegram::cli::Cli;
use guidegram::error_handling::display_errors;
use guidegram::generator::{GenerateError, Generator};
use guidegram::grammar::Symbol;
use guidegram::{output, parser};
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum RunError {
    #[error("{}", display_errors(.0))]
    Compile(parser::CompileErrors),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error("Could not write inputs: {0}")]
    Output(#[from] std::io::Error),
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), RunError> {
    let mut grammar = parser::parse_file(&cli.file).map_err(RunError::Compile)?;
    if cli.coverage_grammar {
        let target = cli.target.as_deref().map(|id| Symbol::new(id));
        grammar = grammar.to_coverage_grammar(target.as_ref()).map_err(GenerateError::from)?;
    }

    let mut generator = Generator::new(&grammar, cli.guidance.build(), cli.config())?;
    let derivations = generator.generate_batch(cli.seeds(), cli.until_covered)?;

    for derivation in &derivations {
        println!("{}", derivation);
    }

    info!(
        "Generated {} inputs with {} guidance, {} symbols covered",
        derivations.len(),
        generator.guidance().name(),
        generator.coverage().len()
    );

    if let Some(dir) = &cli.output {
        output::write_inputs(dir, &derivations)?;
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
