use clap::Parser;
use kestrel::cli::{generate_completions, Args, Commands};
use kestrel::config::AppConfig;
use kestrel::interpreter::{Interpreter, RunError};
use kestrel::{repl, Value};
use owo_colors::OwoColorize;
use std::io;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(Commands::Complete { shell }) = &args.command {
        generate_completions(*shell);
        return ExitCode::SUCCESS;
    }

    let config = AppConfig::from_args(&args);
    init_tracing(&config);

    let source = if let Some(source) = &args.eval {
        debug!("evaluating source from the command line");
        source.clone()
    } else if let Some(file) = &args.file {
        info!(path = %file.display(), "running script");
        match read_file(file) {
            Ok(source) => source,
            Err(e) => {
                error_message(&config, &e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        debug!("starting REPL");
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        return match repl::start(stdin.lock(), &mut stdout, &config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error_message(&config, &format!("Error reading input: {}", e));
                ExitCode::FAILURE
            }
        };
    };

    run_batch(&source, &config)
}

/// `RUST_LOG` wins; otherwise `--verbose` picks the directive.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_directive()));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_level(true)
                .with_ansi(config.color_enabled),
        )
        .with(filter)
        .init();
}

fn run_batch(source: &str, config: &AppConfig) -> ExitCode {
    match Interpreter::new().eval_source(source) {
        Ok(value @ Value::Error(_)) => {
            error_message(config, &value.to_string());
            ExitCode::FAILURE
        }
        Ok(value) => {
            println!("{}", value);
            ExitCode::SUCCESS
        }
        Err(RunError::Parse(errors)) => {
            for error in errors {
                error_message(config, &format!("parser error: {}", error));
            }
            ExitCode::FAILURE
        }
        Err(e @ RunError::Lex(_)) => {
            error_message(config, &e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

fn error_message(config: &AppConfig, message: &str) {
    if config.color_enabled {
        eprintln!("{}", message.red().bold());
    } else {
        eprintln!("{}", message);
    }
}
