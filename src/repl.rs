//! Line-at-a-time session driver.

use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};
use tracing::debug;

use crate::config::AppConfig;
use crate::interpreter::{parse, Interpreter};

pub const PROMPT: &str = ">> ";

pub fn greeting(user: Option<&str>) -> String {
    match user {
        Some(user) => format!("Hello {}! This is the Kestrel programming language!", user),
        None => "Hello! This is the Kestrel programming language!".to_string(),
    }
}

/// Reads lines from `input` until it is exhausted, evaluating each one in a
/// single session so bindings persist from line to line.
pub fn start<R: BufRead, W: Write>(input: R, output: &mut W, config: &AppConfig) -> io::Result<()> {
    if config.banner {
        writeln!(output, "{}", greeting(config.user.as_deref()))?;
        writeln!(output, "Feel free to type in commands!")?;
    }

    let interpreter = Interpreter::new();
    let mut lines = input.lines();
    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let result = match parse(&line) {
            Ok(result) => result,
            Err(error) => {
                print_error(output, config, &format!("parser error: {}", error))?;
                continue;
            }
        };
        if !result.is_ok() {
            debug!(count = result.errors.len(), "skipping line with parse errors");
            for error in &result.errors {
                print_error(output, config, &format!("parser error: {}", error))?;
            }
            continue;
        }

        let value = interpreter.run(&result.program);
        if value.is_error() {
            print_error(output, config, &value.to_string())?;
        } else {
            writeln!(output, "{}", value)?;
        }
    }
    writeln!(output)?;
    Ok(())
}

fn print_error<W: Write>(output: &mut W, config: &AppConfig, message: &str) -> io::Result<()> {
    if config.color_enabled {
        writeln!(output, "{}", message.red().bold())
    } else {
        writeln!(output, "{}", message)
    }
}
