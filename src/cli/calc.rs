//! Calculator command
//!
//! Evaluates one expression, or runs an interactive loop until `q` or end of
//! input. In the loop, bad input is reported and the loop continues.

use std::io::{self, BufRead, Write};

use crate::calculator::{evaluate, format_result};
use crate::error::AssistantResult;

pub fn handle_calc_command(expression: Option<String>) -> AssistantResult<()> {
    match expression {
        Some(expression) => {
            let value = evaluate(&expression)?;
            println!("{}", format_result(value));
            Ok(())
        }
        None => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            run_repl(stdin.lock(), stdout.lock())
        }
    }
}

/// Read expressions line by line, writing one result or error per line
pub fn run_repl<R: BufRead, W: Write>(input: R, mut output: W) -> AssistantResult<()> {
    writeln!(output, "Enter an expression, or 'q' to quit.")?;

    let mut lines = input.lines();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let line = line?;
        let line = line.trim();

        if line.eq_ignore_ascii_case("q") {
            break;
        }
        if line.is_empty() {
            continue;
        }

        match evaluate(line) {
            Ok(value) => writeln!(output, "{}", format_result(value))?,
            Err(e) => writeln!(output, "Error: {}", e)?,
        }
    }

    Ok(())
}
