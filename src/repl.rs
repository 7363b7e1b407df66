use crate::config::Config;
use crate::evaluator::Evaluator;
use std::io::{self, Write};

/// Interactive session: every line runs against the same globals, so
/// bindings accumulate from one line to the next.
pub fn start(config: Config) {
    println!("Zy Interpreter v{}", env!("CARGO_PKG_VERSION"));
    println!("Type 'exit' or press Ctrl+D to quit");
    println!();

    let mut evaluator = Evaluator::with_config(config);

    loop {
        print!("zy => ");
        if let Err(error) = io::stdout().flush() {
            tracing::warn!(%error, "failed to flush prompt");
        }

        // Lines come from the evaluator's own input so `read` and the
        // prompt share one buffer.
        let line = match evaluator.read_line() {
            Ok(Some(line)) => line,
            Ok(None) => {
                println!();
                break;
            }
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            println!("Goodbye!");
            break;
        }

        run_repl_command(line, &mut evaluator);
    }
}

fn run_repl_command(source: &str, evaluator: &mut Evaluator) {
    tracing::trace!(source, "repl line");
    match evaluator.run_source(source) {
        Ok(value) => println!("=> {}", value),
        // Already reported; only a depth-limit failure ends the session.
        Err(error) if error.ends_process() => std::process::exit(1),
        Err(_) => {}
    }
}
