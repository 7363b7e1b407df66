use crate::config::Config;
use crate::error::Result;
use crate::evaluator::Evaluator;
use crate::value::Value;

/// Batch mode: evaluates a whole source file once.
///
/// `args` are bound as a list of strings under `config.args_binding` before
/// evaluation starts. Diagnostics have already been reported when this
/// returns an error.
pub fn run(source: &str, filename: Option<&str>, args: Vec<String>, config: Config) -> Result<Value> {
    let mut evaluator = Evaluator::with_config(config);
    evaluator.set_filename(filename);
    evaluator.bind_args(args);

    tracing::debug!(file = filename.unwrap_or("<stdin>"), "running script");
    evaluator.run_source(source)
}
