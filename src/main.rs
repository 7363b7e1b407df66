use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::fs;
use std::path::Path;
use std::thread;
use tracing_subscriber::EnvFilter;
use zy::{repl, runner, Config};

/// Native stack for the interpreter thread.
const STACK_SIZE: usize = 512 * 1024 * 1024;

/// Depth limit when `--max-depth` is absent; sized for `STACK_SIZE`.
const MAX_DEPTH: usize = 20_000;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("zy")
        .about("A small functional language with curried functions and rebindable operators")
        .arg(
            Arg::new("file")
                .help("The script file to execute")
                .value_name("FILE")
                .index(1),
        )
        .arg(
            Arg::new("args")
                .help("Arguments passed to the script as the `args` list")
                .value_name("ARGS")
                .index(2)
                .num_args(0..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Start in interactive REPL mode")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .help("Maximum evaluation depth before aborting with a stack overflow [default: 20000]")
                .value_name("N")
                .value_parser(value_parser!(usize)),
        )
        .get_matches();

    let interpreter = thread::Builder::new()
        .name("zy".to_string())
        .stack_size(STACK_SIZE)
        .spawn(move || dispatch(&matches));

    let code = match interpreter {
        Ok(handle) => handle.join().unwrap_or(1),
        Err(e) => {
            eprintln!("Error starting interpreter thread: {}", e);
            1
        }
    };
    std::process::exit(code);
}

fn dispatch(matches: &ArgMatches) -> i32 {
    let max_depth = matches.get_one::<usize>("max-depth").copied().unwrap_or(MAX_DEPTH);
    let config = Config::default().with_max_depth(max_depth);

    match matches.get_one::<String>("file") {
        Some(file_path) if !matches.get_flag("interactive") => {
            let args = matches
                .get_many::<String>("args")
                .map(|values| values.cloned().collect())
                .unwrap_or_default();
            run_file(file_path, args, config)
        }
        _ => {
            repl::start(config);
            0
        }
    }
}

fn run_file(path: &str, args: Vec<String>, config: Config) -> i32 {
    let path = Path::new(path);

    if !path.exists() {
        eprintln!("Error: File '{}' not found", path.display());
        return 1;
    }

    match fs::read_to_string(path) {
        Ok(source) => {
            let filename = path.display().to_string();
            match runner::run(&source, Some(&filename), args, config) {
                Ok(_) => 0,
                Err(_) => 1,
            }
        }
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            1
        }
    }
}
