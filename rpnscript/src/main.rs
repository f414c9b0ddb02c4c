//! rpnscript CLI

use clap::{Parser, Subcommand};
use rpnscript::config::{BlockMatching, Config, DEFAULT_MAX_CALL_DEPTH, DEFAULT_PROMPT};
use rpnscript::error::report_error;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rpnscript", version, about = "rpnscript - line-oriented RPN scripting language")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a script
    Run {
        /// Script file to run
        file: PathBuf,
        /// Match nested while/if blocks by depth instead of first keyword
        #[arg(long)]
        nested_blocks: bool,
        /// Maximum function call depth
        #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
        max_depth: usize,
        /// Prompt shown by `input`
        #[arg(long, default_value = DEFAULT_PROMPT)]
        prompt: String,
    },
    /// Tokenize and dump statement lines (debug)
    Tokens {
        /// Script file to tokenize
        file: PathBuf,
    },
    /// Classify statements and dump them as JSON (debug)
    Parse {
        /// Script file to parse
        file: PathBuf,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let (file, result) = match cli.command {
        Command::Run {
            file,
            nested_blocks,
            max_depth,
            prompt,
        } => {
            let config = Config {
                prompt,
                max_call_depth: max_depth,
                block_matching: if nested_blocks {
                    BlockMatching::Nested
                } else {
                    BlockMatching::Legacy
                },
            };
            let result = run_file(&file, config);
            (file, result)
        }
        Command::Tokens { file } => {
            let result = tokenize_file(&file);
            (file, result)
        }
        Command::Parse { file } => {
            let result = parse_file(&file);
            (file, result)
        }
    };

    if let Err(e) = result {
        let filename = file.display().to_string();
        match std::fs::read_to_string(&file) {
            Ok(source) => report_error(&filename, &source, &e),
            Err(_) => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }
}

/// Log to stderr, only when RUST_LOG is set
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn run_file(path: &Path, config: Config) -> rpnscript::Result<()> {
    let source = std::fs::read_to_string(path)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    rpnscript::run(&source, stdin.lock(), stdout.lock(), config)
}

fn tokenize_file(path: &Path) -> rpnscript::Result<()> {
    let source = std::fs::read_to_string(path)?;

    let lines = rpnscript::lexer::tokenize(&source)?;
    for line in &lines {
        println!("{:>4} {:?} @ {}", line.number, line.tokens, line.span);
    }

    Ok(())
}

fn parse_file(path: &Path) -> rpnscript::Result<()> {
    let source = std::fs::read_to_string(path)?;

    let lines = rpnscript::lexer::tokenize(&source)?;
    let program = rpnscript::parser::parse(&lines);
    let json = serde_json::to_string_pretty(&program)
        .map_err(|e| rpnscript::ScriptError::io(e.to_string()))?;
    println!("{json}");

    Ok(())
}
