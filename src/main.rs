use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use tkpath::cli::{self, Action, CliError, RunOptions, RunResult};
use tracing::Level;

#[derive(Parser)]
#[command(name = "tkpath")]
#[command(about = "tkpath - read, write and search JSON documents with path expressions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON input (reads from stdin if not provided)
    #[arg(short, long, global = true)]
    input: Option<String>,

    /// Engine options as a JSON file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Pretty-print JSON output
    #[arg(short, long, global = true)]
    pretty: bool,

    /// Create missing intermediate maps when setting
    #[arg(long, global = true)]
    auto_vivify: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the value at a path
    Get {
        path: String,
        /// Positional arguments for % and @ modifiers (JSON or plain text)
        args: Vec<String>,
    },

    /// Assign a JSON value at a path and print the resulting document
    Set {
        path: String,
        /// New value as JSON
        value: String,
        args: Vec<String>,
    },

    /// Print the paths where a JSON value occurs
    Find {
        value: String,
        /// Report every occurrence, not only the first
        #[arg(short, long)]
        all: bool,
    },

    /// Validate path syntax
    Check { path: String },

    /// Show the token tree of a path
    Tokens { path: String },

    /// Escape text so it reads as a single literal key
    Escape { text: String },
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let needs_input = matches!(
        cli.command,
        Commands::Get { .. } | Commands::Set { .. } | Commands::Find { .. }
    );
    let input = match cli.input {
        Some(s) => Some(s),
        None if needs_input && !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };
    let config = cli.config.map(fs::read_to_string).transpose()?;

    let action = match cli.command {
        Commands::Get { path, args } => Action::Get { path, args },
        Commands::Set { path, value, args } => Action::Set { path, value, args },
        Commands::Find { value, all } => Action::Find { value, all },
        Commands::Check { path } => Action::Check { path },
        Commands::Tokens { path } => Action::Tokens { path },
        Commands::Escape { text } => Action::Escape { text },
    };

    let options = RunOptions {
        action,
        input,
        config,
        auto_vivify: cli.auto_vivify,
    };

    match cli::execute(&options)? {
        RunResult::Text(text) => println!("{}", text),
        RunResult::Json(output) => {
            let json = if cli.pretty {
                serde_json::to_string_pretty(&output)
            } else {
                serde_json::to_string(&output)
            }?;
            println!("{}", json);
        }
    }
    Ok(())
}
