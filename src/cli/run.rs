//! Execute tkpath commands against JSON input

use super::{CliError, json_to_value, value_to_json};
use crate::{Engine, FindMode, Options, Value};

/// What the command should do
#[derive(Debug, Clone)]
pub enum Action {
    /// Read the value at a path
    Get { path: String, args: Vec<String> },
    /// Assign a JSON value at a path
    Set {
        path: String,
        value: String,
        args: Vec<String>,
    },
    /// Locate a JSON value
    Find { value: String, all: bool },
    /// Validate a path without evaluating it
    Check { path: String },
    /// Show the token tree of a path
    Tokens { path: String },
    /// Escape text so it reads as one literal key
    Escape { text: String },
}

/// Options for one command invocation
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub action: Action,
    /// JSON input document
    pub input: Option<String>,
    /// Engine options as JSON text
    pub config: Option<String>,
    /// Create missing intermediate maps on `set`
    pub auto_vivify: bool,
}

/// Result of a command
#[derive(Debug)]
pub enum RunResult {
    /// Structured output to print as JSON
    Json(serde_json::Value),
    /// Plain text output
    Text(String),
}

/// Positional arguments are JSON when they parse as JSON, strings otherwise
fn parse_arg(arg: &str) -> Value {
    serde_json::from_str(arg)
        .map(json_to_value)
        .unwrap_or_else(|_| Value::String(arg.to_string()))
}

fn parse_args(args: &[String]) -> Vec<Value> {
    args.iter().map(|a| parse_arg(a)).collect()
}

fn build_engine(options: &RunOptions) -> Result<Engine, CliError> {
    let mut engine_options: Options = match &options.config {
        Some(text) => serde_json::from_str(text)?,
        None => Options::default(),
    };
    if options.auto_vivify {
        engine_options.auto_vivify = Some(true);
    }
    Ok(Engine::with_options(&engine_options)?)
}

fn read_document(options: &RunOptions) -> Result<Value, CliError> {
    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let json_value: serde_json::Value = serde_json::from_str(json_str)?;
    Ok(json_to_value(json_value))
}

/// Execute a tkpath command
pub fn execute(options: &RunOptions) -> Result<RunResult, CliError> {
    let engine = build_engine(options)?;

    match &options.action {
        Action::Check { path } => {
            engine.try_tokenize(path)?;
            Ok(RunResult::Text("Path is valid".to_string()))
        }
        Action::Tokens { path } => {
            let tree = engine.try_tokenize(path)?;
            Ok(RunResult::Text(format!("{:#?}", tree)))
        }
        Action::Escape { text } => Ok(RunResult::Text(engine.escape(text))),
        Action::Get { path, args } => {
            let document = read_document(options)?;
            let result = engine.try_get(&document, path, &parse_args(args))?;
            Ok(RunResult::Json(value_to_json(&result)))
        }
        Action::Set { path, value, args } => {
            let document = read_document(options)?;
            let value = json_to_value(serde_json::from_str(value)?);
            engine.try_set(&document, path, value, &parse_args(args))?;
            Ok(RunResult::Json(value_to_json(&document)))
        }
        Action::Find { value, all } => {
            let document = read_document(options)?;
            let target = json_to_value(serde_json::from_str(value)?);
            let mode = if *all { FindMode::Many } else { FindMode::One };
            let paths = engine.find(&document, &target, mode).ok_or(CliError::NotFound)?;
            Ok(RunResult::Json(serde_json::Value::from(paths)))
        }
    }
}
