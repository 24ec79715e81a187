use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use gatescript_sdk::{EngineConfig, ScriptEngine, ScriptEngineBuilder, SdkError};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

pub const EXIT_TRUE: u8 = 0;
pub const EXIT_FALSE: u8 = 1;
pub const EXIT_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "gatescript")]
#[command(about = "Expand and evaluate deployment action conditions")]
#[command(version)]
pub struct Cli {
    /// Path to a YAML config file (GATESCRIPT_* environment variables override it)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Define a fixed variable, NAME=VALUE (repeatable)
    #[arg(long = "set", value_name = "NAME=VALUE", global = true, value_parser = parse_assignment)]
    pub variables: Vec<(String, String)>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Expand $Variable$ and $Function(args)$ references
    Expand {
        /// Text to expand
        text: String,
    },

    /// Evaluate a condition; exits 0 when true, 1 when false, 2 on error
    Eval {
        /// Condition text, e.g. "('$Is64BitOperatingSystem$' == '1')"
        condition: String,

        /// Skip reference expansion
        #[arg(long)]
        raw: bool,
    },

    /// Parse a condition and print its canonical form
    Parse {
        /// Condition text
        condition: String,

        /// Skip reference expansion
        #[arg(long)]
        raw: bool,
    },

    /// List registered variables and their current values
    Variables,
}

fn parse_assignment(input: &str) -> Result<(String, String), String> {
    let (name, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", input))?;
    if name.is_empty() {
        return Err(format!("variable name is empty in '{}'", input));
    }
    Ok((name.to_string(), value.to_string()))
}

#[derive(Serialize)]
struct VerdictOutput<'a> {
    condition: &'a str,
    expanded: &'a str,
    result: bool,
}

#[derive(Serialize)]
struct ErrorOutput<'a> {
    condition: &'a str,
    expanded: &'a str,
    kind: String,
    message: String,
}

#[derive(Serialize)]
struct VariableOutput<'a> {
    name: &'a str,
    value: String,
}

pub fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => EngineConfig::new(),
    };
    let mut config = config.apply_env_overrides()?;
    for (name, value) in &cli.variables {
        config = config.with_variable(name.clone(), value.clone());
    }
    Ok(config)
}

pub fn build_engine(cli: &Cli) -> Result<ScriptEngine> {
    let config = load_config(cli)?;
    debug!("Using configuration: {:?}", config);
    Ok(ScriptEngineBuilder::new().with_config(config).build()?)
}

/// Run a command, returning the process exit code
pub fn execute(cli: Cli) -> Result<u8> {
    let engine = build_engine(&cli)?;

    match &cli.command {
        Commands::Expand { text } => {
            let expanded = engine.process(text);
            if cli.json {
                println!("{}", serde_json::json!({ "text": text, "expanded": expanded }));
            } else {
                println!("{}", expanded);
            }
            Ok(EXIT_TRUE)
        }
        Commands::Eval { condition, raw } => {
            let expanded = expand(&engine, condition, *raw);
            match engine.evaluate(&expanded) {
                Ok(result) => {
                    if cli.json {
                        let output = VerdictOutput {
                            condition,
                            expanded: &expanded,
                            result,
                        };
                        println!("{}", serde_json::to_string(&output)?);
                    } else {
                        println!("{}", result);
                    }
                    Ok(if result { EXIT_TRUE } else { EXIT_FALSE })
                }
                Err(e) => {
                    report_error(&cli, condition, &expanded, &e)?;
                    Ok(EXIT_ERROR)
                }
            }
        }
        Commands::Parse { condition, raw } => {
            let expanded = expand(&engine, condition, *raw);
            match engine.parse(&expanded) {
                Ok(group) => {
                    if cli.json {
                        println!("{}", serde_json::to_string_pretty(&group)?);
                    } else {
                        println!("{}", group);
                    }
                    Ok(EXIT_TRUE)
                }
                Err(e) => {
                    report_error(&cli, condition, &expanded, &e)?;
                    Ok(EXIT_ERROR)
                }
            }
        }
        Commands::Variables => {
            let registry = engine.registry();
            let variables: Vec<VariableOutput> = registry
                .variable_names()
                .into_iter()
                .map(|name| VariableOutput {
                    name,
                    value: registry.resolve_variable(name).unwrap_or_default(),
                })
                .collect();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&variables)?);
            } else {
                for variable in &variables {
                    println!("{}={}", variable.name, variable.value);
                }
            }
            Ok(EXIT_TRUE)
        }
    }
}

fn expand(engine: &ScriptEngine, condition: &str, raw: bool) -> String {
    if raw {
        condition.to_string()
    } else {
        engine.process(condition)
    }
}

fn report_error(cli: &Cli, condition: &str, expanded: &str, error: &SdkError) -> Result<()> {
    let kind = error
        .script_error_kind()
        .map(|kind| kind.to_string())
        .ok_or_else(|| anyhow!("{}", error))?;

    if cli.json {
        let output = ErrorOutput {
            condition,
            expanded,
            kind,
            message: error.to_string(),
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        eprintln!("{}: {}", kind, error);
    }
    Ok(())
}
