pub mod config;
pub mod generator;
pub mod resolver;
pub mod reverse;
pub mod rules;
pub mod scanner;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub use config::{Config, ConfigError};
pub use generator::{Options, create_css, create_css_with_options};
pub use reverse::get_config;
pub use rules::{Rule, RuleTable, default_table};
pub use scanner::{parse, parse_with_counts};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Build {
        config: String,
        out: Option<String>,
    },
    Parse {
        inputs: Vec<String>,
        ignore: Vec<String>,
        config: Option<String>,
        emit_config: Option<String>,
        strict: bool,
    },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    pub message: String,
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self {
            message: err.message,
        }
    }
}

impl From<scanner::ScanError> for CliError {
    fn from(err: scanner::ScanError) -> Self {
        Self {
            message: err.message,
        }
    }
}

pub fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Build { config, out } => run_build(config, out),
        Command::Parse {
            inputs,
            ignore,
            config,
            emit_config,
            strict,
        } => run_parse(inputs, ignore, config, emit_config, strict),
        Command::Help => {
            print_help();
            Ok(())
        }
    }
}

pub fn run_from_env() -> Result<(), CliError> {
    let command = parse_args(env::args().skip(1))?;
    run(command)
}

pub fn parse_args<I>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut iter = args.into_iter();
    let Some(cmd) = iter.next() else {
        return Ok(Command::Help);
    };

    match cmd.as_str() {
        "build" => parse_build_args(iter.collect()),
        "parse" => parse_parse_args(iter.collect()),
        "-h" | "--help" | "help" => Ok(Command::Help),
        _ => Err(CliError {
            message: format!("unknown command: {}", cmd),
        }),
    }
}

fn parse_build_args(args: Vec<String>) -> Result<Command, CliError> {
    let mut config = None;
    let mut out = None;
    let mut idx = 0;

    while idx < args.len() {
        match args[idx].as_str() {
            "--config" | "-c" => {
                idx += 1;
                if idx >= args.len() {
                    return Err(CliError {
                        message: "build requires a value for --config".to_string(),
                    });
                }
                config = Some(args[idx].clone());
            }
            "--out" | "--output" | "-o" => {
                idx += 1;
                if idx >= args.len() {
                    return Err(CliError {
                        message: "build requires a value for --output".to_string(),
                    });
                }
                out = Some(args[idx].clone());
            }
            other => {
                return Err(CliError {
                    message: format!("unknown build option: {}", other),
                });
            }
        }
        idx += 1;
    }

    let Some(config) = config else {
        return Err(CliError {
            message: "build requires --config <file>".to_string(),
        });
    };
    Ok(Command::Build { config, out })
}

fn parse_parse_args(args: Vec<String>) -> Result<Command, CliError> {
    let mut inputs = Vec::new();
    let mut ignore = Vec::new();
    let mut config = None;
    let mut emit_config = None;
    let mut strict = false;
    let mut idx = 0;

    while idx < args.len() {
        match args[idx].as_str() {
            "--ignore" => {
                idx += 1;
                if idx >= args.len() {
                    return Err(CliError {
                        message: "parse requires a value for --ignore".to_string(),
                    });
                }
                ignore.push(args[idx].clone());
            }
            "--config" | "-c" => {
                idx += 1;
                if idx >= args.len() {
                    return Err(CliError {
                        message: "parse requires a value for --config".to_string(),
                    });
                }
                config = Some(args[idx].clone());
            }
            "--emit-config" => {
                idx += 1;
                if idx >= args.len() {
                    return Err(CliError {
                        message: "parse requires a value for --emit-config".to_string(),
                    });
                }
                emit_config = Some(args[idx].clone());
            }
            "--strict" => strict = true,
            other => inputs.push(other.to_string()),
        }
        idx += 1;
    }

    if inputs.is_empty() {
        return Err(CliError {
            message: "parse requires at least one input pattern".to_string(),
        });
    }
    Ok(Command::Parse {
        inputs,
        ignore,
        config,
        emit_config,
        strict,
    })
}

fn run_build(config_path: String, out: Option<String>) -> Result<(), CliError> {
    let config = config::load(Path::new(&config_path))?;
    let css = create_css(&config)?;
    match out {
        Some(out) => {
            fs::write(&out, &css).map_err(|err| CliError {
                message: format!("failed to write {}: {}", out, err),
            })?;
            println!("wrote {}", out);
        }
        None => print!("{}", css),
    }
    Ok(())
}

fn run_parse(
    inputs: Vec<String>,
    ignore: Vec<String>,
    config_path: Option<String>,
    emit_config: Option<String>,
    strict: bool,
) -> Result<(), CliError> {
    let table = default_table();
    let base_path = PathBuf::from(".");
    let result = scanner::scan_paths(&inputs, &ignore, &base_path, table)?;

    for class in &result.classes {
        let count = result.counts.get(class).copied().unwrap_or(0);
        println!("{} {}", class, count);
    }
    println!(
        "{} classes in {} files",
        result.classes.len(),
        result.files_scanned
    );

    if let Some(emit_path) = emit_config {
        let base = match config_path {
            Some(path) => config::load(Path::new(&path))?,
            None => Config::default(),
        };
        let rebuilt = get_config(&result.classes, &base, strict, table)?;
        let text = toml::to_string_pretty(&rebuilt).map_err(|err| CliError {
            message: format!("failed to serialize config: {}", err),
        })?;
        fs::write(&emit_path, text).map_err(|err| CliError {
            message: format!("failed to write {}: {}", emit_path, err),
        })?;
        println!("wrote {}", emit_path);
    }
    Ok(())
}

fn print_help() {
    println!("atomicss - atomic CSS compiler");
    println!();
    println!("usage:");
    println!("  atomicss build --config <file.toml> [--out <file.css>]");
    println!("  atomicss parse <patterns...> [--ignore <glob>] [--config <file.toml>]");
    println!("                 [--emit-config <file.toml>] [--strict]");
    println!("  atomicss help");
}
