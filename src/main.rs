//! Schema tool for the Flames database viewer
//!
//! Usage:
//!   flames-schemas                                  - print the discovery document
//!   flames-schemas json-schema <collection>         - print a collection's JSON Schema
//!   flames-schemas validate <collection> <file|->   - validate a JSON document

use anyhow::{anyhow, Context};
use flames_schemas::config::LogFormat;
use flames_schemas::{Config, SchemaRegistry};
use serde_json::{Map, Value};
use std::env;
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> anyhow::Result<ExitCode> {
    // Load environment from .env file if present
    let dotenv_result = dotenvy::dotenv();

    let config = Config::from_env()?;
    init_logging(config.log_format);

    if let Err(e) = dotenv_result {
        warn!("No .env file found or error loading it: {}", e);
    }

    let registry = SchemaRegistry::new(&config)?;
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("flames-schemas");

    match args.get(1).map(String::as_str) {
        None => {
            print_json(&registry.discovery())?;
            Ok(ExitCode::SUCCESS)
        }
        Some("json-schema") if args.len() == 3 => {
            let schema = registry.get_collection(&args[2])?;
            print_json(&schema.json_schema())?;
            Ok(ExitCode::SUCCESS)
        }
        Some("validate") if args.len() == 4 => validate_document(&registry, &args[2], &args[3]),
        _ => {
            print_usage(program);
            Ok(ExitCode::from(2))
        }
    }
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,flames_schemas=debug"));

    // Logs go to stderr; stdout carries the JSON output
    match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(io::stderr))
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(false)
                    .json()
                    .with_writer(io::stderr),
            )
            .init(),
    }

    debug!("Logging initialized ({:?})", format);
}

fn validate_document(registry: &SchemaRegistry, collection: &str, source: &str) -> anyhow::Result<ExitCode> {
    let raw = if source == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read document from stdin")?;
        buf
    } else {
        fs::read_to_string(source).with_context(|| format!("Failed to read document {}", source))?
    };

    let document: Map<String, Value> = match serde_json::from_str::<Value>(&raw)
        .with_context(|| format!("Document {} is not valid JSON", source))?
    {
        Value::Object(map) => map,
        other => return Err(anyhow!("Document must be a JSON object, got {}", other)),
    };

    match registry.validate(collection, &document) {
        Ok(validated) => {
            info!("Document valid for collection '{}'", collection);
            print_json(&validated)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            info!("Document rejected for collection '{}': {}", collection, e);
            print_json(&e.to_response())?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_usage(program: &str) {
    eprintln!("Usage:");
    eprintln!("  {}                                  - Print the discovery document", program);
    eprintln!("  {} json-schema <collection>         - Print a collection's JSON Schema", program);
    eprintln!("  {} validate <collection> <file|->   - Validate a JSON document", program);
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} json-schema lead", program);
    eprintln!("  echo '{{\"full_name\":\"Jo\",\"phone\":\"555-1234\"}}' | {} validate lead -", program);
}
