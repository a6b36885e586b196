use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use simplelang::compiler::{self, Compiler, EXAMPLE_PROGRAM};
use simplelang::config::{Config, ConfigError, USAGE};

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(ConfigError::HelpRequested) => {
            println!("{USAGE}");
            return Ok(ExitCode::SUCCESS);
        }
        Err(err) => {
            eprintln!("{err}\n\n{USAGE}");
            return Ok(ExitCode::from(2));
        }
    };

    println!("SimpleLang Compiler for 8-bit CPU");
    println!("=================================");

    let source = match &config.input {
        Some(path) if path.as_os_str() == "-" => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Reading stdin")?;
            buffer
        }
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("Reading {}", path.display()))?;
            info!(path = %path.display(), "source code loaded");
            source
        }
        None => {
            info!("compiling example program");
            EXAMPLE_PROGRAM.to_string()
        }
    };

    let compilation = Compiler::new()
        .compile(&source)
        .context("Compilation error")?;
    if let Some(report) = compilation.parse_report() {
        eprintln!("{report}");
    }

    println!();
    println!("=== GENERATED ASSEMBLY ===");
    print!("{}", compilation.listing());

    compiler::write_listing(&config.output, &compilation.assembly)
        .with_context(|| format!("Writing {}", config.output.display()))?;
    info!(path = %config.output.display(), "assembly code saved");

    Ok(ExitCode::SUCCESS)
}
