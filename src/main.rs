//! swagify - Command-line tool for generating OpenAPI documents from directive comments.
//!
//! # Usage
//!
//! ```bash
//! swagify [OPTIONS] [PROJECT_PATH]
//! ```
//!
//! # Examples
//!
//! Write `swagger.yaml` into the project directory:
//! ```bash
//! swagify ./my-api-project
//! ```
//!
//! Generate JSON with camelCase property names:
//! ```bash
//! swagify ./my-api-project -f json --alt-field-format camelCase -o openapi.json
//! ```
//!
//! Fail on references without a target:
//! ```bash
//! swagify ./my-api-project --strict-refs
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use swagify::cli;

fn main() -> Result<()> {
    // Parse once to read the verbose flag, then validate after the logger is up
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("swagify starting...");

    let args = cli::parse_args_from_parsed(args)?;

    cli::run(args)?;

    info!("OpenAPI document generation completed successfully");

    Ok(())
}
