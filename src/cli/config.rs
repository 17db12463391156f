//! Config command handlers

use crate::cli::ConfigInitArgs;
use crate::config::FluxConfig;
use std::fs;

const EXAMPLE_CONFIG: &str = include_str!("../../fluxtogether.example.toml");

/// Handle `fluxtogether config init`
pub fn handle_config_init(args: &ConfigInitArgs) -> Result<String, Box<dyn std::error::Error>> {
    if args.output.exists() && !args.force {
        return Err(format!(
            "File already exists: {}. Use --force to overwrite.",
            args.output.display()
        )
        .into());
    }

    fs::write(&args.output, EXAMPLE_CONFIG)?;

    Ok(format!(
        "✓ Configuration file created: {}\n  Set {} before running `fluxtogether serve`.",
        args.output.display(),
        FluxConfig::default().provider.api_key_env
    ))
}
