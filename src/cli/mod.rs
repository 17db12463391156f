//! CLI module for FluxTogether
//!
//! # Commands
//!
//! - `serve` - Start the generation proxy
//! - `generate` - Generate one image through a running proxy and save it
//! - `console` - Interactive generation session with history
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Start the proxy (reads TOGETHER_API_KEY)
//! fluxtogether serve
//!
//! # Generate an image with consistency mode on
//! fluxtogether generate "a red fox in the snow" --consistent --steps 4
//! ```

pub mod completions;
pub mod config;
pub mod console;
pub mod generate;
pub mod output;
pub mod serve;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::config::FluxConfig;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// FluxTogether - real-time text-to-image generation
#[derive(Parser, Debug)]
#[command(
    name = "fluxtogether",
    version,
    about = "Text-to-image generation proxy and console"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the generation proxy server
    Serve(ServeArgs),
    /// Generate a single image through a running proxy
    Generate(GenerateArgs),
    /// Interactive generation console
    Console(ConsoleArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "fluxtogether.toml")]
    pub config: PathBuf,

    /// Override server port
    #[arg(short, long, env = "FLUX_PORT")]
    pub port: Option<u16>,

    /// Override server host
    #[arg(short = 'H', long, env = "FLUX_HOST")]
    pub host: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "FLUX_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Description of the image to generate
    pub prompt: String,

    /// Image width in pixels (512-1024)
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels (512-1024)
    #[arg(long)]
    pub height: Option<u32>,

    /// Sampling steps (1-4)
    #[arg(short, long)]
    pub steps: Option<u32>,

    /// Consistency mode: reuse a fixed seed
    #[arg(long)]
    pub consistent: bool,

    /// Base URL of the generation proxy
    #[arg(long, env = "FLUX_PROXY_URL")]
    pub proxy_url: Option<String>,

    /// Directory to save the image into
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Do not save the image
    #[arg(long)]
    pub no_save: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "fluxtogether.toml")]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct ConsoleArgs {
    /// Base URL of the generation proxy
    #[arg(long, env = "FLUX_PROXY_URL")]
    pub proxy_url: Option<String>,

    /// Directory downloads are saved into
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, default_value = "fluxtogether.toml")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "fluxtogether.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load config (file if present, then `FLUX_*` overrides) and validate it.
pub fn load_config(path: &Path) -> Result<FluxConfig, Box<dyn std::error::Error>> {
    let config = FluxConfig::load_or_default(path)?.with_env_overrides();
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["fluxtogether", "serve"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.config, PathBuf::from("fluxtogether.toml"));
                assert!(args.port.is_none());
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parse_serve_with_port() {
        let cli = Cli::try_parse_from(["fluxtogether", "serve", "-p", "9000"]).unwrap();
        match cli.command {
            Commands::Serve(args) => assert_eq!(args.port, Some(9000)),
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parse_generate() {
        let cli = Cli::try_parse_from([
            "fluxtogether",
            "generate",
            "a red fox",
            "--width",
            "512",
            "-s",
            "4",
            "--consistent",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.prompt, "a red fox");
                assert_eq!(args.width, Some(512));
                assert_eq!(args.height, None);
                assert_eq!(args.steps, Some(4));
                assert!(args.consistent);
                assert!(!args.no_save);
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_cli_generate_requires_prompt() {
        assert!(Cli::try_parse_from(["fluxtogether", "generate"]).is_err());
    }

    #[test]
    fn test_cli_parse_console() {
        let cli = Cli::try_parse_from(["fluxtogether", "console", "-o", "/tmp/images"]).unwrap();
        match cli.command {
            Commands::Console(args) => assert_eq!(args.out, Some(PathBuf::from("/tmp/images"))),
            _ => panic!("Expected Console command"),
        }
    }

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let config = load_config(Path::new("/nonexistent/fluxtogether.toml")).unwrap();
        assert_eq!(config.provider.consistency_seed, 123);
    }
}
