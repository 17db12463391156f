//! Generate command implementation

use crate::cli::output::{format_generation_json, format_generation_line, GenerationView};
use crate::cli::{load_config, GenerateArgs};
use crate::console::{Console, GenerateOutcome, GenerationClient, HttpGenerationClient, IgnoreReason};
use crate::logging::init_tracing;

/// Copy CLI arguments onto the console form; unset values keep form defaults.
fn fill_form(console: &mut Console, args: &GenerateArgs) {
    let form = console.form_mut();
    form.prompt = args.prompt.clone();
    if let Some(width) = args.width {
        form.width = width;
    }
    if let Some(height) = args.height {
        form.height = height;
    }
    if let Some(steps) = args.steps {
        form.steps = steps;
    }
    form.iterative_mode = args.consistent;
}

/// Run one generation round against `client` and render the result.
pub async fn generate_with<G: GenerationClient + ?Sized>(
    args: &GenerateArgs,
    client: &G,
    download_dir: &std::path::Path,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut console = Console::new();
    fill_form(&mut console, args);

    let index = match console.generate(client).await? {
        GenerateOutcome::Generated(index) | GenerateOutcome::Cached(index) => index,
        GenerateOutcome::Ignored(IgnoreReason::BlankPrompt) => {
            return Err("Prompt must not be blank".into())
        }
        GenerateOutcome::Ignored(IgnoreReason::FetchInFlight) => {
            return Err("A generation is already in progress".into())
        }
    };

    let saved_to = if args.no_save {
        None
    } else {
        Some(console.download(download_dir)?)
    };

    let generation = console
        .active_generation()
        .ok_or("Generation was not recorded")?;
    let view = GenerationView::new(index, generation).with_saved_to(saved_to);

    Ok(if args.json {
        format_generation_json(&view)
    } else {
        format_generation_line(&view)
    })
}

/// Handle `fluxtogether generate`
pub async fn run_generate(args: GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(&args.config)?;
    if let Some(ref url) = args.proxy_url {
        config.console.proxy_url = url.clone();
    }
    init_tracing(&config.logging)?;

    let client = HttpGenerationClient::new(
        &config.console.proxy_url,
        config.console.request_timeout_seconds,
    )?;
    let download_dir = args
        .out
        .clone()
        .unwrap_or_else(|| config.console.download_dir.clone());

    let output = generate_with(&args, &client, &download_dir).await?;
    println!("{}", output);
    Ok(())
}
