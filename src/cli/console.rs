//! Interactive console command
//!
//! A line-oriented front end over [`Console`]. Each input line is one user
//! action: editing a form field, triggering a generation, selecting a history
//! entry, toggling the enlarged view or downloading the selected image.

use crate::cli::output::{
    format_generation_line, format_history_json, format_history_table, format_status,
    history_views, GenerationView,
};
use crate::cli::{load_config, ConsoleArgs};
use crate::console::{
    Console, ConsoleError, GenerateOutcome, GenerationClient, HttpGenerationClient, IgnoreReason,
    QueryCache,
};
use crate::logging::init_tracing;
use colored::Colorize;
use std::path::Path;
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

const HELP: &str = "\
Commands:
  prompt <text>          set the prompt
  width <px>             set width (512-1024)
  height <px>            set height (512-1024)
  steps <n>              set sampling steps (1-4)
  consistency on|off     reuse a fixed seed across generations
  generate               generate an image from the current form
  history [json]         list generations in this session
  select <index>         show a previous generation and load its settings
  enlarge                toggle the enlarged view of the selected image
  close                  close the enlarged view
  download               save the selected image
  status                 show the current form
  help                   show this help
  quit                   leave the console";

/// One parsed console input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Prompt(String),
    Width(u32),
    Height(u32),
    Steps(u32),
    Consistency(bool),
    Generate,
    History { json: bool },
    Select(usize),
    Enlarge,
    Close,
    Download,
    Status,
    Help,
    Quit,
}

impl FromStr for ConsoleCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        fn number<T: FromStr>(verb: &str, value: &str) -> Result<T, String> {
            value
                .parse()
                .map_err(|_| format!("'{}' expects a number, got '{}'", verb, value))
        }

        match verb.to_lowercase().as_str() {
            "prompt" | "p" => Ok(ConsoleCommand::Prompt(rest.to_string())),
            "width" | "w" => number(verb, rest).map(ConsoleCommand::Width),
            "height" | "h" => number(verb, rest).map(ConsoleCommand::Height),
            "steps" | "s" => number(verb, rest).map(ConsoleCommand::Steps),
            "consistency" | "c" => match rest.to_lowercase().as_str() {
                "on" | "true" | "yes" => Ok(ConsoleCommand::Consistency(true)),
                "off" | "false" | "no" => Ok(ConsoleCommand::Consistency(false)),
                other => Err(format!("'consistency' expects on or off, got '{}'", other)),
            },
            "generate" | "g" => Ok(ConsoleCommand::Generate),
            "history" | "ls" => match rest {
                "" => Ok(ConsoleCommand::History { json: false }),
                "json" | "--json" => Ok(ConsoleCommand::History { json: true }),
                other => Err(format!("'history' takes no argument or 'json', got '{}'", other)),
            },
            "select" => number(verb, rest).map(ConsoleCommand::Select),
            "enlarge" => Ok(ConsoleCommand::Enlarge),
            "close" => Ok(ConsoleCommand::Close),
            "download" | "d" => Ok(ConsoleCommand::Download),
            "status" => Ok(ConsoleCommand::Status),
            "help" | "?" => Ok(ConsoleCommand::Help),
            "quit" | "exit" | "q" => Ok(ConsoleCommand::Quit),
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command '{}', try 'help'", other)),
        }
    }
}

/// What the loop should do after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue(String),
    Exit,
}

fn selected_line<C: QueryCache>(console: &Console<C>, index: usize) -> String {
    console
        .history()
        .get(index)
        .map(|g| format_generation_line(&GenerationView::new(index, g)))
        .unwrap_or_default()
}

/// Apply one command to the console and render the response.
pub async fn execute<C, G>(
    console: &mut Console<C>,
    client: &G,
    command: ConsoleCommand,
    download_dir: &Path,
) -> Flow
where
    C: QueryCache,
    G: GenerationClient + ?Sized,
{
    let message = match command {
        ConsoleCommand::Prompt(text) => {
            console.form_mut().prompt = text;
            "prompt set".to_string()
        }
        ConsoleCommand::Width(px) => {
            console.form_mut().width = px;
            format!("width = {}", px)
        }
        ConsoleCommand::Height(px) => {
            console.form_mut().height = px;
            format!("height = {}", px)
        }
        ConsoleCommand::Steps(n) => {
            console.form_mut().steps = n;
            format!("steps = {}", n)
        }
        ConsoleCommand::Consistency(on) => {
            console.form_mut().iterative_mode = on;
            format!("consistency {}", if on { "on" } else { "off" })
        }
        ConsoleCommand::Generate => match console.generate(client).await {
            Ok(GenerateOutcome::Generated(index)) => selected_line(console, index),
            Ok(GenerateOutcome::Cached(index)) => {
                format!("{} (cached)", selected_line(console, index))
            }
            Ok(GenerateOutcome::Ignored(IgnoreReason::BlankPrompt)) => {
                "enter a prompt first".yellow().to_string()
            }
            Ok(GenerateOutcome::Ignored(IgnoreReason::FetchInFlight)) => {
                "a generation is already running".yellow().to_string()
            }
            Err(e) => format!("{} {}", "⚠".red(), e),
        },
        ConsoleCommand::History { json: true } => {
            format_history_json(&history_views(console), console.active_index())
        }
        ConsoleCommand::History { json: false } => {
            if console.history().is_empty() {
                "no generations yet".to_string()
            } else {
                format_history_table(&history_views(console), console.active_index())
            }
        }
        ConsoleCommand::Select(index) => match console.select(index).map(|_| ()) {
            Ok(()) => selected_line(console, index),
            Err(e) => format!("{} {}", "⚠".red(), e),
        },
        ConsoleCommand::Enlarge => {
            if console.toggle_enlarged() {
                match console.active_generation() {
                    Some(g) => format!(
                        "enlarged view: {}x{} image, {} inference",
                        g.settings.width,
                        g.settings.height,
                        g.result
                            .inference_secs()
                            .map(|s| format!("{:.2}s", s))
                            .unwrap_or_else(|| "unknown".to_string())
                    ),
                    None => String::new(),
                }
            } else if console.active_generation().is_some() {
                "enlarged view closed".to_string()
            } else {
                "no image selected".to_string()
            }
        }
        ConsoleCommand::Close => {
            console.dismiss_enlarged();
            "enlarged view closed".to_string()
        }
        ConsoleCommand::Download => match console.download(download_dir) {
            Ok(path) => format!("saved to {}", path.display()),
            Err(ConsoleError::NoActiveImage) => "no image selected".to_string(),
            Err(e) => format!("{} {}", "⚠".red(), e),
        },
        ConsoleCommand::Status => format_status(console),
        ConsoleCommand::Help => HELP.to_string(),
        ConsoleCommand::Quit => return Flow::Exit,
    };

    Flow::Continue(message)
}

/// Handle `fluxtogether console`
pub async fn run_console(args: ConsoleArgs) -> Result<(), Box<dyn std::error::Error>> {
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

    let mut console = Console::new();
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(
            format!(
                "FluxTogether console → {} (type 'help')\n",
                client.endpoint()
            )
            .as_bytes(),
        )
        .await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<ConsoleCommand>() {
            Ok(command) => command,
            Err(e) => {
                stdout.write_all(format!("{}\n", e).as_bytes()).await?;
                continue;
            }
        };

        match execute(&mut console, &client, command, &download_dir).await {
            Flow::Continue(message) => {
                stdout.write_all(format!("{}\n", message).as_bytes()).await?;
            }
            Flow::Exit => break,
        }
    }

    Ok(())
}
