use clap::Parser;
use fluxtogether::cli::{handle_completions, handle_config_init, Cli, Commands, ConfigCommands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => fluxtogether::cli::serve::run_serve(args).await,
        Commands::Generate(args) => fluxtogether::cli::generate::run_generate(args).await,
        Commands::Console(args) => fluxtogether::cli::console::run_console(args).await,
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args).map(|msg| println!("{}", msg)),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
