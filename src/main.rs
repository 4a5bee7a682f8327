use anyhow::{Context, Result};
use clap::{Command, CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};
use std::io;
use todo_store::config::{self, Config, ConfigError};
use todo_store::shell;
use todo_store::{Filter, StoreEvent, TodoStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "todo-store")]
#[command(about = "An in-memory todo list driven from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Read todo commands from stdin (the default)")]
    Run {
        #[arg(long, help = "Initial filter: all, finished or unfinished")]
        filter: Option<Filter>,
    },
    #[command(about = "Configuration management")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    #[command(about = "Generate shell completion scripts")]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    #[command(about = "Set a configuration value")]
    Set {
        #[arg(help = "Configuration key (currently only 'default_filter' is supported)")]
        key: String,
        #[arg(help = "Configuration value")]
        value: String,
    },
    #[command(about = "Get a configuration value")]
    Get {
        #[arg(help = "Configuration key")]
        key: String,
    },
    #[command(about = "List all configuration values")]
    List,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config { action }) => {
            if let Err(e) = handle_config_command(action) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            print_completions(shell, &mut cmd);
        }
        Some(Commands::Run { filter }) => exit_on_error(run_shell(filter)),
        None => exit_on_error(run_shell(None)),
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn exit_on_error(result: Result<()>) {
    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn handle_config_command(action: ConfigAction) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Set { key, value } => {
            let mut config = Config::load_or_default()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("Configuration saved successfully.");
        }
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            println!("{}", config.get(&key)?);
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for key in config::KEYS {
                println!("{} = {}", key, config.get(key)?);
            }
        }
    }
    Ok(())
}

fn run_shell(filter: Option<Filter>) -> Result<()> {
    let config = Config::load_or_default().context("Configuration error")?;
    let filter = filter.unwrap_or(config.default_filter);

    let mut store = TodoStore::with_filter(filter);
    store.subscribe(|event| match event {
        StoreEvent::TodoAdded { id } => info!(%id, "todo added"),
        StoreEvent::TodoToggled { id, finished } => info!(%id, finished, "todo toggled"),
        StoreEvent::FilterChanged { from, to } => info!(%from, %to, "filter changed"),
    });
    info!(%filter, "starting shell");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    shell::Shell::new(store).run(stdin.lock(), &mut stdout)
}

fn print_completions<G: Generator>(generator: G, cmd: &mut Command) {
    generate(generator, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
