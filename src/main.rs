use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

use sledai::checklist::Checklist;
use sledai::config::Config;
use sledai::scoring::ScoringSession;
use sledai::store::ResultStore;

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_CONFIG: i32 = 4;
const EXIT_STORAGE: i32 = 5;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Tsv,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive calculator (default if no subcommand)
    Tui,
    /// Print the numbered checklist with weights
    Checklist {
        /// Include each descriptor's definition
        #[arg(short, long)]
        descriptions: bool,
    },
    /// Score a selection of descriptors
    Score {
        /// Descriptor numbers to select (1-based, as shown by `checklist`)
        indices: Vec<usize>,

        /// Append the total to the result history
        #[arg(short, long)]
        save: bool,
    },
    /// Print saved results, newest first
    History {
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "sledai")]
#[command(about = "SELENA-SLEDAI disease activity calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/sledai/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Open and initialize the configured store. Failure is not fatal here;
/// the handle degrades and the caller decides.
async fn open_store(config: &Config) -> ResultStore {
    let config_dir = sledai::config::get_config_dir();
    let backend = config.store.build_backend(&config_dir);
    ResultStore::open(backend).await
}

/// Store for commands that can't do anything useful without one
async fn open_store_or_exit(config: &Config) -> ResultStore {
    let store = open_store(config).await;
    if !store.is_ready() {
        eprintln!(
            "Storage error: {}",
            store.failure_reason().unwrap_or("result store unavailable")
        );
        std::process::exit(EXIT_STORAGE);
    }
    store
}

/// Convert 1-based CLI indices to checklist positions
fn to_positions(indices: &[usize], len: usize) -> Result<Vec<usize>, String> {
    indices
        .iter()
        .map(|&index| {
            if index < 1 || index > len {
                Err(format!(
                    "Invalid index {}. Must be between 1 and {}.",
                    index, len
                ))
            } else {
                Ok(index - 1)
            }
        })
        .collect()
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    sledai::logging::init(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Tui);
    let config_path = cli.config.map(PathBuf::from);

    // Init runs before config loading; the config may not exist yet
    if let Commands::Init = command {
        if let Err(e) = sledai::config::init::run_init_wizard(config_path) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match sledai::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate checklist at startup
    let checklist = config.checklist();
    if let Err(errors) = sledai::checklist::validate_checklist(checklist.items()) {
        eprintln!("Checklist config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    let checklist = Arc::new(checklist);

    tracing::debug!(
        "Using {} descriptors (max score {}), {} backend",
        checklist.len(),
        checklist.max_score(),
        config.store.backend
    );

    let use_colors = sledai::output::should_use_colors();

    match command {
        Commands::Tui => run_tui(&config, checklist).await,
        Commands::Checklist { descriptions } => {
            println!(
                "{}",
                sledai::output::format_checklist(&checklist, descriptions, use_colors)
            );
        }
        Commands::Score { indices, save } => {
            let positions = match to_positions(&indices, checklist.len()) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };

            let mut session = ScoringSession::new(Arc::clone(&checklist));
            for position in positions {
                // Listing an index twice selects it once
                if !session.selection().is_selected(position) {
                    if let Err(e) = session.toggle(position) {
                        eprintln!("{}", e);
                        std::process::exit(EXIT_CONFIG);
                    }
                }
            }

            if save {
                let store = open_store_or_exit(&config).await;
                let outcome = session.commit(&store).await;
                println!(
                    "{}",
                    sledai::output::format_score_result(&outcome.result, use_colors)
                );
                match outcome.saved {
                    Ok(id) => println!("Saved as record {}", id),
                    Err(e) => {
                        eprintln!("Storage error: {}", e);
                        std::process::exit(EXIT_STORAGE);
                    }
                }
            } else {
                println!(
                    "{}",
                    sledai::output::format_score_result(&session.score(), use_colors)
                );
            }
        }
        Commands::History { format } => {
            let store = open_store_or_exit(&config).await;
            let records = store.list_all().await;
            let output = match format {
                OutputFormat::Table => {
                    sledai::output::format_history_table(&records, chrono::Utc::now(), use_colors)
                }
                OutputFormat::Tsv => sledai::output::format_history_tsv(&records),
            };
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        // Handled before config loading
        Commands::Init => {}
    }

    std::process::exit(EXIT_SUCCESS);
}

async fn run_tui(config: &Config, checklist: Arc<Checklist>) {
    // Query the terminal background before raw mode takes over stdin
    let theme = sledai::tui::resolve_theme();

    let store = open_store(config).await;
    let app = sledai::tui::App::new(
        checklist,
        store,
        sledai::tui::ThemeColors::for_theme(theme),
    );

    if let Err(e) = sledai::tui::run_tui(app).await {
        eprintln!("TUI error: {:#}", e);
        std::process::exit(EXIT_FAILURE);
    }
}
