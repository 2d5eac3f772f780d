use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_dir, get_config_path, Config};
use crate::store::{BackendKind, StoreConfig};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Print text with a typewriter effect, one character at a time.
fn typewriter(text: &str) {
    use std::thread;
    use std::time::Duration;
    for c in text.chars() {
        print!("{}", c);
        std::io::stdout().flush().ok();
        thread::sleep(Duration::from_millis(18));
    }
    println!();
}

fn parse_backend(input: &str) -> Option<BackendKind> {
    match input.trim().to_lowercase().as_str() {
        "sqlite" | "s" => Some(BackendKind::Sqlite),
        "document" | "doc" | "d" => Some(BackendKind::Document),
        _ => None,
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    typewriter("SLEDAI Calculator Configuration Wizard");
    println!("======================================");
    println!();

    // 1. Storage backend
    typewriter("Every calculated score is saved with a timestamp so you can review the history later.");
    typewriter("Two storage backends are available:");
    typewriter("  sqlite    -- an embedded SQLite database file");
    typewriter("  document  -- a single JSON file");
    let backend = loop {
        let input = prompt_with_default("Storage backend", "sqlite")?;
        match parse_backend(&input) {
            Some(kind) => break kind,
            None => println!("  Invalid: choose 'sqlite' or 'document'. Try again."),
        }
    };

    // 2. Data file
    println!();
    let default_data_path = get_config_dir().join(backend.default_file_name());
    let data_str = prompt_with_default(
        "Where should results be stored?",
        &default_data_path.display().to_string(),
    )?;
    let data_path = PathBuf::from(&data_str);
    let path = if data_path == default_data_path {
        None
    } else {
        Some(data_path)
    };

    // 3. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    // Check if file already exists
    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 4. Write config
    let config = Config {
        store: StoreConfig { backend, path },
        checklist: None,
    };

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    // Create parent directories
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(&config_path, &yaml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!();
    println!("Config written to {}", config_path.display());
    typewriter("The checklist defaults to the standard SLEDAI table. Add a `checklist:` list to the config file to use your own.");
    println!("Run `sledai` to get started.");

    Ok(())
}
