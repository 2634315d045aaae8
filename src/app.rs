use crate::cli::{Cli, Commands};
use anyhow::{Context, Result};
use presetctl::config::Config;
use presetctl::engine::{
    FieldChange, JsonFileStore, SessionError, SessionManager, SessionView, field_keys,
};
use std::path::PathBuf;
use std::process;

pub fn run(cli: Cli, config: &Config) {
    let result = match cli.command {
        Commands::Fields => {
            handle_fields();
            Ok(())
        }
        Commands::InitConfig => handle_init_config(),
        command => {
            let store_dir = cli.store_dir.unwrap_or_else(|| config.store_dir());
            run_session_command(command, store_dir)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run_session_command(command: Commands, store_dir: PathBuf) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(async move {
        let store = JsonFileStore::new(&store_dir);
        let mut session = SessionManager::initialize(store)
            .await
            .with_context(|| format!("Failed to load presets from {}", store_dir.display()))?;

        match command {
            Commands::Show => {
                print_current(session.view())?;
            }
            Commands::List => {
                handle_list(&session);
            }
            Commands::New { discard } => {
                let view = session.new_preset(discard).await.map_err(explain)?;
                println!("Started new preset '{}'", view.current.name);
            }
            Commands::Select { name, discard } => {
                let view = session.select(&name, discard).await.map_err(explain)?;
                if view.current.name == name && !view.is_edited {
                    println!("Selected '{}'", name);
                } else {
                    println!("No saved preset named '{}'", name);
                }
            }
            Commands::Set { changes } => {
                handle_set(&mut session, changes).await?;
            }
            Commands::Save => {
                let view = session.save().await.map_err(explain)?;
                println!("Saved '{}' ({} presets)", view.current.name, view.presets.len());
            }
            Commands::SaveAs { name } => {
                let view = session.save_as(&name).await.map_err(explain)?;
                println!("Saved as '{}' ({} presets)", view.current.name, view.presets.len());
            }
            Commands::Fields | Commands::InitConfig => unreachable!("handled before the store is opened"),
        }

        Ok::<(), anyhow::Error>(())
    })
}

/// Turn session errors into messages that tell the user what to do next
fn explain(err: SessionError) -> anyhow::Error {
    match err {
        SessionError::UnsavedChanges => anyhow::anyhow!(
            "The current preset has unsaved changes. Save them first, or pass --discard"
        ),
        other => anyhow::Error::new(other),
    }
}

fn print_current(view: SessionView<'_>) -> Result<()> {
    let state = if view.is_edited { "edited" } else { "saved" };
    println!("# {} ({})", view.current.name, state);
    let body = toml::to_string_pretty(view.current).context("Failed to render preset")?;
    print!("{}", body);
    Ok(())
}

fn handle_list(session: &SessionManager<JsonFileStore>) {
    let entries = session.entries();
    if entries.is_empty() {
        println!("(empty)");
        return;
    }

    let edited = session.would_discard_changes();
    for entry in entries {
        let marker = match (entry.selected, edited) {
            (true, false) => "*",
            (true, true) => "~",
            (false, _) => " ",
        };
        println!("{} {}", marker, entry.name);
    }
}

async fn handle_set(session: &mut SessionManager<JsonFileStore>, changes: Vec<FieldChange>) -> Result<()> {
    let result = session.mutate(changes).await.map(|view| view.is_edited);

    // Report corrections even when the write failed; the edit itself stuck
    for correction in session.last_corrections() {
        println!("adjusted {}", correction);
    }

    let is_edited = result.map_err(explain)?;
    if is_edited {
        println!("'{}' has unsaved changes", session.view().current.name);
    } else {
        println!("'{}' matches its saved version", session.view().current.name);
    }
    Ok(())
}

fn handle_fields() {
    for (key, accepted) in field_keys() {
        println!("{:<14} {}", key, accepted);
    }
}

fn handle_init_config() -> Result<()> {
    let path = Config::config_path()?;
    if Config::exists() {
        println!("Config file exists: {}", path.display());
    } else {
        Config::ensure_default()?;
        println!("Created default config file: {}", path.display());
    }

    let config = Config::load()?;
    println!("Preset store: {}", config.store_dir().display());
    Ok(())
}
