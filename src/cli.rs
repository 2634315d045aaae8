use clap::{ArgAction, Parser, Subcommand};
use presetctl::engine::FieldChange;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "presetctl")]
#[command(about = "Manage encoding presets with cross-field validation", long_about = None)]
pub struct Cli {
    /// Directory holding the preset store (overrides config)
    #[arg(long, global = true, value_name = "DIR")]
    pub store_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the current preset and whether it has unsaved changes
    Show,

    /// List saved presets, marking the one currently selected
    List,

    /// Start a new preset from defaults
    New {
        /// Discard unsaved changes to the current preset
        #[arg(long)]
        discard: bool,
    },

    /// Make a saved preset current
    Select {
        /// Name of the saved preset
        name: String,

        /// Discard unsaved changes to the current preset
        #[arg(long)]
        discard: bool,
    },

    /// Change fields of the current preset (KEY=VALUE ...)
    Set {
        #[arg(value_name = "KEY=VALUE", required = true)]
        changes: Vec<FieldChange>,
    },

    /// Save the current preset under its own name
    Save,

    /// Save a copy of the current preset under a new name and switch to it
    SaveAs {
        /// New preset name
        name: String,
    },

    /// List the fields accepted by `set`
    Fields,

    /// Show config status and location, or create default config if missing
    InitConfig,
}

pub fn parse() -> Cli {
    Cli::parse()
}
