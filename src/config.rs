//! Command-line configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::items::{CartKey, ItemType};

/// AURFC Hub command-line configuration
#[derive(Debug, Parser)]
#[command(name = "aurfc-hub", about = "AURFC Hub store cart and junior progression", long_about = None)]
pub struct HubConfig {
    /// Storage and catalog settings
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Logging settings
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

impl HubConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

/// Where state and catalogs live.
#[derive(Debug, Args)]
pub struct StorageConfig {
    /// Directory holding the saved cart and junior profiles
    #[arg(long, env = "AURFC_DATA_DIR", default_value = ".aurfc")]
    pub data_dir: PathBuf,

    /// Directory holding the catalog YAML files
    #[arg(long, env = "AURFC_CATALOG_DIR", default_value = "fixtures/catalog")]
    pub catalog_dir: PathBuf,

    /// ISO code of the cart currency
    #[arg(long, env = "AURFC_CURRENCY", default_value = "AUD")]
    pub currency: String,
}

/// How diagnostics are written to stderr.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// One line per event, with source location.
    Compact,

    /// One JSON object per event, for log shippers.
    Json,
}

/// Diagnostics settings. Command output always goes to stdout; these only shape the
/// `tracing` events on stderr.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Diagnostics filter, e.g. `warn` or `aurfc_hub=debug`; `RUST_LOG` takes precedence
    #[arg(long, env = "AURFC_LOG", default_value = "warn")]
    pub log_level: String,

    /// Diagnostics format
    #[arg(long, env = "AURFC_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Work with the store cart
    #[command(subcommand)]
    Cart(CartCommand),

    /// Work with a junior's progression
    #[command(subcommand)]
    Progress(ProgressCommand),
}

/// Identifies a cart line on the command line.
#[derive(Debug, Args)]
pub struct LineArgs {
    /// Item type (merchandise, membership, clubroom, event, group-order, donation)
    pub item_type: ItemType,

    /// Catalog id
    pub id: String,

    /// Size or other variant
    #[arg(long)]
    pub variant: Option<String>,
}

impl LineArgs {
    /// Cart key for this line.
    pub fn key(&self) -> CartKey {
        match &self.variant {
            Some(variant) => CartKey::with_variant(&self.id, self.item_type, variant),
            None => CartKey::new(&self.id, self.item_type),
        }
    }
}

/// Cart commands
#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Add one unit of a catalog entry
    Add(LineArgs),

    /// Remove a line
    Remove(LineArgs),

    /// Set the quantity of a line; zero or below removes it
    Update {
        #[command(flatten)]
        line: LineArgs,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Remove every line
    Clear,

    /// Print the cart summary
    Show,
}

/// Progression commands
#[derive(Debug, Subcommand)]
pub enum ProgressCommand {
    /// Print a junior's progression
    Show {
        /// Junior user id
        user_id: String,
    },

    /// Award experience
    AwardXp {
        /// Junior user id
        user_id: String,

        /// Experience to award
        amount: u32,
    },

    /// Award skill points
    AwardSkill {
        /// Junior user id
        user_id: String,

        /// Skill (passing, tackling, kicking, teamwork, fitness)
        skill: String,

        /// Points to award
        amount: u32,
    },
}
