//! Command-line and environment configuration.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use stockbill_core::{ItemId, Money};
use stockbill_observability::{LogConfig, LogFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "stockbill", version, about = "Retail inventory and billing")]
pub struct Cli {
    /// Inventory file (one `id name price quantity` record per line)
    #[arg(long, env = "STOCKBILL_DATA_FILE", default_value = "inventory.txt", global = true)]
    pub data_file: PathBuf,

    /// Currency label printed before the grand total
    #[arg(long, env = "STOCKBILL_CURRENCY", default_value = "Rs.", global = true)]
    pub currency: String,

    /// Log line format (logs go to stderr)
    #[arg(
        long,
        env = "STOCKBILL_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormatArg::Text,
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            format: self.log_format.into(),
            verbosity: self.verbose,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive menu (default)
    Menu,

    /// List all items
    List,

    /// Show the first item with this id
    Show {
        #[arg(allow_negative_numbers = true)]
        id: ItemId,
    },

    /// Add an item (duplicate ids are accepted; lookups use the first)
    Add {
        #[arg(allow_negative_numbers = true)]
        id: ItemId,
        name: String,
        price: Money,
        quantity: u32,
    },

    /// Overwrite name, price and quantity of an item
    Update {
        #[arg(allow_negative_numbers = true)]
        id: ItemId,
        name: String,
        price: Money,
        quantity: u32,
    },

    /// Delete the first item with this id
    Delete {
        #[arg(allow_negative_numbers = true)]
        id: ItemId,
    },

    /// Change stock by a signed amount
    Restock {
        #[arg(allow_negative_numbers = true)]
        id: ItemId,
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },

    /// Bill one or more lines and print the receipt
    Bill {
        /// Line as ID:QTY; repeat for more lines
        #[arg(long = "line", required = true)]
        lines: Vec<LineSpec>,

        /// Print the receipt as JSON
        #[arg(long)]
        json: bool,
    },
}

/// `ID:QTY` pair given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpec {
    pub id: ItemId,
    pub quantity: u32,
}

impl FromStr for LineSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, quantity) = s
            .split_once(':')
            .ok_or_else(|| format!("expected ID:QTY, got {s:?}"))?;
        let id = id.parse::<ItemId>().map_err(|e| e.to_string())?;
        let quantity = quantity
            .parse::<u32>()
            .map_err(|e| format!("invalid quantity {quantity:?}: {e}"))?;
        Ok(Self { id, quantity })
    }
}
