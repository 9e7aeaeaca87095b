//! `stockbill` command-line front end: interactive menu and one-shot
//! subcommands over a file-backed inventory.

pub mod commands;
pub mod config;
pub mod input;
pub mod menu;
pub mod receipt;

use std::io::{self, Write};

use anyhow::Context;
use tracing::info;

use stockbill_inventory::{FileStorage, InventoryStorage, InventoryStore};

pub use config::{Cli, Command, LineSpec, LogFormatArg};
pub use input::{InputError, InputSource, LineInput};
pub use menu::Menu;

/// Open the store, dispatch the command and save on the way out.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let storage = FileStorage::new(&cli.data_file);
    let mut store = InventoryStore::open(storage)
        .with_context(|| format!("failed to open inventory at {}", cli.data_file.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = dispatch(cli.command.unwrap_or(Command::Menu), &mut store, &cli.currency, &mut out);
    out.flush()?;

    store.close().context("failed to save inventory on exit")?;
    outcome
}

/// Run one command against an open store.
pub fn dispatch<S, W>(
    command: Command,
    store: &mut InventoryStore<S>,
    currency: &str,
    out: &mut W,
) -> anyhow::Result<()>
where
    S: InventoryStorage,
    W: Write,
{
    match command {
        Command::Menu => {
            info!(items = store.len(), "starting interactive menu");
            let input = LineInput::new(io::stdin().lock(), io::stdout());
            Menu::new(store, input, out, currency).run()
        }
        Command::List => commands::list(store, out),
        Command::Show { id } => commands::show(store, id, out),
        Command::Add {
            id,
            name,
            price,
            quantity,
        } => commands::add(store, id, name, price, quantity, out),
        Command::Update {
            id,
            name,
            price,
            quantity,
        } => commands::update(store, id, name, price, quantity, out),
        Command::Delete { id } => commands::delete(store, id, out),
        Command::Restock { id, delta } => commands::restock(store, id, delta, out),
        Command::Bill { lines, json } => commands::bill(store, &lines, json, currency, out),
    }
}
