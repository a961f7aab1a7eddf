//! AURFC Hub command-line host

use std::{
    io::{self, Write},
    process::ExitCode,
};

use thiserror::Error;
use tracing::debug;

use aurfc_hub::{
    cart::{CartError, manager::CartManager},
    catalog::{Catalog, CatalogError},
    items::{CartItem, CartKey},
    config::{CartCommand, Command, HubConfig, ProgressCommand, StorageConfig},
    observability::{ObservabilityError, init_subscriber},
    persistence::{StorageStatus, json::JsonFileStore},
    prices::{PriceError, currency_from_code},
    progress::{JuniorProgress, ProgressError, tracker::ProgressTracker},
    receipt::{Receipt, ReceiptError},
};

#[derive(Debug, Error)]
enum HubError {
    #[error(transparent)]
    Observability(#[from] ObservabilityError),

    #[error("invalid currency: {0}")]
    Currency(#[from] PriceError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Progress(#[from] ProgressError),

    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    let config = match HubConfig::load() {
        Ok(config) => config,
        Err(error) => {
            // Help and version requests also arrive here.
            _ = error.print();

            return if error.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            #[expect(
                clippy::print_stderr,
                reason = "user-facing command error, logging may not be initialised"
            )]
            {
                eprintln!("error: {error}");
            }

            ExitCode::FAILURE
        }
    }
}

fn run(config: HubConfig) -> Result<(), HubError> {
    init_subscriber(&config.logging)?;

    debug!(data_dir = %config.storage.data_dir.display(), "starting");

    let store = JsonFileStore::new(&config.storage.data_dir);
    let mut out = io::stdout().lock();

    match config.command {
        Command::Cart(command) => run_cart(&config.storage, store, command, &mut out),
        Command::Progress(command) => run_progress(store, command, &mut out),
    }
}

fn run_cart(
    storage: &StorageConfig,
    store: JsonFileStore,
    command: CartCommand,
    out: &mut impl Write,
) -> Result<(), HubError> {
    let currency = currency_from_code(&storage.currency)?;
    let (mut manager, opened) = CartManager::open(store, currency);

    report(&opened);

    let status = match command {
        CartCommand::Add(line) => {
            let catalog = Catalog::load(&storage.catalog_dir)?;
            let entry = catalog.entry(line.item_type, &line.id)?;
            let item = entry.to_cart_item(line.variant.as_deref())?;
            let added = format!("{} ({})", item.name(), item.key());

            let status = manager.add_to_cart(item)?;

            writeln!(out, "Added {added}")?;

            status
        }
        CartCommand::Remove(line) => {
            let key = line.key();

            if manager.cart().get(&key).is_some() {
                writeln!(out, "Removed {key}")?;
            } else {
                writeln!(out, "{key} is not in the cart")?;
            }

            manager.remove_from_cart(&key)
        }
        CartCommand::Update { line, quantity } => {
            let key = line.key();
            let existed = manager.cart().get(&key).is_some();
            let status = manager.update_quantity(&key, quantity);

            writeln!(
                out,
                "{}",
                update_message(&key, existed, manager.cart().get(&key))
            )?;

            status
        }
        CartCommand::Clear => {
            writeln!(out, "Cart cleared")?;

            manager.clear_cart()
        }
        CartCommand::Show => StorageStatus::InSync,
    };

    report(&status);

    Receipt::new(manager.cart())?.write_to(out)?;

    Ok(())
}

fn update_message(key: &CartKey, existed: bool, line: Option<&CartItem>) -> String {
    match line {
        Some(item) => format!("{key} quantity is now {}", item.quantity()),
        None if existed => format!("Removed {key}"),
        None => format!("{key} is not in the cart"),
    }
}

fn run_progress(
    store: JsonFileStore,
    command: ProgressCommand,
    out: &mut impl Write,
) -> Result<(), HubError> {
    let (mut tracker, status) = match &command {
        ProgressCommand::Show { user_id }
        | ProgressCommand::AwardXp { user_id, .. }
        | ProgressCommand::AwardSkill { user_id, .. } => ProgressTracker::open(store, user_id)?,
    };

    report(&status);

    let before = tracker.progress().clone();

    let status = match command {
        ProgressCommand::Show { .. } => StorageStatus::InSync,
        ProgressCommand::AwardXp { amount, .. } => tracker.award_experience(amount)?,
        ProgressCommand::AwardSkill { skill, amount, .. } => {
            tracker.award_skill_points(&skill, amount)?
        }
    };

    report(&status);

    for badge in tracker.progress().badges_since(&before) {
        writeln!(out, "{} New badge: {}", badge.icon, badge.name)?;
    }

    write_progress(out, tracker.user_id(), tracker.progress())?;

    Ok(())
}

fn write_progress(
    out: &mut impl Write,
    user_id: &str,
    progress: &JuniorProgress,
) -> io::Result<()> {
    writeln!(out, "{user_id}")?;
    writeln!(
        out,
        "Level {} ({}/{} XP)",
        progress.level(),
        progress.experience(),
        progress.experience_to_next()
    )?;

    writeln!(out, "Skills:")?;

    for (skill, value) in progress.skills().iter() {
        writeln!(out, "  {:<10} {value:>3}", skill.title())?;
    }

    if progress.badges().is_empty() {
        writeln!(out, "No badges yet")?;
    } else {
        writeln!(out, "Badges:")?;

        for badge in progress.badges().iter() {
            writeln!(
                out,
                "  {} {} ({})",
                badge.icon,
                badge.name,
                badge.earned_at.strftime("%Y-%m-%d")
            )?;
        }
    }

    Ok(())
}

fn report(status: &StorageStatus) {
    if let Some(error) = status.warning() {
        #[expect(
            clippy::print_stderr,
            reason = "storage warnings must reach the user whatever the log level"
        )]
        {
            eprintln!("warning: storage unavailable, continuing in memory: {error}");
        }
    }
}
