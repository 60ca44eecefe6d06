use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::str::FromStr;

use clap::Parser;
use email_address::EmailAddress;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use wallet_rs::{
    create_app_state,
    logging::{LOG_FILE_PATH, setup_logging},
    models::{ItemType, NewUser, PasswordHash, ValidatedPassword, WalletItem},
    pagination::PaginationConfig,
    stores::{UserStore, WalletStore},
};

/// A utility for creating a test database for the wallet ledger.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    setup_logging(false, Path::new(LOG_FILE_PATH))?;

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;
    let mut state = create_app_state(conn, PaginationConfig::default())?;

    println!("Creating test user...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;

    let user = state.user_store.create(NewUser {
        name: "Test User".to_owned(),
        email: EmailAddress::from_str("test@example.com")?,
        password_hash,
    })?;

    println!("Creating test wallet...");

    let wallet = state.wallet_store.create("Carteira", Decimal::ZERO)?;
    state.wallet_store.add_user(wallet.id, user.id)?;

    println!("Creating wallet items...");

    let today = OffsetDateTime::now_utc().date();
    let items = [
        (0, ItemType::Income, Decimal::new(350000, 2), "Salário"),
        (1, ItemType::Expense, Decimal::new(120000, 2), "Aluguel"),
        (3, ItemType::Expense, Decimal::new(18990, 2), "Conta de Luz"),
        (7, ItemType::Expense, Decimal::new(45230, 2), "Supermercado"),
        (14, ItemType::Income, Decimal::new(25000, 2), "Freelance"),
    ];

    for (days_ago, item_type, value, description) in items {
        let value = match item_type {
            ItemType::Income => value,
            ItemType::Expense => -value,
        };

        state.wallet_item_service.save(
            WalletItem::build(wallet.id, today - Duration::days(days_ago), item_type, value)
                .description(description),
        )?;
    }

    let wallet = state.wallet_store.reconcile_value(wallet.id)?;
    println!("Wallet {} has a balance of {}", wallet.name, wallet.value);

    println!("Success!");

    Ok(())
}
