use std::{
    error::Error,
    io,
    path::{Path, PathBuf},
    process::exit,
    str::FromStr,
};

use clap::{Parser, Subcommand};
use email_address::EmailAddress;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use time::{Date, macros::format_description};

use wallet_rs::{
    AppState, WalletId, WalletItemId, create_app_state,
    logging::{LOG_FILE_PATH, setup_logging},
    models::{
        ItemType, NewUser, PasswordHash, UserID, ValidatedPassword, Wallet, WalletItem,
        WalletItemBuilder, parse_decimal,
    },
    pagination::{Page, PaginationConfig},
    stores::{UserStore, WalletItemStore, WalletStore},
};

/// A command line ledger for wallets and their income and expenses.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "WALLET_DB_PATH")]
    db_path: PathBuf,

    /// The number of wallet items per page.
    #[arg(long, default_value_t = 10)]
    page_size: u64,

    /// Print results as JSON.
    #[arg(long)]
    json: bool,

    /// Show debug logs.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database tables.
    Init,

    /// Register a new user. The password is read from the terminal.
    CreateUser {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },

    /// Show the user registered with an email address.
    FindUser {
        #[arg(long)]
        email: String,
    },

    /// Create a new wallet.
    CreateWallet {
        #[arg(long)]
        name: String,
        /// The starting balance.
        #[arg(long, value_parser = parse_decimal, default_value = "0")]
        value: Decimal,
    },

    /// List the wallets a user can access.
    Wallets {
        #[arg(long)]
        user: i64,
    },

    /// Give a user access to a wallet.
    Grant {
        #[arg(long)]
        wallet: WalletId,
        #[arg(long)]
        user: i64,
    },

    /// Check whether a user can access a wallet.
    Access {
        #[arg(long)]
        wallet: WalletId,
        #[arg(long)]
        user: i64,
    },

    /// Record an income or expense.
    AddItem {
        #[arg(long)]
        wallet: WalletId,
        /// The date as YYYY-MM-DD.
        #[arg(long, value_parser = parse_date)]
        date: Date,
        /// EN (income) or SD (expense).
        #[arg(long = "type")]
        item_type: ItemType,
        #[arg(long, value_parser = parse_decimal)]
        value: Decimal,
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Change the fields given for an existing item.
    UpdateItem {
        #[arg(long)]
        id: WalletItemId,
        #[arg(long)]
        wallet: Option<WalletId>,
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
        #[arg(long = "type")]
        item_type: Option<ItemType>,
        #[arg(long, value_parser = parse_decimal)]
        value: Option<Decimal>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete an item.
    DeleteItem {
        #[arg(long)]
        id: WalletItemId,
    },

    /// List one page of a wallet's items between two dates, inclusive.
    Items {
        #[arg(long)]
        wallet: WalletId,
        #[arg(long, value_parser = parse_date)]
        from: Date,
        #[arg(long, value_parser = parse_date)]
        to: Date,
        /// The zero-based page index.
        #[arg(long, default_value_t = 0)]
        page: u64,
    },

    /// List a wallet's items of one type.
    ItemsByType {
        #[arg(long)]
        wallet: WalletId,
        #[arg(long = "type")]
        item_type: ItemType,
    },

    /// Show the total value of a wallet's items.
    Sum {
        #[arg(long)]
        wallet: WalletId,
    },

    /// Set a wallet's value to the total value of its items.
    Reconcile {
        #[arg(long)]
        wallet: WalletId,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    setup_logging(args.verbose, Path::new(LOG_FILE_PATH))?;

    let connection = Connection::open(&args.db_path)?;
    let mut state = create_app_state(
        connection,
        PaginationConfig {
            default_page_size: args.page_size,
        },
    )?;

    if let Err(error) = run(&mut state, args.command, args.json) {
        print_error(&error);
        exit(1);
    }

    Ok(())
}

fn run(state: &mut AppState, command: Command, json: bool) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Init => {
            tracing::info!("database is ready");
            println!("Success!");
        }
        Command::CreateUser { name, email } => {
            let email = parse_email(&email)?;
            let Some(password_hash) = get_new_password_hash() else {
                return Ok(());
            };

            let user = state.user_store.create(NewUser {
                name,
                email,
                password_hash,
            })?;

            if json {
                print_json(&user)?;
            } else {
                println!("Created user {} <{}> with ID {}", user.name, user.email, user.id);
            }
        }
        Command::FindUser { email } => {
            let email = parse_email(&email)?;
            let user = state
                .user_store
                .get_by_email(&email)?
                .ok_or(wallet_rs::Error::NotFound)?;

            if json {
                print_json(&user)?;
            } else {
                println!("{}\t{}\t{}", user.id, user.name, user.email);
            }
        }
        Command::CreateWallet { name, value } => {
            let wallet = state.wallet_store.create(&name, value)?;
            print_wallet(&wallet, json)?;
        }
        Command::Wallets { user } => {
            let wallets = state.wallet_store.get_for_user(UserID::new(user))?;

            if json {
                print_json(&wallets)?;
            } else {
                for wallet in &wallets {
                    print_wallet(wallet, false)?;
                }
            }
        }
        Command::Grant { wallet, user } => {
            state.wallet_store.add_user(wallet, UserID::new(user))?;
            println!("User {user} can now access wallet {wallet}");
        }
        Command::Access { wallet, user } => {
            let has_access = state
                .wallet_store
                .user_has_access(wallet, UserID::new(user))?;

            if json {
                print_json(&has_access)?;
            } else {
                println!("{has_access}");
            }
        }
        Command::AddItem {
            wallet,
            date,
            item_type,
            value,
            description,
        } => {
            let item = state.wallet_item_service.save(
                WalletItem::build(wallet, date, item_type, value).description(&description),
            )?;
            print_items(&[item], json)?;
        }
        Command::UpdateItem {
            id,
            wallet,
            date,
            item_type,
            value,
            description,
        } => {
            let existing = state
                .wallet_item_service
                .store()
                .get(id)?
                .ok_or(wallet_rs::Error::NotFound)?;

            let mut builder = WalletItemBuilder::from(existing);
            builder.wallet_id = wallet.or(builder.wallet_id);
            builder.date = date.or(builder.date);
            builder.item_type = item_type.or(builder.item_type);
            builder.value = value.or(builder.value);
            if let Some(description) = description {
                builder.description = description;
            }

            let item = state.wallet_item_service.save(builder)?;
            print_items(&[item], json)?;
        }
        Command::DeleteItem { id } => {
            state.wallet_item_service.store_mut().delete(id)?;
            println!("Deleted item {id}");
        }
        Command::Items {
            wallet,
            from,
            to,
            page,
        } => {
            let page = state
                .wallet_item_service
                .find_between_dates(wallet, from, to, page)?;
            print_page(&page, json)?;
        }
        Command::ItemsByType { wallet, item_type } => {
            let items = state
                .wallet_item_service
                .find_by_wallet_and_type(wallet, item_type)?;
            print_items(&items, json)?;
        }
        Command::Sum { wallet } => {
            let total = state.wallet_item_service.sum_by_wallet_id(wallet)?;

            if json {
                print_json(&total)?;
            } else {
                println!("{total}");
            }
        }
        Command::Reconcile { wallet } => {
            let wallet = state.wallet_store.reconcile_value(wallet)?;
            print_wallet(&wallet, json)?;
        }
    }

    Ok(())
}

fn parse_date(text: &str) -> Result<Date, String> {
    Date::parse(text.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|error| format!("expected a date like 2024-03-10: {error}"))
}

fn parse_email(text: &str) -> Result<EmailAddress, wallet_rs::Error> {
    EmailAddress::from_str(text).map_err(|error| wallet_rs::Error::InvalidEmail(error.to_string()))
}

fn get_new_password_hash() -> Option<PasswordHash> {
    loop {
        let first_password = match rpassword::prompt_password("Enter a password: ") {
            Ok(string) => string,
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
                return None;
            }
            Err(error) => {
                print_error(format!("Could not read password from stdin: {error}"));
                return None;
            }
        };

        let password = match ValidatedPassword::new(&first_password) {
            Ok(password) => password,
            Err(error) => {
                print_error(error);
                continue;
            }
        };

        let second_password = match rpassword::prompt_password("Enter the same password again: ") {
            Ok(string) => string,
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
                return None;
            }
            Err(error) => {
                print_error(format!("Could not read password from stdin: {error}"));
                return None;
            }
        };

        if first_password != second_password {
            print_error("Passwords must match, try again.");
            continue;
        }

        match PasswordHash::new(password, PasswordHash::DEFAULT_COST) {
            Ok(password_hash) => return Some(password_hash),
            Err(error) => {
                print_error(format!("Could not hash password: {error}. Try again."));
            }
        }
    }
}

fn print_json(value: &impl Serialize) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}

fn print_wallet(wallet: &Wallet, json: bool) -> Result<(), serde_json::Error> {
    if json {
        return print_json(wallet);
    }

    println!("{}\t{}\t{}", wallet.id, wallet.name, wallet.value);

    Ok(())
}

fn print_items(items: &[WalletItem], json: bool) -> Result<(), serde_json::Error> {
    if json {
        return print_json(&items);
    }

    for item in items {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            item.id, item.date, item.item_type, item.value, item.description
        );
    }

    Ok(())
}

fn print_page(page: &Page<WalletItem>, json: bool) -> Result<(), serde_json::Error> {
    if json {
        return print_json(page);
    }

    print_items(&page.content, false)?;
    println!(
        "Page {} of {} ({} items)",
        page.page_index.saturating_add(1),
        page.total_pages().max(1),
        page.total_elements
    );

    Ok(())
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        error.to_string().trim_end_matches('\n')
    );
}
