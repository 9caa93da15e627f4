use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use budget_board::{Category, EventName, NewTransaction, RecordDate, RecordStore};

/// A utility for creating a test database for the budget_board server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// (event, date, amount, category, description)
const TRANSACTIONS: [(&str, &str, f64, &str, &str); 8] = [
    ("Gala", "03/01/2025", -250.0, "FoodAndBev", "Catering deposit"),
    ("Gala", "03/02/2025", -80.5, "Decor", "Table flowers"),
    ("Gala", "03/08/2025", 1200.0, "Door", "Ticket sales"),
    ("Gala", "03/08/2025", -140.0, "Alcohol", "Wine"),
    ("Formal", "04/12/2025", -400.0, "Services", "DJ"),
    ("Formal", "04/19/2025", 900.0, "Door", "Ticket sales"),
    ("Formal", "04/20/2025", 35.0, "Fine", "Late arrivals"),
    ("Term dues", "02/15/2025", 600.0, "Dues", "Member dues"),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

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
    let store = RecordStore::new(Connection::open(output_path)?)?;

    println!("Creating test events...");
    for name in ["Gala", "Formal", "Term dues"] {
        store.create_event(EventName::new(name)?)?;
    }

    println!("Creating test transactions...");
    for (event, date, amount, category, description) in TRANSACTIONS {
        store.create_transaction(NewTransaction {
            event: EventName::new(event)?,
            date: RecordDate::parse(date)?,
            amount,
            category: Category::fixed(category)?,
            description: description.to_owned(),
        })?;
    }

    store.adjust_deposit(500.0)?;

    println!("Success!");

    Ok(())
}
