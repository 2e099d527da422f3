use anyhow::Result;
use std::env;

use minibank::{Bank, JsonStore};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Base file of the five-collection store; siblings derive from it.
    let base = env::args().nth(1).unwrap_or_else(|| "dane.json".to_string());

    let bank = Bank::load(JsonStore::new(&base));
    println!("minibank v{}", minibank::VERSION);
    println!("store base: {base}");
    println!("customers:    {}", bank.customers().len());
    println!("accounts:     {}", bank.accounts().len());
    println!("cards:        {}", bank.cards().len());
    println!("deposits:     {}", bank.deposits().len());
    println!("transactions: {}", bank.history().len());

    Ok(())
}
