// Five-collection JSON persistence.
//
// Each collection is one flat JSON array of objects; there is no
// cross-file transactionality. The wire field names are a stable external
// format (Polish, inherited from the existing data files) and are mapped
// onto the domain types here and nowhere else. Polymorphic rows carry a
// string discriminator and are decoded by an explicit per-tag function.
//
// Decode contract: every record is decoded independently. A record that
// fails (missing required field, wrong type, unknown discriminator) is
// logged and dropped; the rest of the collection still loads. A missing or
// unreadable file yields an empty collection, never an error.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::entities::{
    Account, AccountKind, Card, CardKind, Customer, SavingsTerms, TermDeposit, TransactionEntry,
    TransactionKind,
};
use crate::error::{BankError, Result};

// Discriminator values on the wire. `Glowne` is the historical spelling
// for standard accounts; `Standard` is accepted on decode as well.
const TYP_STANDARD: &str = "Glowne";
const TYP_STANDARD_ALT: &str = "Standard";
const TYP_SAVINGS: &str = "Oszczednosciowe";
const TYP_DEBIT: &str = "Debetowa";

// ============================================================================
// WIRE ROWS
// ============================================================================

#[derive(Serialize, Deserialize)]
struct CustomerRow {
    #[serde(rename = "imie")]
    first_name: String,
    #[serde(rename = "nazwisko")]
    last_name: String,
    #[serde(rename = "pesel")]
    national_id: String,
    #[serde(rename = "login")]
    login: String,
    #[serde(rename = "haslo")]
    password: String,
}

#[derive(Serialize, Deserialize)]
struct AccountRow {
    #[serde(rename = "numer")]
    number: String,
    #[serde(rename = "typ")]
    kind: String,
    #[serde(rename = "saldo")]
    balance: f64,
    #[serde(rename = "wlasciciel")]
    owner: String,
    #[serde(rename = "oprocentowanie", default, skip_serializing_if = "Option::is_none")]
    interest_rate: Option<f64>,
    #[serde(rename = "data_kapitalizacji", default, skip_serializing_if = "Option::is_none")]
    last_capitalized: Option<String>,
    #[serde(rename = "limit_wyplat", default, skip_serializing_if = "Option::is_none")]
    withdrawal_cap: Option<u32>,
}

#[derive(Serialize, Deserialize)]
struct CardRow {
    #[serde(rename = "numer_karty")]
    number: String,
    #[serde(rename = "data_waznosci")]
    expiry: String,
    #[serde(rename = "typ_karty")]
    kind: String,
    #[serde(rename = "cvc")]
    cvc: String,
    #[serde(rename = "pin")]
    pin: String,
    #[serde(rename = "powiazane_konto", default, skip_serializing_if = "Option::is_none")]
    linked_account: Option<String>,
    #[serde(rename = "dzienny_limit", default, skip_serializing_if = "Option::is_none")]
    daily_limit: Option<f64>,
}

#[derive(Serialize, Deserialize)]
struct DepositRow {
    #[serde(rename = "kwota")]
    amount: f64,
    #[serde(rename = "oprocentowanie")]
    interest_rate: f64,
    #[serde(rename = "data_oddania")]
    maturity: String,
    #[serde(rename = "powiazane_konto")]
    linked_account: String,
}

#[derive(Serialize, Deserialize)]
struct TransactionRow {
    #[serde(rename = "kwota")]
    amount: f64,
    #[serde(rename = "typ")]
    kind: String,
    #[serde(rename = "data")]
    timestamp: String,
    #[serde(rename = "nadawca", default)]
    sender: String,
    #[serde(rename = "odbiorca", default)]
    receiver: String,
}

// ============================================================================
// ENCODE / DECODE
// ============================================================================

fn missing(field: &str) -> BankError {
    BankError::Decode(format!("missing field: {field}"))
}

fn decode_customer(value: Value) -> Result<Customer> {
    let row: CustomerRow = serde_json::from_value(value)?;
    Ok(Customer::new(
        row.first_name,
        row.last_name,
        row.national_id,
        row.login,
        row.password,
    ))
}

fn encode_customer(customer: &Customer) -> CustomerRow {
    CustomerRow {
        first_name: customer.first_name.clone(),
        last_name: customer.last_name.clone(),
        national_id: customer.national_id.clone(),
        login: customer.login.clone(),
        password: customer.password.clone(),
    }
}

fn decode_account(value: Value) -> Result<Account> {
    let row: AccountRow = serde_json::from_value(value)?;
    let kind = match row.kind.as_str() {
        TYP_STANDARD | TYP_STANDARD_ALT => AccountKind::Standard,
        TYP_SAVINGS => AccountKind::Savings(SavingsTerms {
            interest_rate: row.interest_rate.ok_or_else(|| missing("oprocentowanie"))?,
            last_capitalized: row
                .last_capitalized
                .ok_or_else(|| missing("data_kapitalizacji"))?,
            monthly_withdrawal_cap: row.withdrawal_cap.ok_or_else(|| missing("limit_wyplat"))?,
            withdrawals_used: 0,
        }),
        other => return Err(BankError::Decode(format!("unknown account type: {other}"))),
    };
    Ok(Account {
        number: row.number,
        balance: row.balance,
        owner_id: row.owner,
        kind,
    })
}

fn encode_account(account: &Account) -> AccountRow {
    let (kind, terms) = match &account.kind {
        AccountKind::Standard => (TYP_STANDARD, None),
        AccountKind::Savings(terms) => (TYP_SAVINGS, Some(terms)),
    };
    AccountRow {
        number: account.number.clone(),
        kind: kind.to_string(),
        balance: account.balance,
        owner: account.owner_id.clone(),
        interest_rate: terms.map(|t| t.interest_rate),
        last_capitalized: terms.map(|t| t.last_capitalized.clone()),
        withdrawal_cap: terms.map(|t| t.monthly_withdrawal_cap),
    }
}

fn decode_card(value: Value) -> Result<Card> {
    let row: CardRow = serde_json::from_value(value)?;
    let kind = match row.kind.as_str() {
        TYP_DEBIT => CardKind::Debit {
            linked_account: row.linked_account.ok_or_else(|| missing("powiazane_konto"))?,
            daily_limit: row.daily_limit.ok_or_else(|| missing("dzienny_limit"))?,
        },
        other => return Err(BankError::Decode(format!("unknown card type: {other}"))),
    };
    Ok(Card {
        number: row.number,
        expiry: row.expiry,
        cvc: row.cvc,
        pin: row.pin,
        kind,
    })
}

fn encode_card(card: &Card) -> CardRow {
    match &card.kind {
        CardKind::Debit {
            linked_account,
            daily_limit,
        } => CardRow {
            number: card.number.clone(),
            expiry: card.expiry.clone(),
            kind: TYP_DEBIT.to_string(),
            cvc: card.cvc.clone(),
            pin: card.pin.clone(),
            linked_account: Some(linked_account.clone()),
            daily_limit: Some(*daily_limit),
        },
    }
}

fn decode_deposit(value: Value) -> Result<TermDeposit> {
    let row: DepositRow = serde_json::from_value(value)?;
    // Deposits have no natural key on the wire; identity is minted fresh
    // on every load and only used by the relinking pass.
    Ok(TermDeposit {
        id: uuid::Uuid::new_v4().to_string(),
        amount: row.amount,
        interest_rate: row.interest_rate,
        maturity: row.maturity,
        linked_account: row.linked_account,
    })
}

fn encode_deposit(deposit: &TermDeposit) -> DepositRow {
    DepositRow {
        amount: deposit.amount,
        interest_rate: deposit.interest_rate,
        maturity: deposit.maturity.clone(),
        linked_account: deposit.linked_account.clone(),
    }
}

fn decode_transaction(value: Value) -> Result<TransactionEntry> {
    let row: TransactionRow = serde_json::from_value(value)?;
    let kind = TransactionKind::parse(&row.kind)
        .ok_or_else(|| BankError::Decode(format!("unknown transaction type: {}", row.kind)))?;
    if kind == TransactionKind::Transfer && (row.sender.is_empty() || row.receiver.is_empty()) {
        return Err(BankError::Decode(
            "transfer without sender or receiver".to_string(),
        ));
    }
    Ok(TransactionEntry {
        amount: row.amount,
        kind,
        timestamp: row.timestamp,
        sender: row.sender,
        receiver: row.receiver,
    })
}

fn encode_transaction(entry: &TransactionEntry) -> TransactionRow {
    TransactionRow {
        amount: entry.amount,
        kind: entry.kind.as_str().to_string(),
        timestamp: entry.timestamp.clone(),
        sender: entry.sender.clone(),
        receiver: entry.receiver.clone(),
    }
}

// ============================================================================
// FILE I/O
// ============================================================================

/// Read a collection file as a JSON array. Unreadable files, broken JSON
/// and non-array top levels all yield an empty collection.
fn read_array(path: &Path, label: &str) -> Vec<Value> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            warn!(collection = label, path = %path.display(), %err, "collection not readable, starting empty");
            return Vec::new();
        }
    };
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Array(values)) => values,
        Ok(_) => {
            warn!(collection = label, path = %path.display(), "collection is not a JSON array, starting empty");
            Vec::new()
        }
        Err(err) => {
            warn!(collection = label, path = %path.display(), %err, "collection unparseable, starting empty");
            Vec::new()
        }
    }
}

/// Full-file overwrite with 4-space-indented JSON.
fn write_array(path: &Path, values: &[Value]) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    values.serialize(&mut ser)?;
    fs::write(path, buf)?;
    Ok(())
}

fn load_records<T>(path: &Path, label: &str, decode: impl Fn(Value) -> Result<T>) -> Vec<T> {
    let values = read_array(path, label);
    let mut records = Vec::with_capacity(values.len());
    for value in values {
        match decode(value) {
            Ok(record) => records.push(record),
            Err(err) => warn!(collection = label, %err, "skipping record"),
        }
    }
    records
}

fn save_records<T, R: Serialize>(path: &Path, records: &[T], encode: impl Fn(&T) -> R) -> Result<()> {
    let values = records
        .iter()
        .map(|record| Ok(serde_json::to_value(encode(record))?))
        .collect::<Result<Vec<Value>>>()?;
    write_array(path, &values)
}

// ============================================================================
// JSON STORE
// ============================================================================

fn sibling(base: &Path, prefix: &str) -> PathBuf {
    let name = base
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    base.with_file_name(format!("{prefix}{name}"))
}

/// Paths of the five collection files. The customers file is the base
/// name (`dane.json`); the other four are siblings derived by prefix:
/// `transakcje_`, `karty_`, `lokaty_`, `konta_`.
pub struct JsonStore {
    customers: PathBuf,
    transactions: PathBuf,
    cards: PathBuf,
    deposits: PathBuf,
    accounts: PathBuf,
}

impl JsonStore {
    pub fn new(base: impl Into<PathBuf>) -> JsonStore {
        let customers = base.into();
        JsonStore {
            transactions: sibling(&customers, "transakcje_"),
            cards: sibling(&customers, "karty_"),
            deposits: sibling(&customers, "lokaty_"),
            accounts: sibling(&customers, "konta_"),
            customers,
        }
    }

    pub fn load_customers(&self) -> Vec<Customer> {
        load_records(&self.customers, "customers", decode_customer)
    }

    pub fn save_customers(&self, customers: &[Customer]) -> Result<()> {
        save_records(&self.customers, customers, encode_customer)
    }

    pub fn load_accounts(&self) -> Vec<Account> {
        load_records(&self.accounts, "accounts", decode_account)
    }

    pub fn save_accounts(&self, accounts: &[Account]) -> Result<()> {
        save_records(&self.accounts, accounts, encode_account)
    }

    pub fn load_cards(&self) -> Vec<Card> {
        load_records(&self.cards, "cards", decode_card)
    }

    pub fn save_cards(&self, cards: &[Card]) -> Result<()> {
        save_records(&self.cards, cards, encode_card)
    }

    pub fn load_deposits(&self) -> Vec<TermDeposit> {
        load_records(&self.deposits, "deposits", decode_deposit)
    }

    pub fn save_deposits(&self, deposits: &[TermDeposit]) -> Result<()> {
        save_records(&self.deposits, deposits, encode_deposit)
    }

    pub fn load_transactions(&self) -> Vec<TransactionEntry> {
        load_records(&self.transactions, "transactions", decode_transaction)
    }

    pub fn save_transactions(&self, transactions: &[TransactionEntry]) -> Result<()> {
        save_records(&self.transactions, transactions, encode_transaction)
    }
}
