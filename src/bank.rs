// Bank controller.
//
// Owns the five global collections plus at most one logged-in session.
// The global collections are supersets of what customers reference:
// orphaned rows (foreign key pointing at nothing) stay loaded but are
// attached to no customer. The session is held as the customer's national
// ID and resolved through the collection on every access, so it survives
// collection growth and reordering.
//
// Every mutating operation persists the affected collections in full,
// synchronously. A failed save is logged and does not roll back the
// in-memory mutation; no error here is fatal.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::error;

use crate::entities::{Account, Card, Customer, TermDeposit, TransactionEntry};
use crate::error::{BankError, Result};
use crate::money::{self, is_valid_amount};
use crate::store::JsonStore;

pub struct Bank {
    store: JsonStore,
    customers: Vec<Customer>,
    accounts: Vec<Account>,
    cards: Vec<Card>,
    deposits: Vec<TermDeposit>,
    transactions: Vec<TransactionEntry>,

    /// National ID of the logged-in customer.
    session: Option<String>,
}

impl Bank {
    /// Load all five collections (partial data on per-file failure) and
    /// rebuild the ownership graph.
    pub fn load(store: JsonStore) -> Bank {
        let mut bank = Bank {
            customers: store.load_customers(),
            accounts: store.load_accounts(),
            cards: store.load_cards(),
            deposits: store.load_deposits(),
            transactions: store.load_transactions(),
            store,
            session: None,
        };
        bank.relink();
        bank
    }

    // ========================================================================
    // RELINKING
    // ========================================================================

    /// Attach flat rows to their owning customers. Accounts attach first,
    /// by owner national ID; cards and deposits then attach by linked
    /// account number against the customer's own just-attached account
    /// set, never the global one, so a card pointing at another customer's
    /// account stays unattached. Unmatched rows remain in the global
    /// collections as orphans.
    pub fn relink(&mut self) {
        for customer in &mut self.customers {
            customer.clear_attachments();
            for account in &self.accounts {
                if account.owner_id == customer.national_id {
                    customer.attach_account(account.number.clone());
                }
            }
            for card in &self.cards {
                if customer.owns_account(card.linked_account()) {
                    customer.attach_card(card.number.clone());
                }
            }
            for deposit in &self.deposits {
                if customer.owns_account(&deposit.linked_account) {
                    customer.attach_deposit(deposit.id.clone());
                }
            }
        }
    }

    // ========================================================================
    // SESSION
    // ========================================================================

    /// Register a new customer, persist, and open their session. Login and
    /// national ID must both be unused.
    pub fn register(
        &mut self,
        first_name: String,
        last_name: String,
        national_id: String,
        login: String,
        password: String,
    ) -> Result<()> {
        if self.customers.iter().any(|c| c.login == login) {
            return Err(BankError::LoginTaken(login));
        }
        if self.customers.iter().any(|c| c.national_id == national_id) {
            return Err(BankError::NationalIdTaken(national_id));
        }
        self.customers.push(Customer::new(
            first_name,
            last_name,
            national_id.clone(),
            login,
            password,
        ));
        self.persist_customers();
        self.session = Some(national_id);
        Ok(())
    }

    /// Exact plaintext credential match; sets the session on success.
    pub fn login(&mut self, login: &str, password: &str) -> bool {
        match self
            .customers
            .iter()
            .find(|c| c.credentials_match(login, password))
        {
            Some(customer) => {
                self.session = Some(customer.national_id.clone());
                true
            }
            None => false,
        }
    }

    pub fn logout(&mut self) {
        self.session = None;
    }

    pub fn current_customer(&self) -> Result<&Customer> {
        let id = self.session.as_deref().ok_or(BankError::NoSession)?;
        self.customers
            .iter()
            .find(|c| c.national_id == id)
            .ok_or(BankError::NoSession)
    }

    fn current_customer_mut(&mut self) -> Result<&mut Customer> {
        let id = self.session.clone().ok_or(BankError::NoSession)?;
        self.customers
            .iter_mut()
            .find(|c| c.national_id == id)
            .ok_or(BankError::NoSession)
    }

    // ========================================================================
    // ACCOUNTS
    // ========================================================================

    pub fn open_standard_account(&mut self, number: String, initial_balance: f64) -> Result<()> {
        if initial_balance < 0.0 {
            return Err(BankError::BadAmount);
        }
        let owner = self.current_customer()?.national_id.clone();
        self.add_account(Account::new_standard(number, owner, initial_balance))
    }

    pub fn open_savings_account(
        &mut self,
        number: String,
        initial_balance: f64,
        interest_rate: f64,
        withdrawal_cap: u32,
    ) -> Result<()> {
        if initial_balance < 0.0 {
            return Err(BankError::BadAmount);
        }
        if interest_rate < 0.0 {
            return Err(BankError::BadLimit);
        }
        let owner = self.current_customer()?.national_id.clone();
        self.add_account(Account::new_savings(
            number,
            owner,
            initial_balance,
            interest_rate,
            withdrawal_cap,
            money::today(),
        ))
    }

    fn add_account(&mut self, account: Account) -> Result<()> {
        if self.accounts.iter().any(|a| a.number == account.number) {
            return Err(BankError::AccountNumberTaken(account.number.clone()));
        }
        let number = account.number.clone();
        self.accounts.push(account);
        self.current_customer_mut()?.attach_account(number);
        self.persist_accounts();
        Ok(())
    }

    /// Pay cash into the indexed account and log a deposit entry.
    pub fn deposit_cash(&mut self, account_index: usize, amount: f64) -> Result<()> {
        if !is_valid_amount(amount) {
            return Err(BankError::BadAmount);
        }
        let number = self.account_number_at(account_index)?;
        let account = self.account_mut(&number)?;
        if !account.deposit(amount) {
            return Err(BankError::BadAmount);
        }
        self.transactions.push(TransactionEntry::deposit(amount));
        self.persist_accounts();
        self.persist_transactions();
        Ok(())
    }

    /// Withdraw cash from the indexed account and log a withdrawal entry.
    pub fn withdraw_cash(&mut self, account_index: usize, amount: f64) -> Result<()> {
        if !is_valid_amount(amount) {
            return Err(BankError::BadAmount);
        }
        let number = self.account_number_at(account_index)?;
        let account = self.account_mut(&number)?;
        if account.cap_reached() {
            return Err(BankError::WithdrawalCapReached);
        }
        if !account.withdraw(amount) {
            return Err(BankError::InsufficientFunds);
        }
        self.transactions.push(TransactionEntry::withdrawal(amount));
        self.persist_accounts();
        self.persist_transactions();
        Ok(())
    }

    /// Move funds out of the indexed account and log a transfer entry.
    /// The destination is any string; it is deliberately not checked
    /// against the account collection, so one-sided transfers to outside
    /// accounts go through.
    pub fn transfer(&mut self, account_index: usize, destination: String, amount: f64) -> Result<()> {
        if !is_valid_amount(amount) {
            return Err(BankError::BadAmount);
        }
        let source = self.account_number_at(account_index)?;
        let account = self.account_mut(&source)?;
        if account.cap_reached() {
            return Err(BankError::WithdrawalCapReached);
        }
        if !account.withdraw(amount) {
            return Err(BankError::InsufficientFunds);
        }
        self.transactions
            .push(TransactionEntry::transfer(amount, source, destination));
        self.persist_accounts();
        self.persist_transactions();
        Ok(())
    }

    /// Run interest capitalization on the indexed savings account as of
    /// `today`. Returns the interest applied (0.0 when not yet due).
    pub fn capitalize_at(&mut self, account_index: usize, today: NaiveDate) -> Result<f64> {
        let number = self.account_number_at(account_index)?;
        let account = self.account_mut(&number)?;
        if !account.is_savings() {
            return Err(BankError::NotSavings);
        }
        let interest = account.capitalize_at(today);
        if interest > 0.0 {
            self.persist_accounts();
        }
        Ok(interest)
    }

    /// [`Bank::capitalize_at`] against the current local date.
    pub fn capitalize(&mut self, account_index: usize) -> Result<f64> {
        self.capitalize_at(account_index, money::today())
    }

    /// Close the indexed account, cascading over everything keyed by its
    /// number: linked deposits and cards are removed from the global
    /// collections and from the customer's view, then all three
    /// collections are persisted.
    pub fn close_account(&mut self, account_index: usize) -> Result<()> {
        let number = self.account_number_at(account_index)?;

        self.deposits.retain(|d| d.linked_account != number);
        let removed_cards: HashSet<String> = self
            .cards
            .iter()
            .filter(|c| c.linked_account() == number)
            .map(|c| c.number.clone())
            .collect();
        self.cards.retain(|c| c.linked_account() != number);
        self.accounts.retain(|a| a.number != number);

        let kept_deposits: HashSet<String> = self.deposits.iter().map(|d| d.id.clone()).collect();
        let customer = self.current_customer_mut()?;
        customer.detach_account(&number);
        customer.card_numbers.retain(|n| !removed_cards.contains(n));
        customer.deposit_ids.retain(|id| kept_deposits.contains(id));

        self.persist_accounts();
        self.persist_cards();
        self.persist_deposits();
        Ok(())
    }

    // ========================================================================
    // CARDS
    // ========================================================================

    /// Issue a debit card against the indexed account. Expiry, PIN and
    /// limit are validated up front; the customer must already have an
    /// account.
    pub fn issue_card(
        &mut self,
        account_index: usize,
        number: String,
        expiry: &str,
        cvc: String,
        pin: String,
        daily_limit: f64,
    ) -> Result<()> {
        let linked = self.account_number_at(account_index)?;
        let card = Card::new_debit(number, expiry, cvc, pin, linked, daily_limit)?;
        let card_number = card.number.clone();
        self.cards.push(card);
        self.current_customer_mut()?.attach_card(card_number);
        self.persist_cards();
        Ok(())
    }

    /// Spend against the daily limit of the indexed card (the customer's
    /// view, not the global collection).
    pub fn pay_with_card_at(&mut self, card_index: usize, amount: f64, today: NaiveDate) -> Result<()> {
        if !is_valid_amount(amount) {
            return Err(BankError::BadAmount);
        }
        let number = self.card_number_at(card_index)?;
        let card = self.card_mut(&number)?;
        if !card.is_valid_at(today) {
            return Err(BankError::CardExpired);
        }
        if !card.pay_at(amount, today) {
            return Err(BankError::DailyLimitExceeded);
        }
        self.persist_cards();
        Ok(())
    }

    /// [`Bank::pay_with_card_at`] against the current local date.
    pub fn pay_with_card(&mut self, card_index: usize, amount: f64) -> Result<()> {
        self.pay_with_card_at(card_index, amount, money::today())
    }

    /// Drop the indexed card from the customer's view only. The global
    /// row stays behind as an orphan.
    pub fn close_card(&mut self, card_index: usize) -> Result<()> {
        let number = self.card_number_at(card_index)?;
        self.current_customer_mut()?.detach_card(&number);
        self.persist_cards();
        Ok(())
    }

    // ========================================================================
    // DEPOSITS
    // ========================================================================

    /// Open a term deposit funded from the indexed account. The principal
    /// is withdrawn from the account; insufficient balance rejects the
    /// whole operation.
    pub fn open_deposit(
        &mut self,
        account_index: usize,
        amount: f64,
        interest_rate: f64,
        maturity: &str,
    ) -> Result<()> {
        if !is_valid_amount(amount) {
            return Err(BankError::BadAmount);
        }
        let number = self.account_number_at(account_index)?;
        let deposit = TermDeposit::new(amount, interest_rate, maturity, number.clone())?;
        let account = self.account_mut(&number)?;
        if account.balance < amount {
            return Err(BankError::InsufficientFunds);
        }
        if account.cap_reached() {
            return Err(BankError::WithdrawalCapReached);
        }
        if !account.withdraw(amount) {
            return Err(BankError::InsufficientFunds);
        }
        let id = deposit.id.clone();
        self.deposits.push(deposit);
        self.current_customer_mut()?.attach_deposit(id);
        self.persist_deposits();
        self.persist_accounts();
        Ok(())
    }

    // ========================================================================
    // VIEWS
    // ========================================================================

    pub fn history(&self) -> &[TransactionEntry] {
        &self.transactions
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn deposits(&self) -> &[TermDeposit] {
        &self.deposits
    }

    /// Accounts attached to the logged-in customer, in view order.
    pub fn current_accounts(&self) -> Result<Vec<&Account>> {
        let customer = self.current_customer()?;
        Ok(customer
            .account_numbers
            .iter()
            .filter_map(|number| self.accounts.iter().find(|a| &a.number == number))
            .collect())
    }

    /// Cards attached to the logged-in customer, in view order.
    pub fn current_cards(&self) -> Result<Vec<&Card>> {
        let customer = self.current_customer()?;
        Ok(customer
            .card_numbers
            .iter()
            .filter_map(|number| self.cards.iter().find(|c| &c.number == number))
            .collect())
    }

    /// Deposits attached to the logged-in customer, in view order.
    pub fn current_deposits(&self) -> Result<Vec<&TermDeposit>> {
        let customer = self.current_customer()?;
        Ok(customer
            .deposit_ids
            .iter()
            .filter_map(|id| self.deposits.iter().find(|d| &d.id == id))
            .collect())
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    fn account_number_at(&self, index: usize) -> Result<String> {
        let customer = self.current_customer()?;
        if customer.account_numbers.is_empty() {
            return Err(BankError::NoAccounts);
        }
        customer
            .account_numbers
            .get(index)
            .cloned()
            .ok_or_else(|| BankError::NoSuchAccount(format!("index {index}")))
    }

    fn card_number_at(&self, index: usize) -> Result<String> {
        let customer = self.current_customer()?;
        customer
            .card_numbers
            .get(index)
            .cloned()
            .ok_or_else(|| BankError::NoSuchCard(format!("index {index}")))
    }

    fn account_mut(&mut self, number: &str) -> Result<&mut Account> {
        self.accounts
            .iter_mut()
            .find(|a| a.number == number)
            .ok_or_else(|| BankError::NoSuchAccount(number.to_string()))
    }

    fn card_mut(&mut self, number: &str) -> Result<&mut Card> {
        self.cards
            .iter_mut()
            .find(|c| c.number == number)
            .ok_or_else(|| BankError::NoSuchCard(number.to_string()))
    }

    fn persist_customers(&self) {
        if let Err(err) = self.store.save_customers(&self.customers) {
            error!(%err, "failed to persist customers");
        }
    }

    fn persist_accounts(&self) {
        if let Err(err) = self.store.save_accounts(&self.accounts) {
            error!(%err, "failed to persist accounts");
        }
    }

    fn persist_cards(&self) {
        if let Err(err) = self.store.save_cards(&self.cards) {
            error!(%err, "failed to persist cards");
        }
    }

    fn persist_deposits(&self) {
        if let Err(err) = self.store.save_deposits(&self.deposits) {
            error!(%err, "failed to persist deposits");
        }
    }

    fn persist_transactions(&self) {
        if let Err(err) = self.store.save_transactions(&self.transactions) {
            error!(%err, "failed to persist transactions");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::TransactionKind;
    use tempfile::{tempdir, TempDir};

    fn empty_bank() -> (Bank, TempDir) {
        let dir = tempdir().unwrap();
        let bank = Bank::load(JsonStore::new(dir.path().join("dane.json")));
        (bank, dir)
    }

    fn register_alice(bank: &mut Bank) {
        bank.register(
            "Alice".to_string(),
            "Nowak".to_string(),
            "111".to_string(),
            "alice".to_string(),
            "pw1".to_string(),
        )
        .unwrap();
    }

    #[test]
    fn test_register_rejects_taken_login() {
        let (mut bank, _dir) = empty_bank();
        register_alice(&mut bank);
        let result = bank.register(
            "Bob".to_string(),
            "Kowalski".to_string(),
            "222".to_string(),
            "alice".to_string(),
            "pw2".to_string(),
        );
        assert!(matches!(result, Err(BankError::LoginTaken(_))));
        assert_eq!(bank.customers().len(), 1);
    }

    #[test]
    fn test_register_rejects_taken_national_id() {
        let (mut bank, _dir) = empty_bank();
        register_alice(&mut bank);
        let result = bank.register(
            "Bob".to_string(),
            "Kowalski".to_string(),
            "111".to_string(),
            "bob".to_string(),
            "pw2".to_string(),
        );
        assert!(matches!(result, Err(BankError::NationalIdTaken(_))));
    }

    #[test]
    fn test_register_opens_session() {
        let (mut bank, _dir) = empty_bank();
        register_alice(&mut bank);
        assert_eq!(bank.current_customer().unwrap().login, "alice");
    }

    #[test]
    fn test_login_exact_match_only() {
        let (mut bank, _dir) = empty_bank();
        register_alice(&mut bank);
        bank.logout();
        assert!(bank.current_customer().is_err());

        assert!(!bank.login("alice", "wrong"));
        assert!(bank.current_customer().is_err());
        assert!(!bank.login("nobody", "pw1"));
        assert!(bank.login("alice", "pw1"));
        assert_eq!(bank.current_customer().unwrap().national_id, "111");
    }

    #[test]
    fn test_operations_require_session() {
        let (mut bank, _dir) = empty_bank();
        assert!(matches!(
            bank.open_standard_account("PL01".to_string(), 100.0),
            Err(BankError::NoSession)
        ));
        assert!(matches!(bank.withdraw_cash(0, 10.0), Err(BankError::NoSession)));
    }

    #[test]
    fn test_standard_account_withdraw_scenario() {
        let (mut bank, _dir) = empty_bank();
        register_alice(&mut bank);
        bank.open_standard_account("PL01".to_string(), 100.0).unwrap();

        let rejected = bank.withdraw_cash(0, 150.0);
        assert!(matches!(rejected, Err(BankError::InsufficientFunds)));
        assert_eq!(bank.current_accounts().unwrap()[0].balance, 100.0);

        bank.withdraw_cash(0, 50.0).unwrap();
        assert_eq!(bank.current_accounts().unwrap()[0].balance, 50.0);
        assert_eq!(bank.history().len(), 1);
        assert_eq!(bank.history()[0].kind, TransactionKind::Withdrawal);
    }

    #[test]
    fn test_savings_cap_scenario() {
        let (mut bank, _dir) = empty_bank();
        register_alice(&mut bank);
        bank.open_savings_account("PL02".to_string(), 1000.0, 3.0, 1)
            .unwrap();

        bank.withdraw_cash(0, 10.0).unwrap();
        let second = bank.withdraw_cash(0, 10.0);
        assert!(matches!(second, Err(BankError::WithdrawalCapReached)));
        assert_eq!(bank.current_accounts().unwrap()[0].balance, 990.0);
    }

    #[test]
    fn test_duplicate_account_number_rejected() {
        let (mut bank, _dir) = empty_bank();
        register_alice(&mut bank);
        bank.open_standard_account("PL01".to_string(), 0.0).unwrap();
        let result = bank.open_standard_account("PL01".to_string(), 0.0);
        assert!(matches!(result, Err(BankError::AccountNumberTaken(_))));
    }

    #[test]
    fn test_deposit_cash_logs_entry() {
        let (mut bank, _dir) = empty_bank();
        register_alice(&mut bank);
        bank.open_standard_account("PL01".to_string(), 0.0).unwrap();
        bank.deposit_cash(0, 75.0).unwrap();
        assert_eq!(bank.current_accounts().unwrap()[0].balance, 75.0);
        assert_eq!(bank.history()[0].kind, TransactionKind::Deposit);
        assert!(bank.history()[0].sender.is_empty());
    }

    #[test]
    fn test_transfer_destination_is_not_validated() {
        let (mut bank, _dir) = empty_bank();
        register_alice(&mut bank);
        bank.open_standard_account("PL01".to_string(), 100.0).unwrap();

        bank.transfer(0, "PL-DOES-NOT-EXIST".to_string(), 40.0).unwrap();
        assert_eq!(bank.current_accounts().unwrap()[0].balance, 60.0);

        let entry = &bank.history()[0];
        assert_eq!(entry.kind, TransactionKind::Transfer);
        assert_eq!(entry.sender, "PL01");
        assert_eq!(entry.receiver, "PL-DOES-NOT-EXIST");
    }

    #[test]
    fn test_transfer_insufficient_funds() {
        let (mut bank, _dir) = empty_bank();
        register_alice(&mut bank);
        bank.open_standard_account("PL01".to_string(), 10.0).unwrap();
        let result = bank.transfer(0, "PL99".to_string(), 40.0);
        assert!(matches!(result, Err(BankError::InsufficientFunds)));
        assert!(bank.history().is_empty());
    }

    #[test]
    fn test_issue_card_requires_an_account() {
        let (mut bank, _dir) = empty_bank();
        register_alice(&mut bank);
        let result = bank.issue_card(
            0,
            "4000".to_string(),
            "0130",
            "123".to_string(),
            "1234".to_string(),
            500.0,
        );
        assert!(matches!(result, Err(BankError::NoAccounts)));
    }

    #[test]
    fn test_issue_card_validates_input() {
        let (mut bank, _dir) = empty_bank();
        register_alice(&mut bank);
        bank.open_standard_account("PL01".to_string(), 100.0).unwrap();

        let bad_pin = bank.issue_card(
            0,
            "4000".to_string(),
            "0130",
            "123".to_string(),
            "12".to_string(),
            500.0,
        );
        assert!(matches!(bad_pin, Err(BankError::BadPin)));

        bank.issue_card(
            0,
            "4000".to_string(),
            "01/2030",
            "123".to_string(),
            "1234".to_string(),
            500.0,
        )
        .unwrap();
        let cards = bank.current_cards().unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].expiry, "0130");
        assert_eq!(cards[0].linked_account(), "PL01");
    }

    #[test]
    fn test_pay_with_card_persists_limit() {
        let (mut bank, dir) = empty_bank();
        register_alice(&mut bank);
        bank.open_standard_account("PL01".to_string(), 100.0).unwrap();
        bank.issue_card(
            0,
            "4000".to_string(),
            "0130",
            "123".to_string(),
            "1234".to_string(),
            500.0,
        )
        .unwrap();

        bank.pay_with_card(0, 200.0).unwrap();
        assert_eq!(bank.current_cards().unwrap()[0].daily_limit(), 300.0);

        let over = bank.pay_with_card(0, 400.0);
        assert!(matches!(over, Err(BankError::DailyLimitExceeded)));

        // The decremented limit made it to disk.
        let reloaded = Bank::load(JsonStore::new(dir.path().join("dane.json")));
        assert_eq!(reloaded.cards()[0].daily_limit(), 300.0);
    }

    #[test]
    fn test_open_deposit_withdraws_principal() {
        let (mut bank, _dir) = empty_bank();
        register_alice(&mut bank);
        bank.open_standard_account("PL01".to_string(), 500.0).unwrap();

        let too_big = bank.open_deposit(0, 600.0, 4.0, "0630");
        assert!(matches!(too_big, Err(BankError::InsufficientFunds)));
        assert!(bank.current_deposits().unwrap().is_empty());

        bank.open_deposit(0, 300.0, 4.0, "06/2030").unwrap();
        assert_eq!(bank.current_accounts().unwrap()[0].balance, 200.0);
        let deposits = bank.current_deposits().unwrap();
        assert_eq!(deposits.len(), 1);
        assert_eq!(deposits[0].maturity, "0630");
        assert_eq!(deposits[0].linked_account, "PL01");
    }

    #[test]
    fn test_capitalize_through_controller() {
        let (mut bank, _dir) = empty_bank();
        register_alice(&mut bank);
        bank.open_savings_account("PL02".to_string(), 1200.0, 6.0, 5)
            .unwrap();

        let next_year = money::today()
            .checked_add_months(chrono::Months::new(12))
            .unwrap();
        let interest = bank.capitalize_at(0, next_year).unwrap();
        assert!((interest - 6.0).abs() < 1e-9);
        assert_eq!(bank.capitalize_at(0, next_year).unwrap(), 0.0);
    }

    #[test]
    fn test_capitalize_rejects_standard_account() {
        let (mut bank, _dir) = empty_bank();
        register_alice(&mut bank);
        bank.open_standard_account("PL01".to_string(), 100.0).unwrap();
        assert!(matches!(bank.capitalize(0), Err(BankError::NotSavings)));
    }

    #[test]
    fn test_close_account_cascades() {
        let (mut bank, dir) = empty_bank();
        register_alice(&mut bank);
        bank.open_standard_account("PL01".to_string(), 500.0).unwrap();
        bank.open_standard_account("PL02".to_string(), 100.0).unwrap();
        bank.issue_card(
            0,
            "4000".to_string(),
            "0130",
            "123".to_string(),
            "1234".to_string(),
            500.0,
        )
        .unwrap();
        bank.open_deposit(0, 200.0, 4.0, "0630").unwrap();

        bank.close_account(0).unwrap();

        assert_eq!(bank.accounts().len(), 1);
        assert_eq!(bank.accounts()[0].number, "PL02");
        assert!(bank.cards().is_empty());
        assert!(bank.deposits().is_empty());
        assert!(bank.current_cards().unwrap().is_empty());
        assert!(bank.current_deposits().unwrap().is_empty());
        assert_eq!(bank.current_accounts().unwrap().len(), 1);

        // Cascade reached the files.
        let reloaded = Bank::load(JsonStore::new(dir.path().join("dane.json")));
        assert_eq!(reloaded.accounts().len(), 1);
        assert!(reloaded.cards().is_empty());
        assert!(reloaded.deposits().is_empty());
    }

    #[test]
    fn test_close_card_orphans_global_row() {
        let (mut bank, _dir) = empty_bank();
        register_alice(&mut bank);
        bank.open_standard_account("PL01".to_string(), 100.0).unwrap();
        bank.issue_card(
            0,
            "4000".to_string(),
            "0130",
            "123".to_string(),
            "1234".to_string(),
            500.0,
        )
        .unwrap();

        bank.close_card(0).unwrap();
        assert!(bank.current_cards().unwrap().is_empty());
        assert_eq!(bank.cards().len(), 1);
    }

    #[test]
    fn test_relink_attaches_by_ownership_chain() {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("dane.json"));

        let c1 = Customer::new(
            "Alice".to_string(),
            "Nowak".to_string(),
            "111".to_string(),
            "alice".to_string(),
            "pw1".to_string(),
        );
        let c2 = Customer::new(
            "Bob".to_string(),
            "Kowalski".to_string(),
            "222".to_string(),
            "bob".to_string(),
            "pw2".to_string(),
        );
        store.save_customers(&[c1, c2]).unwrap();

        let a1 = Account::new_standard("A1".to_string(), "111".to_string(), 100.0);
        store.save_accounts(&[a1]).unwrap();

        let k1 = Card::new_debit(
            "K1".to_string(),
            "0130",
            "123".to_string(),
            "1234".to_string(),
            "A1".to_string(),
            500.0,
        )
        .unwrap();
        // K2 points at an account nobody owns.
        let k2 = Card::new_debit(
            "K2".to_string(),
            "0130",
            "123".to_string(),
            "1234".to_string(),
            "A9".to_string(),
            500.0,
        )
        .unwrap();
        store.save_cards(&[k1, k2]).unwrap();

        let d1 = TermDeposit::new(50.0, 4.0, "0630", "A1".to_string()).unwrap();
        store.save_deposits(&[d1]).unwrap();

        let bank = Bank::load(store);
        let alice = &bank.customers()[0];
        let bob = &bank.customers()[1];

        assert_eq!(alice.account_numbers, vec!["A1"]);
        assert_eq!(alice.card_numbers, vec!["K1"]);
        assert_eq!(alice.deposit_ids.len(), 1);

        assert!(bob.account_numbers.is_empty());
        assert!(bob.card_numbers.is_empty());
        assert!(bob.deposit_ids.is_empty());

        // The orphan stays in the global collection, attached to nobody.
        assert_eq!(bank.cards().len(), 2);
    }

    #[test]
    fn test_state_survives_reload() {
        let dir = tempdir().unwrap();
        {
            let mut bank = Bank::load(JsonStore::new(dir.path().join("dane.json")));
            register_alice(&mut bank);
            bank.open_savings_account("PL02".to_string(), 1000.0, 3.0, 2)
                .unwrap();
            bank.transfer(0, "PL99".to_string(), 100.0).unwrap();
        }

        let mut bank = Bank::load(JsonStore::new(dir.path().join("dane.json")));
        assert!(bank.login("alice", "pw1"));
        let accounts = bank.current_accounts().unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].balance, 900.0);
        assert!(accounts[0].is_savings());
        assert_eq!(bank.history().len(), 1);
    }
}
