// Customer entity.
//
// The personal fields are the persisted state; the three reference lists
// are session state rebuilt by relinking after every load. Ownership of
// accounts, cards and deposits is expressed only through these opaque IDs,
// never through direct references into the global collections.

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,

    /// National ID, the foreign key accounts point at. Unique across
    /// customers at registration time.
    pub national_id: String,

    /// Unique at registration time.
    pub login: String,

    /// Plaintext, compared with exact equality.
    pub password: String,

    /// Numbers of the attached accounts, in relink order.
    pub account_numbers: Vec<String>,

    /// Numbers of the attached cards.
    pub card_numbers: Vec<String>,

    /// In-memory IDs of the attached deposits.
    pub deposit_ids: Vec<String>,
}

impl Customer {
    pub fn new(
        first_name: String,
        last_name: String,
        national_id: String,
        login: String,
        password: String,
    ) -> Customer {
        Customer {
            first_name,
            last_name,
            national_id,
            login,
            password,
            account_numbers: Vec::new(),
            card_numbers: Vec::new(),
            deposit_ids: Vec::new(),
        }
    }

    pub fn owns_account(&self, number: &str) -> bool {
        self.account_numbers.iter().any(|n| n == number)
    }

    pub fn attach_account(&mut self, number: String) {
        if !self.owns_account(&number) {
            self.account_numbers.push(number);
        }
    }

    pub fn detach_account(&mut self, number: &str) {
        self.account_numbers.retain(|n| n != number);
    }

    pub fn attach_card(&mut self, number: String) {
        if !self.card_numbers.iter().any(|n| n == &number) {
            self.card_numbers.push(number);
        }
    }

    pub fn detach_card(&mut self, number: &str) {
        self.card_numbers.retain(|n| n != number);
    }

    pub fn attach_deposit(&mut self, id: String) {
        if !self.deposit_ids.iter().any(|d| d == &id) {
            self.deposit_ids.push(id);
        }
    }

    /// Drop all attached references. Run before a fresh relink pass.
    pub fn clear_attachments(&mut self) {
        self.account_numbers.clear();
        self.card_numbers.clear();
        self.deposit_ids.clear();
    }

    /// Exact plaintext credential match.
    pub fn credentials_match(&self, login: &str, password: &str) -> bool {
        self.login == login && self.password == password
    }
}
