//! In-memory stores for users and transactions
//!
//! The service keeps business data in process memory, consistent with its
//! analytics posture; everything is cleared on restart.

use crate::utils::error::{AppError, Result};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::{Deserialize, Serialize};

/// A registered user
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Concurrent user table keyed by email, with an id index
#[derive(Debug, Default)]
pub struct UserStore {
    by_email: DashMap<String, UserAccount>,
    id_to_email: DashMap<String, String>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new account; fails when the email is already registered
    pub fn create(&self, account: UserAccount) -> Result<()> {
        match self.by_email.entry(account.email.clone()) {
            Entry::Occupied(_) => Err(AppError::Conflict("Email already registered".to_string())),
            Entry::Vacant(slot) => {
                self.id_to_email
                    .insert(account.id.clone(), account.email.clone());
                slot.insert(account);
                Ok(())
            }
        }
    }

    pub fn find_by_email(&self, email: &str) -> Option<UserAccount> {
        self.by_email.get(email).map(|entry| entry.clone())
    }

    pub fn find_by_id(&self, id: &str) -> Option<UserAccount> {
        let email = self.id_to_email.get(id)?;
        self.by_email.get(email.value()).map(|entry| entry.clone())
    }

    pub fn len(&self) -> usize {
        self.by_email.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_email.is_empty()
    }
}

/// Income or expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// One recorded transaction
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Listing filter; all fields optional
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    /// Case-insensitive category substring
    pub category: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl TransactionFilter {
    fn matches(&self, transaction: &Transaction) -> bool {
        if let Some(kind) = self.kind {
            if transaction.kind != kind {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !transaction
                .category
                .to_lowercase()
                .contains(&category.to_lowercase())
            {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if transaction.date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if transaction.date > end {
                return false;
            }
        }
        true
    }
}

/// Per-category rollup
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    pub count: u64,
}

/// Financial summary for one user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
    pub income_categories: Vec<CategoryTotal>,
    pub expense_categories: Vec<CategoryTotal>,
    pub total_transactions: u64,
}

/// Concurrent per-user transaction store
#[derive(Debug, Default)]
pub struct TransactionStore {
    by_user: DashMap<String, Vec<Transaction>>,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a transaction under its owner
    pub fn insert(&self, transaction: Transaction) -> Transaction {
        self.by_user
            .entry(transaction.user_id.clone())
            .or_default()
            .push(transaction.clone());
        transaction
    }

    /// The user's matching transactions, newest-first, with the total match
    /// count before pagination
    pub fn list(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
        page: usize,
        limit: usize,
    ) -> (Vec<Transaction>, usize) {
        let Some(entries) = self.by_user.get(user_id) else {
            return (Vec::new(), 0);
        };

        let mut matching: Vec<Transaction> = entries
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.date.cmp(&a.date));

        let total = matching.len();
        let page = page.max(1);
        let items = matching
            .into_iter()
            .skip((page - 1) * limit)
            .take(limit)
            .collect();
        (items, total)
    }

    /// Remove the user's transaction by id; false when absent or owned by
    /// another user
    pub fn delete(&self, user_id: &str, transaction_id: &str) -> bool {
        let Some(mut entries) = self.by_user.get_mut(user_id) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|t| t.id != transaction_id);
        entries.len() < before
    }

    /// Aggregate the user's matching transactions
    pub fn summary(&self, user_id: &str, filter: &TransactionFilter) -> TransactionSummary {
        let matching: Vec<Transaction> = self
            .by_user
            .get(user_id)
            .map(|entries| entries.iter().filter(|t| filter.matches(t)).cloned().collect())
            .unwrap_or_default();

        let mut income = 0.0;
        let mut expenses = 0.0;
        let mut income_categories: Vec<CategoryTotal> = Vec::new();
        let mut expense_categories: Vec<CategoryTotal> = Vec::new();

        for transaction in &matching {
            let (total, categories) = match transaction.kind {
                TransactionKind::Income => (&mut income, &mut income_categories),
                TransactionKind::Expense => (&mut expenses, &mut expense_categories),
            };
            *total += transaction.amount;
            match categories
                .iter_mut()
                .find(|c| c.category == transaction.category)
            {
                Some(entry) => {
                    entry.total += transaction.amount;
                    entry.count += 1;
                }
                None => categories.push(CategoryTotal {
                    category: transaction.category.clone(),
                    total: transaction.amount,
                    count: 1,
                }),
            }
        }

        income_categories.sort_by(|a, b| b.total.total_cmp(&a.total));
        expense_categories.sort_by(|a, b| b.total.total_cmp(&a.total));

        TransactionSummary {
            income,
            expenses,
            balance: income - expenses,
            income_categories,
            expense_categories,
            total_transactions: matching.len() as u64,
        }
    }
}
