use chrono::NaiveDate;
use ledger_api::endpoints::{
    accounts::AccountRecord, analytics::BalancesOverviewResponse, budgets::BudgetRecord,
    transactions::TransactionRecord,
};

use crate::optimistic::Identified;

/// Raw category code assigned when the ledger has no classification
pub const UNCATEGORIZED: &str = "OTHER";
/// Display name assigned when the ledger has no merchant name
pub const UNKNOWN_MERCHANT: &str = "Unknown";

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// `YYYY-MM-DD..YYYY-MM-DD`, used inside fetch signatures
    pub fn key(&self) -> String {
        format!(
            "{}..{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionCategory {
    pub primary: String,
    pub detailed: Option<String>,
    pub confidence: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub name: String,
    pub merchant: Option<String>,
    /// Positive amounts are outflows (expenses)
    pub amount: f64,
    pub category: TransactionCategory,
    pub account_name: String,
    pub account_type: String,
    pub account_mask: Option<String>,
    pub running_balance: Option<f64>,
}

impl From<TransactionRecord> for Transaction {
    fn from(record: TransactionRecord) -> Self {
        let merchant = record.merchant_name.filter(|m| !m.trim().is_empty());
        Self {
            id: record.id,
            date: record.date,
            name: merchant
                .clone()
                .unwrap_or_else(|| UNKNOWN_MERCHANT.to_string()),
            merchant,
            amount: record.amount,
            category: TransactionCategory {
                primary: record
                    .category_primary
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or_else(|| UNCATEGORIZED.to_string()),
                detailed: record.category_detailed,
                confidence: record.category_confidence,
            },
            account_name: record.account_name,
            account_type: record.account_type,
            account_mask: record.account_mask,
            running_balance: record.running_balance,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    pub id: String,
    pub category: String,
    pub amount: f64,
}

impl Identified for Budget {
    fn id(&self) -> &str {
        &self.id
    }
}

impl From<BudgetRecord> for Budget {
    fn from(record: BudgetRecord) -> Self {
        Self {
            id: record.id,
            category: record.category,
            amount: record.amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub account_type: String,
    pub mask: Option<String>,
}

impl From<AccountRecord> for Account {
    fn from(record: AccountRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            account_type: record.account_type,
            mask: record.mask,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountBalance {
    pub account_id: String,
    pub name: String,
    pub account_type: String,
    pub current_balance: f64,
    pub available_balance: Option<f64>,
}

impl AccountBalance {
    /// Credit and loan balances are amounts owed
    pub fn is_liability(&self) -> bool {
        matches!(
            self.account_type.to_lowercase().as_str(),
            "credit" | "loan" | "credit_card" | "mortgage"
        )
    }
}

/// Latest balance snapshot across the selected accounts
#[derive(Debug, Clone, PartialEq)]
pub struct BalancesOverview {
    pub accounts: Vec<AccountBalance>,
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub net_worth: f64,
}

impl BalancesOverview {
    pub fn from_accounts(accounts: Vec<AccountBalance>) -> Self {
        let (liabilities, assets): (Vec<&AccountBalance>, Vec<&AccountBalance>) =
            accounts.iter().partition(|a| a.is_liability());
        let total_assets = assets.iter().fold(0.0, |total, a| total + a.current_balance);
        let total_liabilities = liabilities
            .iter()
            .fold(0.0, |total, a| total + a.current_balance.abs());

        Self {
            total_assets,
            total_liabilities,
            net_worth: total_assets - total_liabilities,
            accounts,
        }
    }
}

impl From<BalancesOverviewResponse> for BalancesOverview {
    fn from(response: BalancesOverviewResponse) -> Self {
        let accounts = response
            .accounts
            .into_iter()
            .map(|a| AccountBalance {
                account_id: a.account_id,
                name: a.name,
                account_type: a.account_type,
                current_balance: a.current_balance,
                available_balance: a.available_balance,
            })
            .collect();
        Self::from_accounts(accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(merchant: Option<&str>, category: Option<&str>) -> TransactionRecord {
        TransactionRecord {
            id: "t1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            merchant_name: merchant.map(String::from),
            amount: 12.5,
            category_primary: category.map(String::from),
            category_detailed: None,
            category_confidence: Some("HIGH".to_string()),
            account_name: "Checking".to_string(),
            account_type: "depository".to_string(),
            account_mask: None,
            running_balance: Some(100.0),
        }
    }

    #[test]
    fn transaction_defaults_name_and_category() {
        let txn = Transaction::from(record(None, None));
        assert_eq!(txn.name, "Unknown");
        assert_eq!(txn.merchant, None);
        assert_eq!(txn.category.primary, "OTHER");

        let txn = Transaction::from(record(Some("Whole Foods"), Some("GROCERIES")));
        assert_eq!(txn.name, "Whole Foods");
        assert_eq!(txn.merchant.as_deref(), Some("Whole Foods"));
        assert_eq!(txn.category.primary, "GROCERIES");
        assert_eq!(txn.category.confidence.as_deref(), Some("HIGH"));
    }

    #[test]
    fn date_range_is_inclusive() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        );
        assert!(range.contains(range.start));
        assert!(range.contains(range.end));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
        assert_eq!(range.key(), "2024-01-01..2024-01-31");
    }

    #[test]
    fn net_worth_subtracts_liabilities() {
        let overview = BalancesOverview::from_accounts(vec![
            AccountBalance {
                account_id: "a".to_string(),
                name: "Checking".to_string(),
                account_type: "depository".to_string(),
                current_balance: 5000.0,
                available_balance: None,
            },
            AccountBalance {
                account_id: "b".to_string(),
                name: "Visa".to_string(),
                account_type: "credit".to_string(),
                current_balance: 1200.0,
                available_balance: None,
            },
        ]);
        assert_eq!(overview.total_assets, 5000.0);
        assert_eq!(overview.total_liabilities, 1200.0);
        assert_eq!(overview.net_worth, 3800.0);
    }

    #[test]
    fn empty_overview_totals_are_positive_zero() {
        let overview = BalancesOverview::from_accounts(Vec::new());
        assert_eq!(format!("{:.2}", overview.net_worth), "0.00");
        assert!(overview.total_assets.is_sign_positive());
        assert!(overview.total_liabilities.is_sign_positive());
    }
}
