use crate::category::CategoryKey;
use crate::model::{DateRange, Transaction};

/// Case-insensitive substring match on the display name or raw merchant.
/// A blank query keeps everything.
pub fn filter_by_search(transactions: Vec<Transaction>, query: &str) -> Vec<Transaction> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return transactions;
    }

    transactions
        .into_iter()
        .filter(|txn| {
            txn.name.to_lowercase().contains(&needle)
                || txn
                    .merchant
                    .as_ref()
                    .is_some_and(|m| m.to_lowercase().contains(&needle))
        })
        .collect()
}

pub fn filter_by_category(transactions: Vec<Transaction>, category: Option<&str>) -> Vec<Transaction> {
    let Some(category) = category.filter(|c| !c.trim().is_empty()) else {
        return transactions;
    };
    let key = CategoryKey::new(category);

    transactions
        .into_iter()
        .filter(|txn| key.matches(&txn.category.primary))
        .collect()
}

pub fn filter_by_date_range(transactions: Vec<Transaction>, range: Option<DateRange>) -> Vec<Transaction> {
    match range {
        Some(range) => transactions
            .into_iter()
            .filter(|txn| range.contains(txn.date))
            .collect(),
        None => transactions,
    }
}

/// Newest first. Ties keep their incoming order.
pub fn sort_by_date_desc(mut transactions: Vec<Transaction>) -> Vec<Transaction> {
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
    transactions
}

/// Local filters for the transactions list, applied in a fixed order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub search: String,
    pub category: Option<String>,
    pub date_range: Option<DateRange>,
}

impl TransactionFilter {
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && self.category.is_none() && self.date_range.is_none()
    }

    pub fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        let filtered = filter_by_search(transactions.to_vec(), &self.search);
        let filtered = filter_by_category(filtered, self.category.as_deref());
        let filtered = filter_by_date_range(filtered, self.date_range);
        sort_by_date_desc(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TransactionCategory;
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn txn(id: &str, day: u32, merchant: Option<&str>, category: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            date: date(day),
            name: merchant.unwrap_or("Unknown").to_string(),
            merchant: merchant.map(String::from),
            amount: 10.0,
            category: TransactionCategory {
                primary: category.to_string(),
                detailed: None,
                confidence: None,
            },
            account_name: "Checking".to_string(),
            account_type: "depository".to_string(),
            account_mask: None,
            running_balance: None,
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            txn("1", 3, Some("Whole Foods"), "GROCERIES"),
            txn("2", 10, Some("Shell"), "TRANSPORTATION"),
            txn("3", 7, None, "OTHER"),
            txn("4", 10, Some("Trader Joe's"), "Groceries"),
            txn("5", 21, Some("Netflix"), "ENTERTAINMENT"),
        ]
    }

    fn ids(transactions: &[Transaction]) -> Vec<&str> {
        transactions.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn search_is_case_insensitive_and_blank_is_noop() {
        let result = filter_by_search(sample(), "  FOODS ");
        assert_eq!(ids(&result), vec!["1"]);

        let result = filter_by_search(sample(), "unknown");
        assert_eq!(ids(&result), vec!["3"]);

        assert_eq!(filter_by_search(sample(), "   "), sample());
    }

    #[test]
    fn category_matches_raw_and_display_forms() {
        let result = filter_by_category(sample(), Some("groceries"));
        assert_eq!(ids(&result), vec!["1", "4"]);

        assert_eq!(filter_by_category(sample(), None), sample());
    }

    #[test]
    fn category_matches_multi_word_labels() {
        let transactions = vec![
            txn("1", 3, Some("Cafe"), "FOOD_AND_DRINK"),
            txn("2", 4, Some("Bistro"), "Food And Drink"),
            txn("3", 5, Some("Market"), "FOOD"),
        ];
        let by_code = filter_by_category(transactions.clone(), Some("FOOD_AND_DRINK"));
        assert_eq!(ids(&by_code), vec!["1", "2"]);

        let by_label = filter_by_category(transactions, Some("Food And Drink"));
        assert_eq!(ids(&by_label), vec!["1", "2"]);
    }

    #[test]
    fn date_range_is_inclusive() {
        let range = DateRange::new(date(7), date(10));
        let result = filter_by_date_range(sample(), Some(range));
        assert_eq!(ids(&result), vec!["2", "3", "4"]);
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let result = sort_by_date_desc(sample());
        assert_eq!(ids(&result), vec!["5", "2", "4", "3", "1"]);
    }

    #[test]
    fn apply_composes_and_is_idempotent() {
        let filter = TransactionFilter {
            search: "o".to_string(),
            category: Some("GROCERIES".to_string()),
            date_range: Some(DateRange::new(date(1), date(31))),
        };
        let once = filter.apply(&sample());
        assert_eq!(ids(&once), vec!["4", "1"]);
        assert_eq!(filter.apply(&once), once);

        let everything = TransactionFilter::default();
        assert!(everything.is_empty());
        let once = everything.apply(&sample());
        assert_eq!(everything.apply(&once), once);
    }
}
