pub mod accounts;
pub mod analytics;
pub mod budgets;
pub mod transactions;

use chrono::NaiveDate;
use url::form_urlencoded;

/// Date range and account scope shared by the list and analytics routes.
///
/// An empty `account_ids` means "every account"; the gateway applies no
/// account filter in that case.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct RangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub account_ids: Vec<String>,
}

impl RangeQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn account_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.account_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Encode as `start_date=...&end_date=...&account_ids[]=...`
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(start) = self.start_date {
            serializer.append_pair("start_date", &start.format("%Y-%m-%d").to_string());
        }
        if let Some(end) = self.end_date {
            serializer.append_pair("end_date", &end.format("%Y-%m-%d").to_string());
        }
        for id in &self.account_ids {
            serializer.append_pair("account_ids[]", id);
        }
        serializer.finish()
    }
}

pub(crate) fn endpoint_with_query(path: &str, query: &RangeQuery) -> String {
    let encoded = query.to_query_string();
    if encoded.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, encoded)
    }
}

/// Truncate an ISO date or datetime string to its calendar day.
///
/// No timezone conversion is applied: `2024-03-01T23:30:00-05:00` is the 1st.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

pub(crate) mod day {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, de::Error};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_day(&raw).ok_or_else(|| D::Error::custom(format!("invalid date '{}'", raw)))
    }
}

/// Amounts arrive as JSON numbers or numeric strings and leave as strings
pub(crate) mod amount {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    fn coerce<E: Error>(value: NumberOrString) -> Result<f64, E> {
        let parsed = match value {
            NumberOrString::Number(n) => n,
            NumberOrString::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("invalid amount '{}'", s)))?,
        };
        if parsed.is_finite() {
            Ok(parsed)
        } else {
            Err(E::custom("amount must be finite"))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        coerce(NumberOrString::deserialize(deserializer)?)
    }

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub mod option {
        use super::NumberOrString;
        use serde::{Deserialize, Deserializer};

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Option::<NumberOrString>::deserialize(deserializer)?
                .map(super::coerce::<D::Error>)
                .transpose()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn query_string_includes_range_and_accounts() {
        let query = RangeQuery::new()
            .range(date("2024-01-01"), date("2024-01-31"))
            .account_ids(["acc-1", "acc 2"]);
        assert_eq!(
            query.to_query_string(),
            "start_date=2024-01-01&end_date=2024-01-31&account_ids%5B%5D=acc-1&account_ids%5B%5D=acc+2"
        );
    }

    #[test]
    fn endpoint_without_query_has_no_question_mark() {
        assert_eq!(
            endpoint_with_query("/transactions", &RangeQuery::new()),
            "/transactions"
        );
    }

    #[test]
    fn parse_day_truncates_datetimes() {
        assert_eq!(parse_day("2024-03-01"), Some(date("2024-03-01")));
        assert_eq!(
            parse_day("2024-03-01T23:30:00-05:00"),
            Some(date("2024-03-01"))
        );
        assert_eq!(parse_day("03/01/2024"), None);
        assert_eq!(parse_day("2024"), None);
    }
}
