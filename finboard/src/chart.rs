use chrono::NaiveDate;
use itertools::Itertools;

use crate::model::Transaction;

const MIN_PADDING: f64 = 500.0;
const FLAT_PADDING_RATIO: f64 = 0.10;
const SPREAD_PADDING_RATIO: f64 = 0.08;
const MAX_DOTS: usize = 30;

/// One day of the cumulative net-flow series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetPoint {
    pub date: NaiveDate,
    pub net: f64,
}

/// Y-axis bounds `(lo, hi)` for a net-worth style series. Always `hi > lo`.
pub fn calculate_net_y_axis_domain(series: &[f64]) -> Option<(f64, f64)> {
    let (min, max) = match series.iter().copied().minmax_by(f64::total_cmp) {
        itertools::MinMaxResult::NoElements => return None,
        itertools::MinMaxResult::OneElement(v) => (v, v),
        itertools::MinMaxResult::MinMax(lo, hi) => (lo, hi),
    };

    let padding = if min == max {
        (min.abs() * FLAT_PADDING_RATIO).max(MIN_PADDING)
    } else {
        ((max - min) * SPREAD_PADDING_RATIO).max(MIN_PADDING)
    };

    Some((min - padding, max + padding))
}

/// Indices of points whose value differs from their predecessor, thinned to at
/// most 30. The final change-point is always kept.
pub fn calculate_net_dot_indices(series: &[f64]) -> Vec<usize> {
    let changes: Vec<usize> = series
        .iter()
        .tuple_windows()
        .positions(|(prev, curr)| prev != curr)
        .map(|i| i + 1)
        .collect();

    if changes.len() <= MAX_DOTS {
        return changes;
    }

    let Some((&last, head)) = changes.split_last() else {
        return changes;
    };
    let picks = MAX_DOTS - 1;
    let mut indices: Vec<usize> = (0..picks)
        .map(|k| head[k * head.len() / picks])
        .dedup()
        .collect();
    indices.push(last);
    indices
}

/// Cumulative net flow (inflows minus outflows) per day, oldest first
pub fn daily_net_series(transactions: &[Transaction]) -> Vec<NetPoint> {
    let mut running = 0.0;
    transactions
        .iter()
        .map(|txn| (txn.date, -txn.amount))
        .into_group_map()
        .into_iter()
        .sorted_by_key(|(date, _)| *date)
        .map(|(date, flows)| {
            running += flows.iter().sum::<f64>();
            NetPoint { date, net: running }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TransactionCategory;

    #[test]
    fn empty_series_has_no_domain() {
        assert_eq!(calculate_net_y_axis_domain(&[]), None);
    }

    #[test]
    fn flat_series_is_padded() {
        assert_eq!(calculate_net_y_axis_domain(&[100.0, 100.0]), Some((-400.0, 600.0)));
        assert_eq!(calculate_net_y_axis_domain(&[10_000.0]), Some((9_000.0, 11_000.0)));
        assert_eq!(calculate_net_y_axis_domain(&[0.0]), Some((-500.0, 500.0)));
    }

    #[test]
    fn spread_series_uses_proportional_padding() {
        assert_eq!(
            calculate_net_y_axis_domain(&[0.0, 100_000.0]),
            Some((-8_000.0, 108_000.0))
        );
        assert_eq!(calculate_net_y_axis_domain(&[0.0, 10.0]), Some((-500.0, 510.0)));
    }

    #[test]
    fn domain_never_degenerates() {
        let series = [[-3.5, -3.5], [1e9, 1e9 + 1.0], [0.0, -0.0], [7.0, 7.0]];
        for s in series {
            let (lo, hi) = calculate_net_y_axis_domain(&s).unwrap();
            assert!(hi > lo, "{:?} produced {}..{}", s, lo, hi);
        }
    }

    #[test]
    fn dots_mark_changes_only() {
        assert!(calculate_net_dot_indices(&[]).is_empty());
        assert!(calculate_net_dot_indices(&[5.0, 5.0, 5.0]).is_empty());
        assert_eq!(
            calculate_net_dot_indices(&[1.0, 1.0, 2.0, 2.0, 3.0, 1.0]),
            vec![2, 4, 5]
        );
    }

    #[test]
    fn dots_are_bounded_and_keep_the_last_change() {
        let series: Vec<f64> = (0..200).map(f64::from).collect();
        let dots = calculate_net_dot_indices(&series);
        assert!(dots.len() <= 30);
        assert_eq!(dots.last(), Some(&199));
        assert!(dots.windows(2).all(|w| w[0] < w[1]));

        let series: Vec<f64> = (0..32).map(f64::from).collect();
        let dots = calculate_net_dot_indices(&series);
        assert_eq!(dots.len(), 30);
        assert_eq!(dots.last(), Some(&31));
    }

    #[test]
    fn net_series_accumulates_by_day() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let txn = |d, amount| Transaction {
            id: format!("{}-{}", d, amount),
            date: day(d),
            name: "x".to_string(),
            merchant: None,
            amount,
            category: TransactionCategory {
                primary: "OTHER".to_string(),
                detailed: None,
                confidence: None,
            },
            account_name: "Checking".to_string(),
            account_type: "depository".to_string(),
            account_mask: None,
            running_balance: None,
        };

        let series = daily_net_series(&[txn(3, 50.0), txn(1, -1000.0), txn(3, 25.0)]);
        assert_eq!(
            series,
            vec![
                NetPoint { date: day(1), net: 1000.0 },
                NetPoint { date: day(3), net: 925.0 },
            ]
        );
    }
}
