use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::record::Table;

/// Per-date solve count with the running total, dates ascending. Records
/// sharing a date are summed into one point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub daily: usize,
    pub cumulative: usize,
}

pub fn daily_trend(table: &Table) -> Vec<TrendPoint> {
    let mut by_date: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for record in table.records() {
        *by_date.entry(record.recorded_date).or_insert(0) += 1;
    }

    let mut cumulative = 0;
    by_date
        .into_iter()
        .map(|(date, daily)| {
            cumulative += daily;
            TrendPoint {
                date,
                daily,
                cumulative,
            }
        })
        .collect()
}

/// One pie slice: category count as a share of all records.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub count: usize,
    pub percent: f64,
}

/// Category counts ordered by count descending, then name ascending so
/// equal counts render deterministically.
pub fn category_shares(table: &Table) -> Vec<CategoryShare> {
    let mut by_category: BTreeMap<&str, usize> = BTreeMap::new();
    for record in table.records() {
        *by_category.entry(record.category.as_str()).or_insert(0) += 1;
    }

    let total = table.len();
    let mut shares: Vec<CategoryShare> = by_category
        .into_iter()
        .map(|(category, count)| CategoryShare {
            category: category.to_owned(),
            count,
            percent: count as f64 * 100.0 / total as f64,
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
    shares
}

/// Count per distinct difficulty value, ascending by value.
pub fn difficulty_counts(table: &Table) -> Vec<(i64, usize)> {
    let mut by_difficulty: BTreeMap<i64, usize> = BTreeMap::new();
    for record in table.records() {
        *by_difficulty.entry(record.difficulty).or_insert(0) += 1;
    }
    by_difficulty.into_iter().collect()
}
