//! Summing transaction amounts for the chart and the category summary.

use std::{collections::HashMap, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    record::{Category, TransactionRecord},
};

/// The chart label for transactions with a blank event.
const UNSPECIFIED_EVENT: &str = "Unspecified";

/// What the chart groups by and which amounts it counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartMode {
    /// Income grouped by event.
    #[default]
    IncomeEvent,
    /// Expenses grouped by event, as positive numbers.
    ExpenseEvent,
    /// Income minus expenses grouped by event.
    NetEvent,
    /// Income grouped by category.
    IncomeCategory,
    /// Expenses grouped by category, as positive numbers.
    ExpenseCategory,
    /// Income minus expenses grouped by category.
    NetCategory,
}

impl ChartMode {
    /// Every mode in the order the mode selector lists them.
    pub const ALL: [ChartMode; 6] = [
        ChartMode::IncomeEvent,
        ChartMode::ExpenseEvent,
        ChartMode::NetEvent,
        ChartMode::IncomeCategory,
        ChartMode::ExpenseCategory,
        ChartMode::NetCategory,
    ];

    /// The name used in forms and URLs, e.g. "netEvent".
    pub fn as_str(self) -> &'static str {
        match self {
            ChartMode::IncomeEvent => "incomeEvent",
            ChartMode::ExpenseEvent => "expenseEvent",
            ChartMode::NetEvent => "netEvent",
            ChartMode::IncomeCategory => "incomeCategory",
            ChartMode::ExpenseCategory => "expenseCategory",
            ChartMode::NetCategory => "netCategory",
        }
    }

    /// The human readable name shown in the mode selector and chart title.
    pub fn label(self) -> &'static str {
        match self {
            ChartMode::IncomeEvent => "Income by event",
            ChartMode::ExpenseEvent => "Expenses by event",
            ChartMode::NetEvent => "Net by event",
            ChartMode::IncomeCategory => "Income by category",
            ChartMode::ExpenseCategory => "Expenses by category",
            ChartMode::NetCategory => "Net by category",
        }
    }

    fn groups_by_event(self) -> bool {
        matches!(
            self,
            ChartMode::IncomeEvent | ChartMode::ExpenseEvent | ChartMode::NetEvent
        )
    }

    fn group_key(self, record: &TransactionRecord) -> &str {
        if !self.groups_by_event() {
            return record.category.as_str();
        }

        match record.event.trim() {
            "" => UNSPECIFIED_EVENT,
            event => event,
        }
    }

    /// How much `amount` adds to its bucket, or `None` if it is filtered out.
    fn contribution(self, amount: f64) -> Option<f64> {
        match self {
            ChartMode::IncomeEvent | ChartMode::IncomeCategory => (amount > 0.0).then_some(amount),
            ChartMode::ExpenseEvent | ChartMode::ExpenseCategory => {
                (amount < 0.0).then_some(amount.abs())
            }
            ChartMode::NetEvent | ChartMode::NetCategory => Some(amount),
        }
    }
}

impl FromStr for ChartMode {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        ChartMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == text)
            .ok_or_else(|| Error::InvalidChartMode(text.to_owned()))
    }
}

impl Display for ChartMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chart labels and the value for each label, index-aligned.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Sum the amounts of `records` into one bucket per event or category, as selected by `mode`.
///
/// A bucket is only created by a record that contributes to it, so a key
/// whose records are all filtered out by the mode does not appear. Labels are
/// in the order their keys are first seen.
pub fn aggregate(records: &[TransactionRecord], mode: ChartMode) -> ChartSeries {
    let mut series = ChartSeries::default();
    let mut bucket_indices: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let Some(contribution) = mode.contribution(record.amount) else {
            continue;
        };

        let key = mode.group_key(record);
        let index = *bucket_indices.entry(key).or_insert_with(|| {
            series.labels.push(key.to_owned());
            series.values.push(0.0);
            series.values.len() - 1
        });

        series.values[index] += contribution;
    }

    series
}

/// The net amount for each category over every record, regardless of chart mode.
///
/// The fixed categories are always present, in their fixed order, even if
/// they have no records. Any other category found in the records is appended
/// in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotals(Vec<(Category, f64)>);

impl CategoryTotals {
    pub fn from_records(records: &[TransactionRecord]) -> Self {
        let mut totals: Vec<(Category, f64)> = Category::FIXED
            .into_iter()
            .map(|category| (category, 0.0))
            .collect();

        for record in records {
            match totals
                .iter_mut()
                .find(|(category, _)| *category == record.category)
            {
                Some((_, total)) => *total += record.amount,
                None => totals.push((record.category.clone(), record.amount)),
            }
        }

        Self(totals)
    }

    /// The total for `category`, if it has a bucket.
    pub fn get(&self, category: &Category) -> Option<f64> {
        self.0
            .iter()
            .find(|(other, _)| other == category)
            .map(|(_, total)| *total)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Category, f64)> {
        self.0.iter().map(|(category, total)| (category, *total))
    }

    /// The sum over every category, which equals the sum of all record amounts.
    pub fn sum(&self) -> f64 {
        self.0.iter().map(|(_, total)| total).sum()
    }
}

impl Default for CategoryTotals {
    fn default() -> Self {
        Self::from_records(&[])
    }
}


#[cfg(test)]
mod chart_mode_tests {
    use crate::Error;

    use super::ChartMode;

    #[test]
    fn parses_every_mode_name() {
        for mode in ChartMode::ALL {
            assert_eq!(mode.as_str().parse::<ChartMode>(), Ok(mode));
        }
    }

    #[test]
    fn rejects_unknown_mode() {
        assert_eq!(
            "grossEvent".parse::<ChartMode>(),
            Err(Error::InvalidChartMode("grossEvent".to_owned()))
        );
    }

    #[test]
    fn serializes_with_camel_case_names() {
        assert_eq!(
            serde_json::to_string(&ChartMode::ExpenseCategory).unwrap(),
            "\"expenseCategory\""
        );
        assert_eq!(ChartMode::default(), ChartMode::IncomeEvent);
    }
}
