//! Ordering transaction records by a chosen field.

use std::{cmp::Ordering, collections::HashMap};

use serde::{Deserialize, Serialize};

use crate::record::{DateKey, TransactionRecord};

/// A field that records can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Date,
    Event,
    Amount,
    Category,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::Date,
        SortField::Event,
        SortField::Amount,
        SortField::Category,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::Event => "event",
            SortField::Amount => "amount",
            SortField::Category => "category",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortField::Date => "Date",
            SortField::Event => "Event",
            SortField::Amount => "Amount",
            SortField::Category => "Category",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }
}

/// The sort currently applied to the cards and table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActiveSort {
    pub field: SortField,
    pub direction: SortDirection,
}

/// A request to sort by `field`.
///
/// Without a direction the field's toggle decides it, with one the toggle is set to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SortRequest {
    pub field: SortField,
    #[serde(default)]
    pub direction: Option<SortDirection>,
}

/// The direction each field will be sorted in the next time it is chosen.
///
/// Choosing a field for the first time sorts it ascending, choosing it again
/// flips its direction. Each field keeps its own direction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortToggles(HashMap<SortField, SortDirection>);

impl SortToggles {
    /// Flip the direction of `field` and return the direction to sort in.
    pub fn toggle(&mut self, field: SortField) -> SortDirection {
        let direction = match self.0.get(&field) {
            Some(previous) => previous.reversed(),
            None => SortDirection::Ascending,
        };
        self.0.insert(field, direction);

        direction
    }

    pub fn set(&mut self, field: SortField, direction: SortDirection) {
        self.0.insert(field, direction);
    }

    /// The direction `field` was last sorted in, if it has been sorted.
    pub fn get(&self, field: SortField) -> Option<SortDirection> {
        self.0.get(&field).copied()
    }

    /// Resolve `request` into the sort to apply, updating the field's toggle.
    pub fn apply(&mut self, request: SortRequest) -> ActiveSort {
        let direction = match request.direction {
            Some(direction) => {
                self.set(request.field, direction);
                direction
            }
            None => self.toggle(request.field),
        };

        ActiveSort {
            field: request.field,
            direction,
        }
    }
}

/// Sort `records` in place by `field`.
///
/// Records with equal keys are ordered by ID so the result is the same for
/// any input order, and descending is the exact reverse of ascending.
pub fn sort_records(
    records: &mut [TransactionRecord],
    field: SortField,
    direction: SortDirection,
) {
    records.sort_by(|a, b| {
        let ordering = compare_records(a, b, field);

        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

fn compare_records(a: &TransactionRecord, b: &TransactionRecord, field: SortField) -> Ordering {
    let ordering = match field {
        SortField::Amount => a.amount.total_cmp(&b.amount),
        SortField::Date => DateKey::from_text(&a.date).cmp(&DateKey::from_text(&b.date)),
        SortField::Event => compare_text(&a.event, &b.event),
        SortField::Category => compare_text(a.category.as_str(), b.category.as_str()),
    };

    ordering.then_with(|| a.id.cmp(&b.id))
}

/// Case-insensitive comparison, with a byte-wise comparison to separate
/// strings that only differ by case.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod sort_records_tests {
    use crate::record::{Category, TransactionRecord};

    use super::{SortDirection, SortField, sort_records};

    fn record(
        id: i64,
        event: &str,
        date: &str,
        amount: f64,
        category: Category,
    ) -> TransactionRecord {
        TransactionRecord {
            id,
            event: event.to_owned(),
            date: date.to_owned(),
            amount,
            category,
            description: String::new(),
        }
    }

    fn test_records() -> Vec<TransactionRecord> {
        vec![
            record(1, "gala", "03/14/2025", 100.0, Category::Door),
            record(2, "Auction", "12/01/2024", -40.0, Category::FoodAndBev),
            record(3, "Bake Sale", "not a date", 12.5, Category::Alcohol),
            record(4, "Gala", "03/02/2025", -40.0, Category::Custom("raffle".to_owned())),
        ]
    }

    fn ids(records: &[TransactionRecord]) -> Vec<i64> {
        records.iter().map(|record| record.id).collect()
    }

    fn sorted_ids(field: SortField, direction: SortDirection) -> Vec<i64> {
        let mut records = test_records();
        sort_records(&mut records, field, direction);
        ids(&records)
    }

    #[test]
    fn sorts_amounts_numerically_with_id_tie_break() {
        assert_eq!(
            sorted_ids(SortField::Amount, SortDirection::Ascending),
            vec![2, 4, 3, 1]
        );
    }

    #[test]
    fn sorts_dates_chronologically_with_malformed_first() {
        assert_eq!(
            sorted_ids(SortField::Date, SortDirection::Ascending),
            vec![3, 2, 4, 1]
        );
    }

    #[test]
    fn sorts_events_ignoring_case() {
        // "Gala" sorts before "gala" when the case-insensitive keys are equal.
        assert_eq!(
            sorted_ids(SortField::Event, SortDirection::Ascending),
            vec![2, 3, 4, 1]
        );
    }

    #[test]
    fn sorts_categories_by_name() {
        assert_eq!(
            sorted_ids(SortField::Category, SortDirection::Ascending),
            vec![3, 1, 2, 4]
        );
    }

    #[test]
    fn descending_is_reverse_of_ascending() {
        for field in SortField::ALL {
            let mut ascending = sorted_ids(field, SortDirection::Ascending);
            ascending.reverse();

            assert_eq!(
                sorted_ids(field, SortDirection::Descending),
                ascending,
                "field {field:?}"
            );
        }
    }

    #[test]
    fn result_does_not_depend_on_input_order() {
        for field in SortField::ALL {
            let mut forwards = test_records();
            let mut backwards = test_records();
            backwards.reverse();

            sort_records(&mut forwards, field, SortDirection::Ascending);
            sort_records(&mut backwards, field, SortDirection::Ascending);

            assert_eq!(ids(&forwards), ids(&backwards), "field {field:?}");
        }
    }
}
