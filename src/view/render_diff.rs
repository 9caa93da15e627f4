//! Turns record change notifications into the smallest set of card updates.

use std::collections::HashMap;

use crate::{
    database_id::RecordId,
    record::TransactionRecord,
    store::{Change, ChangeBatch, ChangeKind},
};

/// A card showing one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub record: TransactionRecord,
    /// The card is playing its exit transition and will be removed when it finishes.
    pub exiting: bool,
}

/// An update to the card list.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    /// Replace every card, without transitions.
    Reset { records: Vec<TransactionRecord> },
    /// Add a card at the front of the list.
    Insert {
        record: TransactionRecord,
        animate: bool,
    },
    /// Re-render a card in place, with a short cue if `changed_cue` is set.
    Replace {
        record: TransactionRecord,
        changed_cue: bool,
    },
    /// Start the exit transition of a card.
    BeginExit { record: TransactionRecord },
    /// Remove a card immediately.
    Remove { id: RecordId },
    /// Move the existing cards into this order without redrawing them.
    Reorder { ids: Vec<RecordId> },
}

/// Tracks which record each card shows and the order of the cards.
///
/// New cards go to the front so the list reads newest first. Removing a card
/// takes two steps when transitions are enabled: [Patch::BeginExit], then
/// [Patch::Remove] once [RenderDiffer::finish_exit] is called.
#[derive(Debug, Clone)]
pub struct RenderDiffer {
    cards: HashMap<RecordId, Card>,
    order: Vec<RecordId>,
    animate: bool,
    loaded: bool,
}

impl RenderDiffer {
    pub fn new(animate: bool) -> Self {
        Self {
            cards: HashMap::new(),
            order: Vec::new(),
            animate,
            loaded: false,
        }
    }

    /// Apply a batch of changes and return the card updates.
    ///
    /// The first batch replaces every card at once, without transitions.
    pub fn apply(&mut self, batch: &ChangeBatch) -> Vec<Patch> {
        if !self.loaded {
            self.loaded = true;
            return vec![self.reset(&batch.records)];
        }

        batch
            .changes
            .iter()
            .filter_map(|change| self.apply_change(change))
            .collect()
    }

    /// Remove a card whose exit transition has finished.
    ///
    /// Returns `None` if the card is gone or its exit was cancelled.
    pub fn finish_exit(&mut self, id: RecordId) -> Option<Patch> {
        if !self.is_exiting(id) {
            return None;
        }

        self.cards.remove(&id);
        self.order.retain(|other| *other != id);

        Some(Patch::Remove { id })
    }

    /// Put the cards that are not exiting in the order of `sorted_ids`.
    ///
    /// Exiting cards keep their position so their transition is not
    /// interrupted. Returns `None` if the order did not change.
    pub fn reorder(&mut self, sorted_ids: &[RecordId]) -> Option<Patch> {
        let mut sorted = sorted_ids
            .iter()
            .filter(|id| self.cards.get(id).is_some_and(|card| !card.exiting));

        let order: Vec<RecordId> = self
            .order
            .iter()
            .map(|id| {
                if self.is_exiting(*id) {
                    Some(*id)
                } else {
                    sorted.next().copied()
                }
            })
            .collect::<Option<_>>()?;

        if order == self.order {
            return None;
        }

        self.order = order;

        Some(self.order_patch())
    }

    /// The current display order of every card, exiting cards included.
    pub fn order_patch(&self) -> Patch {
        Patch::Reorder {
            ids: self.order.clone(),
        }
    }

    /// The records of the cards that are not exiting, in display order.
    pub fn visible_records(&self) -> Vec<TransactionRecord> {
        self.order
            .iter()
            .filter_map(|id| self.cards.get(id))
            .filter(|card| !card.exiting)
            .map(|card| card.record.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn is_exiting(&self, id: RecordId) -> bool {
        self.cards.get(&id).is_some_and(|card| card.exiting)
    }

    fn reset(&mut self, records: &[TransactionRecord]) -> Patch {
        let records: Vec<TransactionRecord> = records.iter().rev().cloned().collect();

        self.order = records.iter().map(|record| record.id).collect();
        self.cards = records
            .iter()
            .map(|record| {
                let card = Card {
                    record: record.clone(),
                    exiting: false,
                };
                (record.id, card)
            })
            .collect();

        Patch::Reset { records }
    }

    fn apply_change(&mut self, change: &Change) -> Option<Patch> {
        let record = &change.record;
        let exiting = self.cards.get(&record.id).map(|card| card.exiting);

        match (change.kind, exiting) {
            (ChangeKind::Added, Some(false)) => None,
            // The record came back before its card finished leaving.
            (ChangeKind::Added, Some(true)) => {
                self.set_card(record.clone());

                Some(Patch::Replace {
                    record: record.clone(),
                    changed_cue: false,
                })
            }
            (ChangeKind::Modified, Some(_)) => {
                self.set_card(record.clone());

                Some(Patch::Replace {
                    record: record.clone(),
                    changed_cue: self.animate,
                })
            }
            (ChangeKind::Added | ChangeKind::Modified, None) => {
                self.order.insert(0, record.id);
                self.set_card(record.clone());

                Some(Patch::Insert {
                    record: record.clone(),
                    animate: self.animate,
                })
            }
            (ChangeKind::Removed, Some(false)) if self.animate => {
                let card = self.cards.get_mut(&record.id)?;
                card.exiting = true;

                Some(Patch::BeginExit {
                    record: card.record.clone(),
                })
            }
            (ChangeKind::Removed, Some(false)) => {
                self.cards.remove(&record.id);
                self.order.retain(|id| *id != record.id);

                Some(Patch::Remove { id: record.id })
            }
            (ChangeKind::Removed, Some(true) | None) => None,
        }
    }

    fn set_card(&mut self, record: TransactionRecord) {
        self.cards.insert(
            record.id,
            Card {
                record,
                exiting: false,
            },
        );
    }
}

/// The changes that turn `previous` into `current`.
///
/// Removals come first, then modifications, then additions in the order of
/// `current`.
pub fn diff_record_sets(
    previous: &[TransactionRecord],
    current: &[TransactionRecord],
) -> Vec<Change> {
    let previous_by_id: HashMap<RecordId, &TransactionRecord> =
        previous.iter().map(|record| (record.id, record)).collect();
    let current_by_id: HashMap<RecordId, &TransactionRecord> =
        current.iter().map(|record| (record.id, record)).collect();

    let removed = previous
        .iter()
        .filter(|record| !current_by_id.contains_key(&record.id))
        .cloned()
        .map(Change::removed);

    let modified = current
        .iter()
        .filter(|record| {
            previous_by_id
                .get(&record.id)
                .is_some_and(|previous| previous != record)
        })
        .cloned()
        .map(Change::modified);

    let added = current
        .iter()
        .filter(|record| !previous_by_id.contains_key(&record.id))
        .cloned()
        .map(Change::added);

    removed.chain(modified).chain(added).collect()
}
