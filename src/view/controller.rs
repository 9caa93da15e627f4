//! The view-model for one page: keeps the view state and works out what to redraw.

use std::{fmt::Display, str::FromStr};

use serde::Deserialize;

use crate::{
    database_id::RecordId,
    deposit::DepositAdjustment,
    event::EventLabel,
    record::TransactionRecord,
    store::{ChangeBatch, StoreEvent},
    view::{
        aggregation::{CategoryTotals, ChartMode, ChartSeries, aggregate},
        render_diff::{Patch, RenderDiffer},
        sorting::{ActiveSort, SortRequest, SortToggles, sort_records},
    },
};

/// The parts of the page a view variant shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewCapabilities {
    /// The add-transaction form and the controls that change data.
    pub has_form: bool,
    /// The table of every record.
    pub has_table: bool,
    /// Entrance, change and exit transitions on cards.
    pub has_animation: bool,
    /// Sort controls for the cards and table.
    pub has_sort: bool,
    /// The card list.
    pub has_cards: bool,
}

impl ViewCapabilities {
    /// Everything: the form, animated cards, the table and sorting.
    pub const fn manage() -> Self {
        Self {
            has_form: true,
            has_table: true,
            has_animation: true,
            has_sort: true,
            has_cards: true,
        }
    }

    /// Static cards and a sortable table, without the form.
    pub const fn read_only() -> Self {
        Self {
            has_form: false,
            has_table: true,
            has_animation: false,
            has_sort: true,
            has_cards: true,
        }
    }

    /// Only the chart and totals.
    pub const fn chart_only() -> Self {
        Self {
            has_form: false,
            has_table: false,
            has_animation: false,
            has_sort: false,
            has_cards: false,
        }
    }
}

/// The page variants and their capabilities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewVariant {
    #[default]
    Manage,
    ReadOnly,
    ChartOnly,
}

impl ViewVariant {
    pub fn capabilities(self) -> ViewCapabilities {
        match self {
            ViewVariant::Manage => ViewCapabilities::manage(),
            ViewVariant::ReadOnly => ViewCapabilities::read_only(),
            ViewVariant::ChartOnly => ViewCapabilities::chart_only(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewVariant::Manage => "manage",
            ViewVariant::ReadOnly => "read_only",
            ViewVariant::ChartOnly => "chart_only",
        }
    }
}

impl FromStr for ViewVariant {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "manage" => Ok(ViewVariant::Manage),
            "read_only" => Ok(ViewVariant::ReadOnly),
            "chart_only" => Ok(ViewVariant::ChartOnly),
            other => Err(format!("unknown view variant \"{other}\"")),
        }
    }
}

impl Display for ViewVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the view knows, owned by one [ViewController].
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub mode: ChartMode,
    pub toggles: SortToggles,
    pub active_sort: Option<ActiveSort>,
    pub deposit: DepositAdjustment,
    /// The latest full record set from the store, in creation order.
    pub records: Vec<TransactionRecord>,
    pub events: Vec<EventLabel>,
}

impl ViewState {
    /// The sum of every record amount plus the deposit adjustment.
    pub fn total(&self) -> f64 {
        let sum: f64 = self.records.iter().map(|record| record.amount).sum();
        sum + self.deposit
    }
}

/// Something the view has to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewInput {
    Records(ChangeBatch),
    Deposit(DepositAdjustment),
    Events(Vec<EventLabel>),
    SelectMode(ChartMode),
    Sort(SortRequest),
    /// The exit transition of a card has finished.
    ExitFinished(RecordId),
}

impl From<StoreEvent> for ViewInput {
    fn from(event: StoreEvent) -> Self {
        match event {
            StoreEvent::Records(batch) => ViewInput::Records(batch),
            StoreEvent::Deposit(deposit) => ViewInput::Deposit(deposit),
            StoreEvent::Events(events) => ViewInput::Events(events),
        }
    }
}

/// The parts of the page to redraw. `None` means unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewUpdate {
    pub cards: Vec<Patch>,
    /// Every table row, rebuilt in full.
    pub table: Option<Vec<TransactionRecord>>,
    pub chart: Option<(ChartMode, ChartSeries)>,
    pub category_totals: Option<CategoryTotals>,
    pub total: Option<f64>,
    pub events: Option<Vec<EventLabel>>,
    pub sort: Option<ActiveSort>,
}

impl ViewUpdate {
    pub fn is_empty(&self) -> bool {
        *self == ViewUpdate::default()
    }

    /// Fold a later update into this one.
    pub fn merge(&mut self, later: ViewUpdate) {
        self.cards.extend(later.cards);
        self.table = later.table.or(self.table.take());
        self.chart = later.chart.or(self.chart.take());
        self.category_totals = later.category_totals.or(self.category_totals.take());
        self.total = later.total.or(self.total);
        self.events = later.events.or(self.events.take());
        self.sort = later.sort.or(self.sort);
    }
}

/// Recomputes totals, the chart, card patches and the table as inputs arrive.
///
/// Inputs must be handled one at a time in the order they happened.
#[derive(Debug, Clone)]
pub struct ViewController {
    capabilities: ViewCapabilities,
    state: ViewState,
    differ: RenderDiffer,
}

impl ViewController {
    pub fn new(capabilities: ViewCapabilities) -> Self {
        Self {
            capabilities,
            state: ViewState::default(),
            differ: RenderDiffer::new(capabilities.has_cards && capabilities.has_animation),
        }
    }

    pub fn capabilities(&self) -> ViewCapabilities {
        self.capabilities
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Whether the card for `id` is waiting for its exit transition to finish.
    pub fn is_exiting(&self, id: RecordId) -> bool {
        self.differ.is_exiting(id)
    }

    pub fn handle(&mut self, input: ViewInput) -> ViewUpdate {
        match input {
            ViewInput::Records(batch) => self.on_records(batch),
            ViewInput::Deposit(deposit) => {
                self.state.deposit = deposit;

                ViewUpdate {
                    total: Some(self.state.total()),
                    ..Default::default()
                }
            }
            ViewInput::Events(events) => {
                self.state.events = events.clone();

                ViewUpdate {
                    events: Some(events),
                    ..Default::default()
                }
            }
            ViewInput::SelectMode(mode) => {
                self.state.mode = mode;

                ViewUpdate {
                    chart: Some((mode, aggregate(&self.state.records, mode))),
                    ..Default::default()
                }
            }
            ViewInput::Sort(request) => self.on_sort(request),
            ViewInput::ExitFinished(id) => {
                let patch = self.differ.finish_exit(id);

                ViewUpdate {
                    cards: self.card_patches(patch),
                    ..Default::default()
                }
            }
        }
    }

    fn on_records(&mut self, batch: ChangeBatch) -> ViewUpdate {
        let mut patches = self.differ.apply(&batch);
        self.state.records = batch.records;

        // Redrawn cards lose the order set by an earlier sort, so the order
        // is sent again even when it did not change.
        let reordered = self.reapply_sort().is_some();
        if reordered || (self.state.active_sort.is_some() && !patches.is_empty()) {
            patches.push(self.differ.order_patch());
        }

        ViewUpdate {
            cards: self.card_patches(patches),
            table: self.table(),
            chart: Some((self.state.mode, aggregate(&self.state.records, self.state.mode))),
            category_totals: Some(CategoryTotals::from_records(&self.state.records)),
            total: Some(self.state.total()),
            ..Default::default()
        }
    }

    fn on_sort(&mut self, request: SortRequest) -> ViewUpdate {
        if !self.capabilities.has_sort {
            tracing::debug!("Ignoring sort request for a view without sorting: {request:?}");
            return ViewUpdate::default();
        }

        let sort = self.state.toggles.apply(request);
        self.state.active_sort = Some(sort);
        let patches: Vec<Patch> = self.reapply_sort().into_iter().collect();

        ViewUpdate {
            cards: self.card_patches(patches),
            table: self.table(),
            sort: Some(sort),
            ..Default::default()
        }
    }

    fn reapply_sort(&mut self) -> Option<Patch> {
        let sort = self.state.active_sort?;

        let mut records = self.differ.visible_records();
        sort_records(&mut records, sort.field, sort.direction);
        let sorted_ids: Vec<RecordId> = records.iter().map(|record| record.id).collect();

        self.differ.reorder(&sorted_ids)
    }

    /// The table rows, which follow the order of the cards that are not exiting.
    fn table(&self) -> Option<Vec<TransactionRecord>> {
        self.capabilities
            .has_table
            .then(|| self.differ.visible_records())
    }

    fn card_patches(&self, patches: impl IntoIterator<Item = Patch>) -> Vec<Patch> {
        if self.capabilities.has_cards {
            patches.into_iter().collect()
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        deposit::DepositAdjustment,
        event::{EventLabel, EventName},
        record::{Category, TransactionRecord},
        store::{Change, ChangeBatch},
        view::{
            aggregation::{ChartMode, ChartSeries},
            render_diff::Patch,
            sorting::{ActiveSort, SortDirection, SortField, SortRequest},
        },
    };

    use super::{ViewCapabilities, ViewController, ViewInput, ViewUpdate};

    fn record(id: i64, amount: f64, category: Category) -> TransactionRecord {
        TransactionRecord {
            id,
            event: "Gala".to_owned(),
            date: format!("03/{:02}/2025", id),
            amount,
            category,
            description: String::new(),
        }
    }

    fn gala_records() -> Vec<TransactionRecord> {
        vec![
            record(1, 100.0, Category::Door),
            record(2, -40.0, Category::FoodAndBev),
        ]
    }

    fn loaded_controller(capabilities: ViewCapabilities) -> ViewController {
        let mut controller = ViewController::new(capabilities);
        controller.handle(ViewInput::Records(ChangeBatch::initial(gala_records())));
        controller
    }

    fn ids(records: &[TransactionRecord]) -> Vec<i64> {
        records.iter().map(|record| record.id).collect()
    }

    #[test]
    fn first_batch_draws_everything() {
        let mut controller = ViewController::new(ViewCapabilities::manage());

        let update = controller.handle(ViewInput::Records(ChangeBatch::initial(gala_records())));

        assert_eq!(
            update.cards,
            vec![Patch::Reset {
                records: vec![
                    record(2, -40.0, Category::FoodAndBev),
                    record(1, 100.0, Category::Door)
                ]
            }]
        );
        assert_eq!(update.table.as_deref().map(ids), Some(vec![2, 1]));
        assert_eq!(
            update.chart,
            Some((
                ChartMode::IncomeEvent,
                ChartSeries {
                    labels: vec!["Gala".to_owned()],
                    values: vec![100.0]
                }
            ))
        );
        assert_eq!(update.total, Some(60.0));
        let totals = update.category_totals.unwrap();
        assert_eq!(totals.get(&Category::Door), Some(100.0));
        assert_eq!(totals.get(&Category::FoodAndBev), Some(-40.0));
    }

    #[test]
    fn deleting_a_record_updates_totals() {
        let mut controller = loaded_controller(ViewCapabilities::manage());

        let update = controller.handle(ViewInput::Records(ChangeBatch {
            changes: vec![Change::removed(record(2, -40.0, Category::FoodAndBev))],
            records: vec![record(1, 100.0, Category::Door)],
        }));

        let totals = update.category_totals.unwrap();
        assert_eq!(totals.get(&Category::FoodAndBev), Some(0.0));
        assert_eq!(totals.get(&Category::Door), Some(100.0));
        assert_eq!(update.total, Some(100.0));
        assert_eq!(
            update.cards,
            vec![Patch::BeginExit {
                record: record(2, -40.0, Category::FoodAndBev)
            }]
        );
        // The exiting card is already gone from the table.
        assert_eq!(update.table.as_deref().map(ids), Some(vec![1]));
    }

    #[test]
    fn exit_finished_removes_card() {
        let mut controller = loaded_controller(ViewCapabilities::manage());
        controller.handle(ViewInput::Records(ChangeBatch {
            changes: vec![Change::removed(record(2, -40.0, Category::FoodAndBev))],
            records: vec![record(1, 100.0, Category::Door)],
        }));
        assert!(controller.is_exiting(2));

        let update = controller.handle(ViewInput::ExitFinished(2));

        assert_eq!(update.cards, vec![Patch::Remove { id: 2 }]);
        assert!(!controller.is_exiting(2));
    }

    #[test]
    fn selecting_mode_only_redraws_chart() {
        let mut controller = loaded_controller(ViewCapabilities::manage());

        let update = controller.handle(ViewInput::SelectMode(ChartMode::NetEvent));

        assert_eq!(
            update,
            ViewUpdate {
                chart: Some((
                    ChartMode::NetEvent,
                    ChartSeries {
                        labels: vec!["Gala".to_owned()],
                        values: vec![60.0]
                    }
                )),
                ..Default::default()
            }
        );
        assert_eq!(controller.state().mode, ChartMode::NetEvent);
    }

    #[test]
    fn deposit_adjustments_add_to_total() {
        let mut controller = loaded_controller(ViewCapabilities::chart_only());

        controller.handle(ViewInput::Deposit(DepositAdjustment::new(10.0)));
        let update = controller.handle(ViewInput::Deposit(DepositAdjustment::new(12.5)));

        assert_eq!(update.total, Some(72.5));
    }

    #[test]
    fn events_are_passed_through() {
        let mut controller = loaded_controller(ViewCapabilities::manage());
        let events = vec![EventLabel {
            id: 1,
            name: EventName::new_unchecked("Gala"),
        }];

        let update = controller.handle(ViewInput::Events(events.clone()));

        assert_eq!(update.events, Some(events.clone()));
        assert_eq!(controller.state().events, events);
    }

    #[test]
    fn sort_reorders_cards_and_table_together() {
        let mut controller = loaded_controller(ViewCapabilities::manage());

        let update = controller.handle(ViewInput::Sort(SortRequest {
            field: SortField::Date,
            direction: None,
        }));

        assert_eq!(
            update.sort,
            Some(ActiveSort {
                field: SortField::Date,
                direction: SortDirection::Ascending
            })
        );
        assert_eq!(update.cards, vec![Patch::Reorder { ids: vec![1, 2] }]);
        assert_eq!(update.table.as_deref().map(ids), Some(vec![1, 2]));

        let update = controller.handle(ViewInput::Sort(SortRequest {
            field: SortField::Date,
            direction: None,
        }));
        assert_eq!(update.table.as_deref().map(ids), Some(vec![2, 1]));
    }

    #[test]
    fn sort_in_current_order_has_no_card_patch() {
        let mut controller = loaded_controller(ViewCapabilities::manage());

        // Newest first is already ascending by amount here.
        let update = controller.handle(ViewInput::Sort(SortRequest {
            field: SortField::Amount,
            direction: None,
        }));

        assert!(update.cards.is_empty());
        assert_eq!(update.table.as_deref().map(ids), Some(vec![2, 1]));
    }

    #[test]
    fn active_sort_is_reapplied_to_new_records() {
        let mut controller = loaded_controller(ViewCapabilities::manage());
        controller.handle(ViewInput::Sort(SortRequest {
            field: SortField::Amount,
            direction: Some(SortDirection::Descending),
        }));

        let mut records = gala_records();
        records.push(record(3, 50.0, Category::Dues));
        let update = controller.handle(ViewInput::Records(ChangeBatch {
            changes: vec![Change::added(record(3, 50.0, Category::Dues))],
            records,
        }));

        assert_eq!(update.table.as_deref().map(ids), Some(vec![1, 3, 2]));
        assert!(matches!(update.cards.last(), Some(Patch::Reorder { .. })));
    }

    #[test]
    fn read_only_view_has_static_cards_and_table() {
        let mut controller = loaded_controller(ViewCapabilities::read_only());

        let update = controller.handle(ViewInput::Records(ChangeBatch {
            changes: vec![Change::removed(record(2, -40.0, Category::FoodAndBev))],
            records: vec![record(1, 100.0, Category::Door)],
        }));

        // Without animation removal is immediate.
        assert_eq!(update.cards, vec![Patch::Remove { id: 2 }]);
        assert!(!controller.is_exiting(2));
        assert_eq!(update.table.as_deref().map(ids), Some(vec![1]));
    }

    #[test]
    fn read_only_sort_reorders_cards() {
        let mut controller = loaded_controller(ViewCapabilities::read_only());

        let update = controller.handle(ViewInput::Sort(SortRequest {
            field: SortField::Amount,
            direction: Some(SortDirection::Descending),
        }));

        assert_eq!(update.cards, vec![Patch::Reorder { ids: vec![1, 2] }]);
        assert_eq!(update.table.as_deref().map(ids), Some(vec![1, 2]));
    }

    #[test]
    fn chart_only_view_ignores_sort() {
        let mut controller = loaded_controller(ViewCapabilities::chart_only());

        let update = controller.handle(ViewInput::Sort(SortRequest {
            field: SortField::Date,
            direction: None,
        }));

        assert!(update.is_empty());
        assert_eq!(controller.state().active_sort, None);
    }

    #[test]
    fn total_is_sum_of_amounts_plus_deposits() {
        let mut controller = loaded_controller(ViewCapabilities::manage());
        let deltas = [5.0, -2.5, 20.0];
        let mut deposit = DepositAdjustment::default();

        let mut update = ViewUpdate::default();
        for delta in deltas {
            deposit = deposit.accumulate(delta);
            update = controller.handle(ViewInput::Deposit(deposit));
        }

        let want = 100.0 - 40.0 + deltas.iter().sum::<f64>();
        assert_eq!(update.total, Some(want));
    }

    #[test]
    fn merge_keeps_latest_values() {
        let mut first = ViewUpdate {
            cards: vec![Patch::Remove { id: 1 }],
            total: Some(1.0),
            ..Default::default()
        };

        first.merge(ViewUpdate {
            cards: vec![Patch::Remove { id: 2 }],
            total: Some(2.0),
            events: Some(Vec::new()),
            ..Default::default()
        });

        assert_eq!(
            first.cards,
            vec![Patch::Remove { id: 1 }, Patch::Remove { id: 2 }]
        );
        assert_eq!(first.total, Some(2.0));
        assert_eq!(first.events, Some(Vec::new()));
    }
}
