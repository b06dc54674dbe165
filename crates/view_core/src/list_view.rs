use std::{sync::Arc, time::Duration};

use shared::{
    domain::{Office, OfficeId},
    protocol::{EntityBatch, Resource, Severity},
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    fan_in::{FanIn, LoadOperation},
    fetch::FetchProvider,
    notify::NotificationSink,
    pending_set::{LoadKey, PendingWatch},
    projection::FilterState,
    rows::{build_rows, ListEntity},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Loading,
    Ready { cycle: u64 },
    Disposed,
}

impl ViewState {
    pub fn is_ready(&self) -> bool {
        matches!(self, ViewState::Ready { .. })
    }
}

pub type Rows<R> = Arc<Vec<R>>;

/// List of one entity kind, scoped by office and kept in sync with its
/// fetches. Owns the raw collections; everything else reads snapshots.
pub struct ListView<E: ListEntity> {
    provider: Arc<dyn FetchProvider>,
    notifier: Arc<dyn NotificationSink>,
    fan_in: FanIn,
    offices: Vec<Office>,
    entities: Vec<E>,
    filter: FilterState,
    rows: watch::Sender<Rows<E::Row>>,
    state: watch::Sender<ViewState>,
}

impl<E: ListEntity> ListView<E> {
    pub fn new(provider: Arc<dyn FetchProvider>, notifier: Arc<dyn NotificationSink>) -> Self {
        let (rows, _) = watch::channel(Rows::default());
        let (state, _) = watch::channel(ViewState::Idle);
        Self {
            provider,
            fan_in: FanIn::new(Arc::clone(&notifier)),
            notifier,
            offices: Vec::new(),
            entities: Vec::new(),
            filter: FilterState::default(),
            rows,
            state,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.fan_in = self.fan_in.with_timeout(timeout);
        self
    }

    pub fn with_filter(mut self, filter: FilterState) -> Self {
        self.filter = filter;
        self
    }

    pub fn state(&self) -> ViewState {
        *self.state.borrow()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn offices(&self) -> &[Office] {
        &self.offices
    }

    pub fn entities(&self) -> &[E] {
        &self.entities
    }

    pub fn rows(&self) -> Rows<E::Row> {
        self.rows.borrow().clone()
    }

    pub fn subscribe_rows(&self) -> watch::Receiver<Rows<E::Row>> {
        self.rows.subscribe()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn subscribe_ready(&self) -> watch::Receiver<u64> {
        self.fan_in.subscribe_ready()
    }

    pub fn loading(&self) -> PendingWatch {
        self.fan_in.loading()
    }

    pub fn is_disposed(&self) -> bool {
        self.state() == ViewState::Disposed
    }

    /// Fetches offices and entities concurrently, then re-projects. Failed
    /// fetches leave their collection empty and have already been reported.
    pub async fn refresh(&mut self) -> ViewState {
        if self.is_disposed() {
            debug!(resource = %E::RESOURCE, "refresh on disposed view ignored");
            return ViewState::Disposed;
        }

        self.state.send_replace(ViewState::Loading);
        let operations = vec![
            self.load_operation(Resource::Offices),
            self.load_operation(E::RESOURCE),
        ];
        let mut report = self.fan_in.run_all(operations).await;

        self.offices = report.take(&LoadKey::from(Resource::Offices)).into_offices();
        self.entities = E::from_batch(report.take(&LoadKey::from(E::RESOURCE)));
        info!(
            resource = %E::RESOURCE,
            cycle = report.cycle,
            offices = self.offices.len(),
            entities = self.entities.len(),
            "view data loaded"
        );

        self.reconcile_filter();
        self.reproject();

        let next = if report.ready {
            ViewState::Ready {
                cycle: report.cycle,
            }
        } else {
            ViewState::Loading
        };
        self.state.send_replace(next);
        next
    }

    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
        self.filter_changed();
    }

    pub fn select_office(&mut self, office_id: Option<OfficeId>) {
        self.filter.office_id = office_id;
        self.filter_changed();
    }

    pub fn set_show_inactive(&mut self, show_inactive: bool) {
        self.filter.show_inactive = show_inactive;
        self.filter_changed();
    }

    pub fn set_search(&mut self, search: Option<String>) {
        self.filter.search = search;
        self.filter_changed();
    }

    /// Drops raw data and ends every stream owned by the view.
    pub fn dispose(&mut self) {
        if self.is_disposed() {
            return;
        }
        self.offices.clear();
        self.entities.clear();
        self.fan_in.dispose();
        self.rows.send_replace(Rows::default());
        self.state.send_replace(ViewState::Disposed);
        debug!(resource = %E::RESOURCE, "view disposed");
    }

    fn load_operation(&self, resource: Resource) -> LoadOperation<'static, EntityBatch> {
        let provider = Arc::clone(&self.provider);
        LoadOperation::new(resource, async move { provider.fetch_entities(resource).await })
    }

    fn filter_changed(&mut self) {
        if self.is_disposed() {
            return;
        }
        self.reconcile_filter();
        self.reproject();
    }

    // Without an office list a selection can't be checked, so it is kept.
    fn reconcile_filter(&mut self) {
        if self.offices.is_empty() {
            return;
        }
        if let Some(stale) = self.filter.reconcile(&self.offices) {
            warn!(resource = %E::RESOURCE, office_id = %stale, "selected office no longer exists");
            self.notifier.notify(
                &format!("Office {stale} is no longer available; showing all offices"),
                Severity::Warning,
            );
        }
    }

    fn reproject(&self) {
        let rows = build_rows(&self.entities, &self.offices, &self.filter);
        debug!(resource = %E::RESOURCE, rows = rows.len(), "projected rows");
        self.rows.send_replace(Arc::new(rows));
    }
}

#[cfg(test)]
#[path = "tests/list_view_tests.rs"]
mod tests;
