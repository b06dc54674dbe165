//! View-state core: load bookkeeping, fan-in coordination and projection of
//! office-scoped records into display rows.

pub mod driver;
pub mod fan_in;
pub mod fetch;
pub mod invalidation;
pub mod list_view;
pub mod notify;
pub mod pending_set;
pub mod projection;
pub mod rows;

pub use driver::{spawn_list_view, ViewCommand, ViewHandle};
pub use fan_in::{FanIn, FanInReport, LoadOperation, DEFAULT_FETCH_TIMEOUT};
pub use fetch::{FetchProvider, InMemoryFetchProvider};
pub use invalidation::{Invalidated, InvalidationBus, InvalidationListener};
pub use list_view::{ListView, Rows, ViewState};
pub use notify::{ChannelNotifier, NotificationSink, TracingNotifier};
pub use pending_set::{LoadKey, PendingSet, PendingSnapshot, PendingWatch};
pub use projection::{project, FilterState, Scoped};
pub use rows::{
    build_rows, AccountRow, InvoiceRow, InvoiceSummary, ListEntity, OfficeNames, PropertyRow,
};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
