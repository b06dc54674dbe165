use std::time::Duration;

use shared::{
    domain::{ChartOfAccount, Invoice, Property},
    error::FetchError,
};

use super::*;
use crate::{
    fetch::InMemoryFetchProvider,
    rows::{InvoiceSummary, ListEntity, OfficeNames},
    test_support::{account, invoice, office, offices, property, RecordingNotifier},
};

fn provider_with_invoices() -> InMemoryFetchProvider {
    InMemoryFetchProvider::new()
        .with_batch(EntityBatch::Offices(offices()))
        .with_batch(EntityBatch::Invoices(vec![
            invoice(1, 5, true),
            invoice(2, 7, true),
            invoice(3, 5, false),
        ]))
}

#[tokio::test(start_paused = true)]
async fn refresh_moves_from_idle_through_loading_to_ready() {
    let notifier = RecordingNotifier::shared();
    let provider = provider_with_invoices()
        .with_delay(Resource::Invoices, Duration::from_millis(50))
        .shared();
    let mut view: ListView<Invoice> = ListView::new(provider, notifier.clone());
    let mut states = view.subscribe_state();
    let loading = view.loading();
    assert_eq!(view.state(), ViewState::Idle);

    let recorder = tokio::spawn(async move {
        let mut seen = Vec::new();
        while states.changed().await.is_ok() {
            let state = *states.borrow_and_update();
            seen.push((state, loading.is_loading()));
            if state.is_ready() {
                break;
            }
        }
        seen
    });

    assert_eq!(view.refresh().await, ViewState::Ready { cycle: 1 });
    let seen = recorder.await.expect("recorder");
    assert_eq!(
        seen,
        [(ViewState::Loading, true), (ViewState::Ready { cycle: 1 }, false)]
    );
    assert!(notifier.notifications().is_empty());
}

#[tokio::test]
async fn rows_resolve_office_names_and_hide_inactive() {
    let mut view: ListView<Invoice> =
        ListView::new(provider_with_invoices().shared(), RecordingNotifier::shared());
    view.refresh().await;

    let rows = view.rows();
    let described: Vec<(i64, &str)> = rows
        .iter()
        .map(|row| (row.id.0, row.office_name.as_str()))
        .collect();
    assert_eq!(described, [(1, "Harbor"), (2, "Uptown")]);

    let summary = InvoiceSummary::from_rows(&rows);
    assert_eq!(summary.count, 2);
    assert_eq!(summary.balance_due, 15_000);
}

#[test]
fn summary_carries_credit_and_saturates() {
    let offices = offices();
    let names = OfficeNames::new(&offices);
    let mut overpaid = invoice(1, 5, true);
    overpaid.paid_amount = 12_000;
    let mut huge = invoice(2, 5, true);
    huge.total_amount = i64::MAX;
    huge.paid_amount = 0;

    let rows = vec![overpaid.to_row(&names), huge.to_row(&names)];
    assert_eq!(rows[0].balance_due, 0);
    assert_eq!(rows[0].credit, 2_000);

    let summary = InvoiceSummary::from_rows(&rows);
    assert_eq!(summary.count, 2);
    assert_eq!(summary.total_amount, i64::MAX);
    assert_eq!(summary.balance_due, i64::MAX);
    assert_eq!(summary.credit, 2_000);
}

#[tokio::test]
async fn filter_changes_reproject_without_refetching() {
    let provider = provider_with_invoices().shared();
    let mut view: ListView<Invoice> =
        ListView::new(provider.clone(), RecordingNotifier::shared());
    view.refresh().await;

    view.select_office(Some(OfficeId(5)));
    assert_eq!(view.rows().len(), 1);

    view.set_show_inactive(true);
    assert_eq!(view.rows().len(), 2);

    view.set_search(Some("inv-0003".into()));
    assert_eq!(view.rows().len(), 1);
    assert_eq!(view.rows()[0].id.0, 3);

    assert_eq!(provider.calls(Resource::Invoices).await, 1);
    assert_eq!(provider.calls(Resource::Offices).await, 1);
}

#[tokio::test]
async fn failed_entity_fetch_yields_empty_rows_and_notification() {
    let notifier = RecordingNotifier::shared();
    let provider = InMemoryFetchProvider::new()
        .with_batch(EntityBatch::Offices(offices()))
        .with_failure(
            Resource::ChartOfAccounts,
            FetchError::unavailable("chart_of_accounts", "503"),
        );
    let mut view: ListView<ChartOfAccount> = ListView::new(provider.shared(), notifier.clone());

    assert!(view.refresh().await.is_ready());
    assert!(view.rows().is_empty());
    assert_eq!(view.offices().len(), 2);
    assert_eq!(notifier.count(Severity::Error), 1);
}

#[tokio::test]
async fn missing_offices_leave_rows_empty() {
    let notifier = RecordingNotifier::shared();
    let provider = InMemoryFetchProvider::new()
        .with_failure(Resource::Offices, FetchError::unavailable("offices", "down"))
        .with_batch(EntityBatch::Properties(vec![property(1, 5, "BCH-01")]));
    let mut view: ListView<Property> = ListView::new(provider.shared(), notifier.clone());

    view.refresh().await;

    assert_eq!(view.entities().len(), 1);
    assert!(view.rows().is_empty());
    assert_eq!(notifier.count(Severity::Error), 1);
}

#[tokio::test]
async fn vanished_office_selection_is_reset() {
    let notifier = RecordingNotifier::shared();
    let provider = provider_with_invoices().shared();
    let mut view: ListView<Invoice> = ListView::new(provider.clone(), notifier.clone())
        .with_filter(FilterState::for_office(OfficeId(7)));
    view.refresh().await;
    assert_eq!(view.rows().len(), 1);

    provider
        .replace(EntityBatch::Offices(vec![office(5, "Harbor")]))
        .await;
    view.refresh().await;

    assert_eq!(view.filter().office_id, None);
    assert_eq!(notifier.count(Severity::Warning), 1);
    let rows = view.rows();
    let offices: Vec<&str> = rows.iter().map(|row| row.office_name.as_str()).collect();
    assert_eq!(offices, ["Harbor", "(unknown office)"]);
}

#[tokio::test(start_paused = true)]
async fn hung_fetch_times_out_instead_of_loading_forever() {
    let notifier = RecordingNotifier::shared();
    let provider = InMemoryFetchProvider::new()
        .with_batch(EntityBatch::Offices(offices()))
        .with_hang(Resource::Invoices);
    let mut view: ListView<Invoice> = ListView::new(provider.shared(), notifier.clone())
        .with_timeout(Some(Duration::from_secs(2)));

    assert!(view.refresh().await.is_ready());
    assert!(!view.loading().is_loading());
    assert!(view.entities().is_empty());
    assert_eq!(notifier.count(Severity::Error), 1);
}

#[tokio::test]
async fn disposed_view_stops_fetching() {
    let provider = provider_with_invoices().shared();
    let mut view: ListView<Invoice> =
        ListView::new(provider.clone(), RecordingNotifier::shared());
    let mut rows = view.subscribe_rows();
    view.refresh().await;
    assert!(!rows.borrow_and_update().is_empty());

    view.dispose();

    assert_eq!(view.state(), ViewState::Disposed);
    assert!(rows.borrow_and_update().is_empty());
    assert!(view.entities().is_empty());
    assert_eq!(view.refresh().await, ViewState::Disposed);
    assert_eq!(provider.calls(Resource::Invoices).await, 1);
}

#[tokio::test]
async fn accounts_sort_by_account_number() {
    let provider = InMemoryFetchProvider::new()
        .with_batch(EntityBatch::Offices(offices()))
        .with_batch(EntityBatch::ChartOfAccounts(vec![
            account(1, 5, "5100", "Cleaning"),
            account(2, 5, "1000", "Operating Cash"),
            account(3, 7, "4000", "Rental Income"),
        ]));
    let mut view: ListView<ChartOfAccount> =
        ListView::new(provider.shared(), RecordingNotifier::shared());
    view.refresh().await;

    let numbers: Vec<String> = view
        .rows()
        .iter()
        .map(|row| row.account_number.clone())
        .collect();
    assert_eq!(numbers, ["1000", "4000", "5100"]);
}
