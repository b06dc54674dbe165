use crate::{
    domain::{
        ChartOfAccountId, Invoice, InvoiceId, LedgerLine, Office, OfficeId, Property,
        PropertyStatus, TransactionTypeId,
    },
    error::FetchError,
    protocol::{EntityBatch, Resource},
};

fn invoice(total: i64, paid: i64, lines: &[i64]) -> Invoice {
    Invoice {
        id: InvoiceId(1),
        office_id: Some(OfficeId(5)),
        invoice_number: "INV-1".into(),
        is_active: true,
        total_amount: total,
        paid_amount: paid,
        invoice_date: None,
        due_date: None,
        lines: lines
            .iter()
            .map(|amount| LedgerLine {
                chart_of_account_id: ChartOfAccountId(10),
                transaction_type_id: TransactionTypeId(1),
                description: "rent".into(),
                amount: *amount,
            })
            .collect(),
    }
}

#[test]
fn balance_due_is_clamped_for_overpaid_invoices() {
    assert_eq!(invoice(10_000, 2_500, &[]).balance_due(), 7_500);
    let overpaid = invoice(10_000, 12_000, &[]);
    assert_eq!(overpaid.balance_due(), 0);
    assert_eq!(overpaid.credit(), 2_000);
}

#[test]
fn ledger_lines_must_add_up_to_total() {
    assert!(invoice(10_000, 0, &[6_000, 4_000]).is_balanced());
    assert!(!invoice(10_000, 0, &[6_000]).is_balanced());
    assert!(invoice(10_000, 0, &[]).is_balanced());
}

#[test]
fn load_keys_are_distinct_and_match_display() {
    let keys: Vec<&str> = Resource::ALL.iter().map(|r| r.load_key()).collect();
    assert_eq!(keys, ["offices", "invoices", "chart_of_accounts", "properties"]);
    assert_eq!(Resource::ChartOfAccounts.to_string(), "chart_of_accounts");
}

#[test]
fn extreme_amounts_saturate_instead_of_overflowing() {
    let huge = invoice(i64::MAX, -1, &[i64::MAX, 1]);
    assert_eq!(huge.balance_due(), i64::MAX);
    assert_eq!(huge.lines_total(), i64::MAX);
    assert!(huge.is_balanced());
    assert_eq!(invoice(i64::MIN, i64::MAX, &[]).credit(), i64::MAX);
}

#[test]
fn property_fixture_fills_optional_fields_with_defaults() {
    let property: Property = serde_json::from_str(
        r#"{"id": 3, "office_id": 5, "property_code": "BCH-01", "is_active": true}"#,
    )
    .expect("parse property");

    assert_eq!(property.status, PropertyStatus::Available);
    assert!(property.amenities.is_empty());
    assert_eq!(property.region_id, None);
}

#[test]
fn entity_batch_reports_its_resource() {
    let batch = EntityBatch::Offices(vec![Office {
        id: OfficeId(5),
        name: "Harbor".into(),
        is_active: true,
    }]);
    assert_eq!(batch.resource(), Some(Resource::Offices));
    assert_eq!(batch.len(), 1);
    assert!(EntityBatch::default().is_empty());
}

#[test]
fn timeout_message_reports_milliseconds() {
    let error = FetchError::TimedOut {
        resource: "invoices".into(),
        after: std::time::Duration::from_millis(1500),
    };
    assert_eq!(error.to_string(), "invoices fetch timed out after 1500ms");
    assert_eq!(
        FetchError::unavailable("invoices", "connection refused").to_string(),
        "invoices unavailable: connection refused"
    );
}
