use anyhow::{Context, Result};
use chrono::NaiveDate;
use shared::{
    domain::{
        AccountType, Address, AreaId, BuildingId, ChartOfAccount, ChartOfAccountId, Invoice,
        InvoiceId, LedgerLine, Office, OfficeId, Property, PropertyId, PropertyStatus, Rates,
        RegionId, TransactionTypeId,
    },
    protocol::Resource,
};
use storage::FixtureStore;
use tracing::info;

const HARBOR: OfficeId = OfficeId(5);
const UPTOWN: OfficeId = OfficeId(7);
const RENT: TransactionTypeId = TransactionTypeId(1);
const FEE: TransactionTypeId = TransactionTypeId(2);

pub async fn seed(store: &FixtureStore) -> Result<()> {
    store
        .save(Resource::Offices, &offices())
        .await
        .context("failed to write offices")?;
    store
        .save(Resource::ChartOfAccounts, &accounts())
        .await
        .context("failed to write chart of accounts")?;
    store
        .save(Resource::Invoices, &invoices())
        .await
        .context("failed to write invoices")?;
    store
        .save(Resource::Properties, &properties())
        .await
        .context("failed to write properties")?;
    info!(root = %store.root().display(), "demo data written");
    Ok(())
}

fn offices() -> Vec<Office> {
    vec![
        Office {
            id: HARBOR,
            name: "Harbor".into(),
            is_active: true,
        },
        Office {
            id: UPTOWN,
            name: "Uptown".into(),
            is_active: true,
        },
    ]
}

fn account(
    id: i64,
    office_id: OfficeId,
    number: &str,
    description: &str,
    account_type: AccountType,
) -> ChartOfAccount {
    ChartOfAccount {
        id: ChartOfAccountId(id),
        office_id: Some(office_id),
        account_number: number.into(),
        description: description.into(),
        account_type,
        is_active: true,
    }
}

fn accounts() -> Vec<ChartOfAccount> {
    let mut retired = account(6, HARBOR, "4900", "Legacy Booking Fees", AccountType::Revenue);
    retired.is_active = false;
    vec![
        account(1, HARBOR, "1000", "Operating Cash", AccountType::Asset),
        account(2, HARBOR, "2100", "Guest Deposits", AccountType::Liability),
        account(3, HARBOR, "4000", "Rental Income", AccountType::Revenue),
        account(4, HARBOR, "5100", "Cleaning Expense", AccountType::Expense),
        account(5, UPTOWN, "4000", "Rental Income", AccountType::Revenue),
        retired,
    ]
}

fn date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn line(account: i64, transaction_type: TransactionTypeId, text: &str, amount: i64) -> LedgerLine {
    LedgerLine {
        chart_of_account_id: ChartOfAccountId(account),
        transaction_type_id: transaction_type,
        description: text.into(),
        amount,
    }
}

fn invoices() -> Vec<Invoice> {
    vec![
        Invoice {
            id: InvoiceId(1001),
            office_id: Some(HARBOR),
            invoice_number: "H-1001".into(),
            is_active: true,
            total_amount: 74_000,
            paid_amount: 74_000,
            invoice_date: date(2026, 9, 1),
            due_date: date(2026, 9, 15),
            lines: vec![
                line(3, RENT, "4 nights, Beach House", 68_000),
                line(3, FEE, "Cleaning fee", 6_000),
            ],
        },
        Invoice {
            id: InvoiceId(1002),
            office_id: Some(HARBOR),
            invoice_number: "H-1002".into(),
            is_active: true,
            total_amount: 51_000,
            paid_amount: 10_000,
            invoice_date: date(2026, 9, 20),
            due_date: date(2026, 10, 4),
            lines: vec![line(3, RENT, "3 nights, Dune Loft", 51_000)],
        },
        Invoice {
            id: InvoiceId(1003),
            office_id: Some(HARBOR),
            invoice_number: "H-1003".into(),
            is_active: false,
            total_amount: 12_000,
            paid_amount: 0,
            invoice_date: date(2026, 8, 11),
            due_date: None,
            lines: vec![line(3, FEE, "Cancelled stay", 12_000)],
        },
        Invoice {
            id: InvoiceId(2001),
            office_id: Some(UPTOWN),
            invoice_number: "U-2001".into(),
            is_active: true,
            total_amount: 310_000,
            paid_amount: 155_000,
            invoice_date: date(2026, 10, 1),
            due_date: date(2026, 10, 31),
            lines: vec![line(5, RENT, "October, Loft 204", 310_000)],
        },
    ]
}

fn properties() -> Vec<Property> {
    vec![
        Property {
            id: PropertyId(1),
            office_id: Some(HARBOR),
            region_id: Some(RegionId(1)),
            area_id: Some(AreaId(3)),
            building_id: None,
            property_code: "BCH-01".into(),
            address: Address {
                line1: "12 Shore Rd".into(),
                city: "Port Wren".into(),
                ..Address::default()
            },
            bedrooms: 3,
            bathrooms: 2,
            max_occupancy: 8,
            amenities: vec!["Hot Tub".into(), "Ocean View".into()],
            rates: Rates {
                nightly: 17_000,
                weekly: 105_000,
                monthly: 0,
            },
            status: PropertyStatus::Occupied,
            is_active: true,
        },
        Property {
            id: PropertyId(2),
            office_id: Some(HARBOR),
            region_id: Some(RegionId(1)),
            area_id: Some(AreaId(3)),
            building_id: None,
            property_code: "DUN-02".into(),
            address: Address {
                line1: "4 Dune Ln".into(),
                city: "Port Wren".into(),
                ..Address::default()
            },
            bedrooms: 1,
            bathrooms: 1,
            max_occupancy: 2,
            amenities: vec!["Parking".into()],
            rates: Rates {
                nightly: 17_000,
                ..Rates::default()
            },
            status: PropertyStatus::Available,
            is_active: true,
        },
        Property {
            id: PropertyId(3),
            office_id: Some(UPTOWN),
            region_id: Some(RegionId(2)),
            area_id: None,
            building_id: Some(BuildingId(9)),
            property_code: "UPT-204".into(),
            address: Address {
                line1: "204 Main St".into(),
                line2: Some("Unit 4".into()),
                city: "Port Wren".into(),
                ..Address::default()
            },
            bedrooms: 2,
            bathrooms: 2,
            max_occupancy: 4,
            amenities: vec!["Gym".into(), "Elevator".into()],
            rates: Rates {
                nightly: 0,
                weekly: 0,
                monthly: 310_000,
            },
            status: PropertyStatus::Maintenance,
            is_active: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_invoices_balance() {
        assert!(invoices().iter().all(Invoice::is_balanced));
    }

    #[tokio::test]
    async fn seeded_directory_has_every_resource() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FixtureStore::new(dir.path());
        seed(&store).await.expect("seed");

        for resource in Resource::ALL {
            let batch = store.load(resource).await.expect("load");
            assert!(!batch.is_empty(), "{resource} is empty");
        }
    }
}
