use std::{cmp::Ordering, collections::HashMap, fmt::Debug};

use chrono::NaiveDate;
use serde::Serialize;
use shared::{
    domain::{
        AccountType, Cents, ChartOfAccount, ChartOfAccountId, Invoice, InvoiceId, Office,
        OfficeId, Property, PropertyId, PropertyStatus,
    },
    protocol::{EntityBatch, Resource},
};

use crate::projection::{project, FilterState, Scoped};

const UNASSIGNED_OFFICE: &str = "(unassigned)";
const UNKNOWN_OFFICE: &str = "(unknown office)";

/// Office id to display name lookup.
pub struct OfficeNames<'a> {
    names: HashMap<OfficeId, &'a str>,
}

impl<'a> OfficeNames<'a> {
    pub fn new(offices: &'a [Office]) -> Self {
        Self {
            names: offices
                .iter()
                .map(|office| (office.id, office.name.as_str()))
                .collect(),
        }
    }

    pub fn resolve(&self, office_id: Option<OfficeId>) -> String {
        match office_id {
            None => UNASSIGNED_OFFICE.to_string(),
            Some(id) => self
                .names
                .get(&id)
                .map(|name| name.to_string())
                .unwrap_or_else(|| UNKNOWN_OFFICE.to_string()),
        }
    }
}

/// An entity a list view can load, filter and render.
pub trait ListEntity: Scoped + Clone + Send + Sync + 'static {
    const RESOURCE: Resource;
    type Row: Clone + Debug + PartialEq + Serialize + Send + Sync + 'static;

    fn from_batch(batch: EntityBatch) -> Vec<Self>;
    fn display_order(&self, other: &Self) -> Ordering;
    fn to_row(&self, offices: &OfficeNames<'_>) -> Self::Row;
}

/// Display rows for `all` under `filter`. Empty until the office reference
/// list is available.
pub fn build_rows<E: ListEntity>(
    all: &[E],
    offices: &[Office],
    filter: &FilterState,
) -> Vec<E::Row> {
    if offices.is_empty() {
        return Vec::new();
    }
    let names = OfficeNames::new(offices);
    let mut visible = project(all, filter);
    visible.sort_by(E::display_order);
    visible.iter().map(|entity| entity.to_row(&names)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceRow {
    pub id: InvoiceId,
    pub invoice_number: String,
    pub office_name: String,
    pub invoice_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub total_amount: Cents,
    pub paid_amount: Cents,
    pub balance_due: Cents,
    pub credit: Cents,
    pub is_balanced: bool,
    pub is_active: bool,
}

impl ListEntity for Invoice {
    const RESOURCE: Resource = Resource::Invoices;
    type Row = InvoiceRow;

    fn from_batch(batch: EntityBatch) -> Vec<Self> {
        match batch {
            EntityBatch::Invoices(items) => items,
            _ => Vec::new(),
        }
    }

    // Undated invoices sort last.
    fn display_order(&self, other: &Self) -> Ordering {
        match (self.invoice_date, other.invoice_date) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then(self.id.cmp(&other.id))
    }

    fn to_row(&self, offices: &OfficeNames<'_>) -> InvoiceRow {
        InvoiceRow {
            id: self.id,
            invoice_number: self.invoice_number.clone(),
            office_name: offices.resolve(self.office_id),
            invoice_date: self.invoice_date,
            due_date: self.due_date,
            total_amount: self.total_amount,
            paid_amount: self.paid_amount,
            balance_due: self.balance_due(),
            credit: self.credit(),
            is_balanced: self.is_balanced(),
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountRow {
    pub id: ChartOfAccountId,
    pub account_number: String,
    pub description: String,
    pub account_type: AccountType,
    pub office_name: String,
    pub is_active: bool,
}

impl ListEntity for ChartOfAccount {
    const RESOURCE: Resource = Resource::ChartOfAccounts;
    type Row = AccountRow;

    fn from_batch(batch: EntityBatch) -> Vec<Self> {
        match batch {
            EntityBatch::ChartOfAccounts(items) => items,
            _ => Vec::new(),
        }
    }

    fn display_order(&self, other: &Self) -> Ordering {
        self.account_number
            .cmp(&other.account_number)
            .then(self.id.cmp(&other.id))
    }

    fn to_row(&self, offices: &OfficeNames<'_>) -> AccountRow {
        AccountRow {
            id: self.id,
            account_number: self.account_number.clone(),
            description: self.description.clone(),
            account_type: self.account_type,
            office_name: offices.resolve(self.office_id),
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyRow {
    pub id: PropertyId,
    pub property_code: String,
    pub office_name: String,
    pub address: String,
    pub bedrooms: u8,
    pub bathrooms: u8,
    pub max_occupancy: u16,
    pub nightly_rate: Cents,
    pub status: PropertyStatus,
    pub is_active: bool,
}

impl ListEntity for Property {
    const RESOURCE: Resource = Resource::Properties;
    type Row = PropertyRow;

    fn from_batch(batch: EntityBatch) -> Vec<Self> {
        match batch {
            EntityBatch::Properties(items) => items,
            _ => Vec::new(),
        }
    }

    fn display_order(&self, other: &Self) -> Ordering {
        self.property_code
            .cmp(&other.property_code)
            .then(self.id.cmp(&other.id))
    }

    fn to_row(&self, offices: &OfficeNames<'_>) -> PropertyRow {
        PropertyRow {
            id: self.id,
            property_code: self.property_code.clone(),
            office_name: offices.resolve(self.office_id),
            address: self.address.one_line(),
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            max_occupancy: self.max_occupancy,
            nightly_rate: self.rates.nightly,
            status: self.status,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InvoiceSummary {
    pub count: usize,
    pub total_amount: Cents,
    pub paid_amount: Cents,
    pub balance_due: Cents,
    pub credit: Cents,
}

impl InvoiceSummary {
    pub fn from_rows(rows: &[InvoiceRow]) -> Self {
        rows.iter().fold(Self::default(), |summary, row| Self {
            count: summary.count + 1,
            total_amount: summary.total_amount.saturating_add(row.total_amount),
            paid_amount: summary.paid_amount.saturating_add(row.paid_amount),
            balance_due: summary.balance_due.saturating_add(row.balance_due),
            credit: summary.credit.saturating_add(row.credit),
        })
    }
}
