use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(OfficeId);
id_newtype!(InvoiceId);
id_newtype!(ChartOfAccountId);
id_newtype!(TransactionTypeId);
id_newtype!(PropertyId);
id_newtype!(RegionId);
id_newtype!(AreaId);
id_newtype!(BuildingId);

/// Amount in minor currency units (cents).
pub type Cents = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Office {
    pub id: OfficeId,
    pub name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerLine {
    pub chart_of_account_id: ChartOfAccountId,
    pub transaction_type_id: TransactionTypeId,
    pub description: String,
    pub amount: Cents,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub office_id: Option<OfficeId>,
    #[serde(default)]
    pub invoice_number: String,
    pub is_active: bool,
    pub total_amount: Cents,
    #[serde(default)]
    pub paid_amount: Cents,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub lines: Vec<LedgerLine>,
}

impl Invoice {
    /// Outstanding amount, clamped at zero for overpaid invoices.
    pub fn balance_due(&self) -> Cents {
        self.total_amount.saturating_sub(self.paid_amount).max(0)
    }

    /// Overpayment carried as credit.
    pub fn credit(&self) -> Cents {
        self.paid_amount.saturating_sub(self.total_amount).max(0)
    }

    pub fn lines_total(&self) -> Cents {
        self.lines
            .iter()
            .fold(0, |total: Cents, line| total.saturating_add(line.amount))
    }

    /// Invoices without lines are header-only and count as balanced.
    pub fn is_balanced(&self) -> bool {
        self.lines.is_empty() || self.lines_total() == self.total_amount
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartOfAccount {
    pub id: ChartOfAccountId,
    pub office_id: Option<OfficeId>,
    pub account_number: String,
    pub description: String,
    pub account_type: AccountType,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    #[default]
    Available,
    Occupied,
    Maintenance,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Address {
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
}

impl Address {
    pub fn one_line(&self) -> String {
        let mut parts = vec![self.line1.as_str()];
        if let Some(line2) = self.line2.as_deref().filter(|s| !s.is_empty()) {
            parts.push(line2);
        }
        parts.push(self.city.as_str());
        parts.retain(|part| !part.is_empty());
        parts.join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Rates {
    #[serde(default)]
    pub nightly: Cents,
    #[serde(default)]
    pub weekly: Cents,
    #[serde(default)]
    pub monthly: Cents,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub office_id: Option<OfficeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<RegionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_id: Option<AreaId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_id: Option<BuildingId>,
    pub property_code: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub bedrooms: u8,
    #[serde(default)]
    pub bathrooms: u8,
    #[serde(default)]
    pub max_occupancy: u16,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub rates: Rates,
    #[serde(default)]
    pub status: PropertyStatus,
    pub is_active: bool,
}
