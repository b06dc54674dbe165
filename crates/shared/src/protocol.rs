use serde::{Deserialize, Serialize};

use crate::domain::{ChartOfAccount, Invoice, Office, Property};

/// A collection a view can ask a fetch provider for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Offices,
    Invoices,
    ChartOfAccounts,
    Properties,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Offices,
        Resource::Invoices,
        Resource::ChartOfAccounts,
        Resource::Properties,
    ];

    /// Load key used while a fetch of this resource is outstanding.
    pub fn load_key(self) -> &'static str {
        match self {
            Resource::Offices => "offices",
            Resource::Invoices => "invoices",
            Resource::ChartOfAccounts => "chart_of_accounts",
            Resource::Properties => "properties",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.load_key())
    }
}

/// Payload of a completed fetch. `Empty` is the fallback for failed fetches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum EntityBatch {
    #[default]
    Empty,
    Offices(Vec<Office>),
    Invoices(Vec<Invoice>),
    ChartOfAccounts(Vec<ChartOfAccount>),
    Properties(Vec<Property>),
}

impl EntityBatch {
    pub fn resource(&self) -> Option<Resource> {
        match self {
            EntityBatch::Empty => None,
            EntityBatch::Offices(_) => Some(Resource::Offices),
            EntityBatch::Invoices(_) => Some(Resource::Invoices),
            EntityBatch::ChartOfAccounts(_) => Some(Resource::ChartOfAccounts),
            EntityBatch::Properties(_) => Some(Resource::Properties),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            EntityBatch::Empty => 0,
            EntityBatch::Offices(items) => items.len(),
            EntityBatch::Invoices(items) => items.len(),
            EntityBatch::ChartOfAccounts(items) => items.len(),
            EntityBatch::Properties(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_offices(self) -> Vec<Office> {
        match self {
            EntityBatch::Offices(items) => items,
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}
