use std::sync::{Arc, Mutex};

use shared::{
    domain::{
        AccountType, Address, ChartOfAccount, ChartOfAccountId, Invoice, InvoiceId, Office,
        OfficeId, Property, PropertyId, PropertyStatus, Rates,
    },
    protocol::{Notification, Severity},
};

use crate::notify::NotificationSink;

#[derive(Clone, Default)]
pub(crate) struct RecordingNotifier {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub(crate) fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().expect("notifier lock").clone()
    }

    pub(crate) fn count(&self, severity: Severity) -> usize {
        self.notifications()
            .iter()
            .filter(|notification| notification.severity == severity)
            .count()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        self.seen.lock().expect("notifier lock").push(Notification {
            severity,
            message: message.to_string(),
        });
    }
}

pub(crate) fn office(id: i64, name: &str) -> Office {
    Office {
        id: OfficeId(id),
        name: name.into(),
        is_active: true,
    }
}

pub(crate) fn offices() -> Vec<Office> {
    vec![office(5, "Harbor"), office(7, "Uptown")]
}

pub(crate) fn invoice(id: i64, office_id: i64, is_active: bool) -> Invoice {
    Invoice {
        id: InvoiceId(id),
        office_id: Some(OfficeId(office_id)),
        invoice_number: format!("INV-{id:04}"),
        is_active,
        total_amount: 10_000,
        paid_amount: 2_500,
        invoice_date: None,
        due_date: None,
        lines: Vec::new(),
    }
}

pub(crate) fn account(id: i64, office_id: i64, number: &str, description: &str) -> ChartOfAccount {
    ChartOfAccount {
        id: ChartOfAccountId(id),
        office_id: Some(OfficeId(office_id)),
        account_number: number.into(),
        description: description.into(),
        account_type: AccountType::Revenue,
        is_active: true,
    }
}

pub(crate) fn property(id: i64, office_id: i64, code: &str) -> Property {
    Property {
        id: PropertyId(id),
        office_id: Some(OfficeId(office_id)),
        region_id: None,
        area_id: None,
        building_id: None,
        property_code: code.into(),
        address: Address {
            line1: "12 Shore Rd".into(),
            city: "Port Wren".into(),
            ..Address::default()
        },
        bedrooms: 2,
        bathrooms: 1,
        max_occupancy: 4,
        amenities: vec!["Hot Tub".into()],
        rates: Rates {
            nightly: 18_500,
            ..Rates::default()
        },
        status: PropertyStatus::Available,
        is_active: true,
    }
}
