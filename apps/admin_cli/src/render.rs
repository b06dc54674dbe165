use serde::Serialize;
use shared::domain::Cents;
use view_core::{AccountRow, InvoiceRow, InvoiceSummary, PropertyRow};

fn money(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!("{sign}{}.{:02}", cents / 100, cents % 100)
}

fn flag(is_active: bool) -> &'static str {
    if is_active {
        ""
    } else {
        " (inactive)"
    }
}

pub fn print_json<T: Serialize>(rows: &[T]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(rows)?);
    Ok(())
}

pub fn print_invoices(rows: &[InvoiceRow]) {
    if rows.is_empty() {
        println!("No invoices.");
        return;
    }
    println!(
        "{:<12} {:<16} {:<10} {:>12} {:>12} {:>12}",
        "Invoice", "Office", "Date", "Total", "Paid", "Balance"
    );
    for row in rows {
        let date = row
            .invoice_date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let warning = if row.is_balanced { "" } else { " (lines unbalanced)" };
        let credit = if row.credit > 0 {
            format!(" (credit {})", money(row.credit))
        } else {
            String::new()
        };
        println!(
            "{:<12} {:<16} {:<10} {:>12} {:>12} {:>12}{}{}{}",
            row.invoice_number,
            row.office_name,
            date,
            money(row.total_amount),
            money(row.paid_amount),
            money(row.balance_due),
            credit,
            warning,
            flag(row.is_active),
        );
    }
}

pub fn print_invoice_summary(summary: &InvoiceSummary) {
    if summary.count == 0 {
        return;
    }
    println!(
        "{} invoices, total {}, paid {}, outstanding {}",
        summary.count,
        money(summary.total_amount),
        money(summary.paid_amount),
        money(summary.balance_due)
    );
    if summary.credit > 0 {
        println!("customer credit {}", money(summary.credit));
    }
}

pub fn print_accounts(rows: &[AccountRow]) {
    if rows.is_empty() {
        println!("No accounts.");
        return;
    }
    for row in rows {
        println!(
            "{:<8} {:<32} {:<10} {}{}",
            row.account_number,
            row.description,
            format!("{:?}", row.account_type).to_lowercase(),
            row.office_name,
            flag(row.is_active),
        );
    }
}

pub fn print_properties(rows: &[PropertyRow]) {
    if rows.is_empty() {
        println!("No properties.");
        return;
    }
    for row in rows {
        println!(
            "{:<10} {:<16} {:<36} {}bd/{}ba sleeps {:<3} {:>10}/night {:?}{}",
            row.property_code,
            row.office_name,
            row.address,
            row.bedrooms,
            row.bathrooms,
            row.max_occupancy,
            money(row.nightly_rate),
            row.status,
            flag(row.is_active),
        );
    }
}
