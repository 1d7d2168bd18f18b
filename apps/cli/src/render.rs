//! # Output Rendering
//!
//! Every command result is either printed as a plain-text view or, with
//! `--json`, serialized as-is. Text views are built as strings so they can
//! be asserted in tests.
//!
//! ```text
//! command ──► T: Render ──┬── --json ──► serde_json::to_string_pretty(T)
//!                         └── default ─► T::render()
//! ```
//!
//! Lists print one row per record.

use serde::Serialize;
use vitrina_core::{
    CatalogEntry, Exchange, Order, Paginated, Product, Sale, SaleStats, StoreInfo, TenantUser,
};

use crate::error::{CliError, CliResult};

/// A value that has a plain-text view.
pub trait Render: Serialize {
    fn render(&self) -> String;
}

/// Where command output goes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Output { json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Formats a value for stdout.
    pub fn format<T: Render + ?Sized>(&self, value: &T) -> CliResult<String> {
        if self.json {
            serde_json::to_string_pretty(value)
                .map_err(|e| CliError::internal(format!("Failed to serialize output: {}", e)))
        } else {
            Ok(value.render())
        }
    }

    pub fn emit<T: Render + ?Sized>(&self, value: &T) -> CliResult<()> {
        println!("{}", self.format(value)?);
        Ok(())
    }

    /// Prints a failed command to stderr (or stdout as JSON).
    pub fn error(&self, err: &CliError) {
        if self.json {
            match serde_json::to_string_pretty(err) {
                Ok(text) => println!("{}", text),
                Err(_) => eprintln!("error[{}]: {}", err.code.as_str(), err.message),
            }
        } else {
            eprintln!("error[{}]: {}", err.code.as_str(), err.message);
        }
    }
}

/// A plain message, `{ "message": ... }` in JSON.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Message {
            message: message.into(),
        }
    }
}

impl Render for Message {
    fn render(&self) -> String {
        self.message.clone()
    }
}

// =============================================================================
// Table Helper
// =============================================================================

/// Left-aligned columns padded to the widest cell.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(headers.to_vec())];
    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    out.push(line(rule.iter().map(String::as_str).collect()));
    for row in rows {
        out.push(line(row.iter().map(String::as_str).collect()));
    }
    out.join("\n")
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

fn date(value: Option<chrono::DateTime<chrono::Utc>>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

// =============================================================================
// Domain Views
// =============================================================================

impl Render for Product {
    fn render(&self) -> String {
        let mut out = vec![format!("{} ({})", self.name, self.id)];
        if self.discount.is_zero() {
            out.push(format!("Price: {}", self.price));
        } else {
            out.push(format!(
                "Price: {} → {} ({} off)",
                self.price,
                self.final_price(),
                self.discount
            ));
        }
        if let Some(description) = &self.description {
            out.push(description.clone());
        }
        let sizes: Vec<Vec<String>> = self
            .stock_by_size
            .iter()
            .map(|s| vec![s.size_id.clone(), s.size_name.clone(), s.quantity.to_string()])
            .collect();
        if !sizes.is_empty() {
            out.push(String::new());
            out.push(table(&["SIZE ID", "SIZE", "STOCK"], &sizes));
        }
        out.join("\n")
    }
}

impl Render for Paginated<Product> {
    fn render(&self) -> String {
        if self.data.is_empty() {
            return "No products found.".to_string();
        }
        let rows: Vec<Vec<String>> = self
            .data
            .iter()
            .map(|p| {
                vec![
                    p.id.clone(),
                    p.name.clone(),
                    p.final_price().to_string(),
                    if p.discount.is_zero() { String::new() } else { p.discount.to_string() },
                    p.total_stock().to_string(),
                ]
            })
            .collect();
        format!(
            "{}\n\nPage {} of {} ({} products)",
            table(&["ID", "NAME", "PRICE", "OFF", "STOCK"], &rows),
            self.page,
            self.total_pages(),
            self.total
        )
    }
}

impl Render for Sale {
    fn render(&self) -> String {
        let mut out = vec![
            format!("Sale {}  {}", self.id, date(self.created_at)),
            format!("Payment: {}", self.payment_method),
        ];
        if let Some(customer) = &self.customer_name {
            out.push(format!("Customer: {}", customer));
        }
        let rows: Vec<Vec<String>> = self
            .items
            .iter()
            .map(|i| {
                vec![
                    or_dash(i.product_name.as_deref()),
                    or_dash(i.size_name.as_deref()),
                    i.quantity.to_string(),
                    i.price.to_string(),
                    i.line_total().to_string(),
                ]
            })
            .collect();
        out.push(String::new());
        out.push(table(&["PRODUCT", "SIZE", "QTY", "PRICE", "TOTAL"], &rows));
        out.push(format!("\nTotal: {}", self.total));
        if let Some(notes) = &self.notes {
            out.push(format!("Notes: {}", notes));
        }
        out.join("\n")
    }
}

impl Render for Paginated<Sale> {
    fn render(&self) -> String {
        if self.data.is_empty() {
            return "No sales found.".to_string();
        }
        let rows: Vec<Vec<String>> = self
            .data
            .iter()
            .map(|s| {
                vec![
                    s.id.clone(),
                    date(s.created_at),
                    s.units().to_string(),
                    s.payment_method.to_string(),
                    s.total.to_string(),
                ]
            })
            .collect();
        format!(
            "{}\n\nPage {} of {} ({} sales)",
            table(&["ID", "DATE", "UNITS", "PAYMENT", "TOTAL"], &rows),
            self.page,
            self.total_pages(),
            self.total
        )
    }
}

impl Render for SaleStats {
    fn render(&self) -> String {
        let mut out = vec![
            format!("Sales:   {}", self.count),
            format!("Revenue: {}", self.revenue),
        ];
        if let Some(avg) = self.average_ticket {
            out.push(format!("Average: {}", avg));
        }
        if !self.by_payment_method.is_empty() {
            let rows: Vec<Vec<String>> = self
                .by_payment_method
                .iter()
                .map(|m| vec![m.method.to_string(), m.count.to_string(), m.total.to_string()])
                .collect();
            out.push(String::new());
            out.push(table(&["METHOD", "COUNT", "TOTAL"], &rows));
        }
        out.join("\n")
    }
}

impl Render for Exchange {
    fn render(&self) -> String {
        let side = |items: &[vitrina_core::ExchangeItem]| -> Vec<Vec<String>> {
            items
                .iter()
                .map(|i| {
                    vec![
                        i.product_name.clone().unwrap_or_else(|| i.product_id.clone()),
                        or_dash(i.size_name.as_deref()),
                        i.quantity.to_string(),
                        i.line_total().to_string(),
                    ]
                })
                .collect()
        };
        let mut out = vec![format!(
            "Exchange {} for sale {}  {}",
            self.id,
            self.sale_id,
            date(self.created_at)
        )];
        out.push("\nReturned:".to_string());
        out.push(table(&["PRODUCT", "SIZE", "QTY", "TOTAL"], &side(&self.returned_items)));
        out.push("\nTaken:".to_string());
        out.push(table(&["PRODUCT", "SIZE", "QTY", "TOTAL"], &side(&self.new_items)));
        out.push(format!("\nDifference: {}", self.price_difference));
        if let Some(method) = self.payment_method {
            out.push(format!("Settled with: {}", method));
        }
        out.join("\n")
    }
}

impl Render for Vec<Exchange> {
    fn render(&self) -> String {
        if self.is_empty() {
            return "No exchanges found.".to_string();
        }
        let rows: Vec<Vec<String>> = self
            .iter()
            .map(|e| {
                vec![
                    e.id.clone(),
                    e.sale_id.clone(),
                    date(e.created_at),
                    e.price_difference.to_string(),
                    e.payment_method.map(|m| m.to_string()).unwrap_or_default(),
                ]
            })
            .collect();
        table(&["ID", "SALE", "DATE", "DIFFERENCE", "PAYMENT"], &rows)
    }
}

impl Render for TenantUser {
    fn render(&self) -> String {
        format!(
            "{} <{}> ({})\nRole: {}\nPermissions: {}",
            self.name,
            self.email,
            self.id,
            self.role,
            if self.permissions.is_empty() { "-".to_string() } else { self.permissions.join(", ") }
        )
    }
}

impl Render for Vec<TenantUser> {
    fn render(&self) -> String {
        if self.is_empty() {
            return "No users found.".to_string();
        }
        let rows: Vec<Vec<String>> = self
            .iter()
            .map(|u| {
                vec![
                    u.id.clone(),
                    u.name.clone(),
                    u.email.clone(),
                    u.role.to_string(),
                    u.permissions.join(","),
                ]
            })
            .collect();
        table(&["ID", "NAME", "EMAIL", "ROLE", "PERMISSIONS"], &rows)
    }
}

impl Render for CatalogEntry {
    fn render(&self) -> String {
        format!("{}  {}", self.id, self.name)
    }
}

impl Render for Vec<CatalogEntry> {
    fn render(&self) -> String {
        if self.is_empty() {
            return "No entries.".to_string();
        }
        let rows: Vec<Vec<String>> = self.iter().map(|e| vec![e.id.clone(), e.name.clone()]).collect();
        table(&["ID", "NAME"], &rows)
    }
}

impl Render for StoreInfo {
    fn render(&self) -> String {
        let mut out = vec![format!("{} ({})", self.name, self.subdomain)];
        if let Some(description) = &self.description {
            out.push(description.clone());
        }
        if let Some(whatsapp) = &self.whatsapp {
            out.push(format!("WhatsApp: {}", whatsapp));
        }
        if let Some(email) = &self.email {
            out.push(format!("Email: {}", email));
        }
        if let Some(min) = self.free_shipping_min {
            out.push(format!("Free shipping from {}", min));
        }
        out.push(format!(
            "Online payment: {}",
            if self.payment_enabled { "MercadoPago" } else { "not available" }
        ));
        out.join("\n")
    }
}

impl Render for Order {
    fn render(&self) -> String {
        let mut out = vec![
            format!("Order {}  {}", self.id, date(self.created_at)),
            format!("Status: {}", self.status),
        ];
        if let Some(customer) = &self.customer {
            out.push(format!("Customer: {} ({}, {})", customer.name, customer.phone, customer.email));
        }
        let rows: Vec<Vec<String>> = self
            .items
            .iter()
            .map(|l| {
                vec![
                    or_dash(l.product_name.as_deref()),
                    or_dash(l.size_name.as_deref()),
                    l.quantity.to_string(),
                    l.price.to_string(),
                ]
            })
            .collect();
        if !rows.is_empty() {
            out.push(String::new());
            out.push(table(&["PRODUCT", "SIZE", "QTY", "PRICE"], &rows));
        }
        out.push(format!("\nTotal: {}", self.total));
        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_table_alignment() {
        let text = table(
            &["ID", "NAME"],
            &[
                vec!["p1".into(), "Remera".into()],
                vec!["p200".into(), "Buzo".into()],
            ],
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ID    NAME");
        assert_eq!(lines[2], "p1    Remera");
        assert_eq!(lines[3], "p200  Buzo");
    }

    #[test]
    fn test_sales_list_one_row_per_sale() {
        let page: Paginated<Sale> = serde_json::from_value(json!({
            "data": [
                { "id": "v1", "total": 100, "paymentMethod": "cash",
                  "items": [{ "productId": "p1", "sizeId": "s1", "quantity": 2, "price": 50 }] },
                { "id": "v2", "total": 80, "paymentMethod": "debit", "items": [] }
            ],
            "total": 2, "page": 1, "limit": 20
        }))
        .unwrap();

        let text = page.render();
        assert_eq!(text.matches("v1").count(), 1);
        assert_eq!(text.matches("v2").count(), 1);
        assert!(text.contains("$100.00"));
    }

    #[test]
    fn test_json_output_is_serde() {
        let out = Output::new(true);
        let text = out.format(&Message::new("Cart cleared")).unwrap();
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&text).unwrap(),
            json!({ "message": "Cart cleared" })
        );
        assert_eq!(Output::new(false).format(&Message::new("Cart cleared")).unwrap(), "Cart cleared");
    }
}
