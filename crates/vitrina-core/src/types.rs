//! # Domain Types
//!
//! Server-owned records as the client sees them. The backend is the only
//! authority for all of these; the client holds request-scoped copies.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    Exchange     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  price (Money)  │   │  items          │   │  sale_id        │       │
//! │  │  discount (%)   │   │  total          │   │  returned/new   │       │
//! │  │  stock_by_size  │   │  payment_method │   │  difference     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   StoreInfo     │   │     Order       │   │   TenantUser    │       │
//! │  │  (public store) │   │  status         │   │  role           │       │
//! │  │  free shipping  │   │  customer       │   │  permissions    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  CatalogEntry: Category / Brand / Size / Color / Gender / Type         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! All records are camelCase JSON. Prices arrive as decimal numbers in major
//! units and become [`Money`] through [`crate::money::major_units`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::{major_units, DiscountRate, Money};

// =============================================================================
// Catalog
// =============================================================================

/// A named catalog entry: category, brand, size, color, gender or type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
}

/// Available quantity for one size of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeStock {
    pub size_id: String,
    #[serde(default)]
    pub size_name: String,
    pub quantity: u32,
}

// =============================================================================
// Product
// =============================================================================

/// A product in a tenant's catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// List price before the product discount.
    #[serde(with = "major_units")]
    pub price: Money,

    /// Percentage discount applied to every unit.
    #[serde(default)]
    pub discount: DiscountRate,

    /// Image URLs, first one is the cover.
    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub category: Option<CatalogEntry>,

    #[serde(default)]
    pub brand: Option<CatalogEntry>,

    #[serde(default)]
    pub gender: Option<CatalogEntry>,

    #[serde(default, rename = "type")]
    pub product_type: Option<CatalogEntry>,

    #[serde(default)]
    pub color: Option<CatalogEntry>,

    #[serde(default)]
    pub stock_by_size: Vec<SizeStock>,

    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Unit price after the product discount.
    pub fn final_price(&self) -> Money {
        self.price - self.price.percentage(self.discount)
    }

    /// Stock row for a size, if the product is sold in that size.
    pub fn size(&self, size_id: &str) -> Option<&SizeStock> {
        self.stock_by_size.iter().find(|s| s.size_id == size_id)
    }

    /// Sum of stock across all sizes.
    pub fn total_stock(&self) -> u32 {
        self.stock_by_size.iter().map(|s| s.quantity).sum()
    }

    /// Cover image, if any.
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale or exchange difference was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Debit,
    Credit,
    Transfer,
    MercadoPago,
    #[serde(other)]
    Other,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Debit => "debit",
            PaymentMethod::Credit => "credit",
            PaymentMethod::Transfer => "transfer",
            PaymentMethod::MercadoPago => "mercado_pago",
            PaymentMethod::Other => "other",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "debit" => Ok(PaymentMethod::Debit),
            "credit" => Ok(PaymentMethod::Credit),
            "transfer" => Ok(PaymentMethod::Transfer),
            "mercado_pago" | "mercadopago" => Ok(PaymentMethod::MercadoPago),
            "other" => Ok(PaymentMethod::Other),
            other => Err(ValidationError::InvalidFormat {
                field: "payment_method".to_string(),
                reason: format!("unknown payment method '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// One line of a recorded sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub product_id: String,
    #[serde(default)]
    pub product_name: Option<String>,
    pub size_id: String,
    #[serde(default)]
    pub size_name: Option<String>,
    pub quantity: u32,
    #[serde(with = "major_units")]
    pub price: Money,
    #[serde(default)]
    pub discount: DiscountRate,
}

impl SaleItem {
    /// Line total after the line discount.
    pub fn line_total(&self) -> Money {
        let gross = self.price * self.quantity;
        gross - gross.percentage(self.discount)
    }
}

/// A sale recorded by the tenant (in-store or from an order).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    #[serde(default)]
    pub items: Vec<SaleItem>,
    #[serde(with = "major_units")]
    pub total: Money,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Sale {
    /// Total units across all lines.
    pub fn units(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// Aggregated sales figures for a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleStats {
    #[serde(default)]
    pub count: u64,
    #[serde(with = "major_units")]
    pub revenue: Money,
    #[serde(default, with = "major_units::option")]
    pub average_ticket: Option<Money>,
    #[serde(default)]
    pub by_payment_method: Vec<PaymentMethodStat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodStat {
    pub method: PaymentMethod,
    pub count: u64,
    #[serde(with = "major_units")]
    pub total: Money,
}

// =============================================================================
// Exchange
// =============================================================================

/// A product row on either side of an exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeItem {
    pub product_id: String,
    pub size_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_name: Option<String>,
    pub quantity: u32,
    #[serde(with = "major_units")]
    pub price: Money,
}

impl ExchangeItem {
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }
}

/// A product swap recorded against a prior sale.
///
/// A positive `price_difference` is owed by the customer and settled with
/// `payment_method`; a negative one is refunded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exchange {
    pub id: String,
    pub sale_id: String,
    #[serde(default)]
    pub returned_items: Vec<ExchangeItem>,
    #[serde(default)]
    pub new_items: Vec<ExchangeItem>,
    #[serde(with = "major_units")]
    pub price_difference: Money,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Users
// =============================================================================

/// Role of a user inside a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Owner,
    Admin,
    Employee,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UserRole::Owner => "owner",
            UserRole::Admin => "admin",
            UserRole::Employee => "employee",
            UserRole::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

impl FromStr for UserRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "owner" => Ok(UserRole::Owner),
            "admin" => Ok(UserRole::Admin),
            "employee" => Ok(UserRole::Employee),
            other => Err(ValidationError::InvalidFormat {
                field: "role".to_string(),
                reason: format!("unknown role '{}'", other),
            }),
        }
    }
}

/// A user account belonging to the current tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    /// Permission keys granted to the user (e.g. `"sales"`, `"products"`).
    #[serde(default)]
    pub permissions: Vec<String>,
}

// =============================================================================
// Session
// =============================================================================

/// The logged-in user, as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub tenant_id: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Credentials kept in local storage between invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(alias = "access_token", alias = "accessToken")]
    pub token: String,
    pub user: SessionUser,
}

impl Session {
    pub fn tenant_id(&self) -> &str {
        &self.user.tenant_id
    }
}

// =============================================================================
// Public Store & Orders
// =============================================================================

/// Public configuration of a storefront, resolved by subdomain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreInfo {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub subdomain: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Order total above which shipping is free.
    #[serde(default, with = "major_units::option")]
    pub free_shipping_min: Option<Money>,
    /// Whether MercadoPago checkout is offered after order creation.
    #[serde(default)]
    pub payment_enabled: bool,
}

/// Customer contact attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One line of an order, sent on creation and echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: String,
    pub size_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_name: Option<String>,
    pub quantity: u32,
    #[serde(with = "major_units")]
    pub price: Money,
    #[serde(default)]
    pub discount: DiscountRate,
}

/// Lifecycle of a storefront order on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Paid,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// An order placed through a public storefront.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    #[serde(default = "default_order_status")]
    pub status: OrderStatus,
    #[serde(default)]
    pub customer: Option<OrderCustomer>,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    #[serde(default, with = "major_units::option")]
    pub subtotal: Option<Money>,
    #[serde(default, with = "major_units::option")]
    pub discount: Option<Money>,
    #[serde(with = "major_units")]
    pub total: Money,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_order_status() -> OrderStatus {
    OrderStatus::Pending
}

// =============================================================================
// MercadoPago
// =============================================================================

/// Tenant's MercadoPago credentials as stored on the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MercadoPagoConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default)]
    pub enabled: bool,
}

impl MercadoPagoConfig {
    /// Access token with everything but the last four characters hidden.
    pub fn masked_access_token(&self) -> Option<String> {
        self.access_token.as_deref().map(|token| {
            let chars: Vec<char> = token.chars().collect();
            let visible = chars.len().min(4);
            let hidden = chars.len() - visible;
            let tail: String = chars[hidden..].iter().collect();
            format!("{}{}", "*".repeat(hidden), tail)
        })
    }
}

/// A checkout preference created for an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPreference {
    pub id: String,
    /// Checkout URL the customer opens to pay.
    pub init_point: String,
    #[serde(default)]
    pub sandbox_init_point: Option<String>,
}

// =============================================================================
// Pagination
// =============================================================================

/// A page of results from a list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

impl<T> Paginated<T> {
    /// Number of pages, at least one.
    pub fn total_pages(&self) -> u32 {
        if self.limit == 0 {
            return 1;
        }
        let pages = self.total.div_ceil(self.limit as u64);
        pages.max(1) as u32
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_from_api_json() {
        let product: Product = serde_json::from_value(json!({
            "id": "p1",
            "name": "Remera",
            "price": 15000.5,
            "discount": 10,
            "images": ["https://img/1.jpg"],
            "type": { "id": "t1", "name": "Remeras" },
            "stockBySize": [
                { "sizeId": "s1", "sizeName": "M", "quantity": 3 },
                { "sizeId": "s2", "sizeName": "L", "quantity": 0 }
            ]
        }))
        .unwrap();

        assert_eq!(product.price.cents(), 1_500_050);
        assert_eq!(product.discount.bps(), 1000);
        assert!(product.active);
        assert_eq!(product.product_type.as_ref().unwrap().name, "Remeras");
        assert_eq!(product.size("s1").unwrap().quantity, 3);
        assert_eq!(product.total_stock(), 3);
        assert_eq!(product.cover_image(), Some("https://img/1.jpg"));
        assert_eq!(product.final_price().cents(), 1_350_045);
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("Cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!(
            "mercado-pago".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::MercadoPago
        );
        assert!("bitcoin".parse::<PaymentMethod>().is_err());

        let unknown: PaymentMethod = serde_json::from_str("\"voucher\"").unwrap();
        assert_eq!(unknown, PaymentMethod::Other);
    }

    #[test]
    fn test_sale_item_line_total() {
        let item = SaleItem {
            product_id: "p1".into(),
            product_name: None,
            size_id: "s1".into(),
            size_name: None,
            quantity: 2,
            price: Money::from_cents(10_000),
            discount: DiscountRate::from_percentage(10.0),
        };
        assert_eq!(item.line_total().cents(), 18_000);
    }

    #[test]
    fn test_session_accepts_access_token_alias() {
        let session: Session = serde_json::from_value(json!({
            "access_token": "abc",
            "user": { "id": "u1", "name": "Ana", "email": "ana@x.com", "tenantId": "t1" }
        }))
        .unwrap();
        assert_eq!(session.token, "abc");
        assert_eq!(session.tenant_id(), "t1");
    }

    #[test]
    fn test_masked_access_token() {
        let config = MercadoPagoConfig {
            public_key: None,
            access_token: Some("APP_USR-123456".into()),
            enabled: true,
        };
        assert_eq!(config.masked_access_token().unwrap(), "**********3456");
    }

    #[test]
    fn test_paginated_total_pages() {
        let page: Paginated<CatalogEntry> =
            serde_json::from_value(json!({ "data": [], "total": 41, "limit": 20 })).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages(), 3);
    }
}
