//! Wire representations of Shopify Admin API resources.
//!
//! Payloads arriving from the API and from webhooks are structurally the
//! same but loosely typed: money fields may be strings or numbers, most
//! fields are optional, and tags arrive as one comma-separated string.
//! These types absorb that looseness at the boundary so the rest of the
//! crate works with `Decimal` and `Vec<String>`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use storepulse_core::normalize_tags;

/// Lenient deserializers for fields Shopify serializes inconsistently.
pub mod lenient {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};
    use std::str::FromStr;

    /// Deserialize a decimal that may arrive as a JSON string, a JSON
    /// number, or be absent/null. Unparseable values become `None` rather
    /// than failing the whole record.
    ///
    /// # Errors
    ///
    /// Never fails on value shape; only on malformed JSON at a lower level.
    pub fn decimal_opt<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(serde_json::Value::String(s)) => Decimal::from_str(s.trim()).ok(),
            Some(serde_json::Value::Number(n)) => Decimal::from_str(&n.to_string()).ok(),
            _ => None,
        })
    }
}

/// A customer record as it appears on the wire, either standalone or
/// embedded in an order.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyCustomer {
    pub id: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub orders_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient::decimal_opt")]
    pub total_spent: Option<Decimal>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ShopifyCustomer {
    /// The customer's tags as a normalized list.
    #[must_use]
    pub fn tag_list(&self) -> Vec<String> {
        self.tags.as_deref().map(normalize_tags).unwrap_or_default()
    }
}

/// A product record as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyProduct {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ShopifyProduct {
    /// The product's tags as a normalized list.
    #[must_use]
    pub fn tag_list(&self) -> Vec<String> {
        self.tags.as_deref().map(normalize_tags).unwrap_or_default()
    }
}

/// An order record as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyOrder {
    pub id: i64,
    #[serde(default)]
    pub order_number: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub customer: Option<ShopifyCustomer>,
    #[serde(default, deserialize_with = "lenient::decimal_opt")]
    pub total_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal_opt")]
    pub subtotal_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal_opt")]
    pub total_tax: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub financial_status: Option<String>,
    #[serde(default)]
    pub fulfillment_status: Option<String>,
    #[serde(default)]
    pub line_items: Vec<ShopifyLineItem>,
    #[serde(default)]
    pub billing_address: Option<serde_json::Value>,
    #[serde(default)]
    pub shipping_address: Option<serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A line item inside an order.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyLineItem {
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub variant_id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default, deserialize_with = "lenient::decimal_opt")]
    pub price: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_customer_with_string_money_and_tags() {
        let json = r#"{
            "id": 501,
            "email": "buyer@shop.example",
            "total_spent": "125.50",
            "orders_count": 3,
            "tags": "VIP, Newsletter"
        }"#;
        let customer: ShopifyCustomer = serde_json::from_str(json).unwrap();

        assert_eq!(customer.id, 501);
        assert_eq!(customer.total_spent, Some(dec("125.50")));
        assert_eq!(customer.orders_count, Some(3));
        assert_eq!(customer.tag_list(), vec!["VIP", "Newsletter"]);
    }

    #[test]
    fn test_customer_with_numeric_money() {
        let json = r#"{"id": 1, "total_spent": 99.9}"#;
        let customer: ShopifyCustomer = serde_json::from_str(json).unwrap();
        assert_eq!(customer.total_spent, Some(dec("99.9")));
    }

    #[test]
    fn test_unparseable_money_becomes_none() {
        let json = r#"{"id": 1, "total_spent": "not money"}"#;
        let customer: ShopifyCustomer = serde_json::from_str(json).unwrap();
        assert_eq!(customer.total_spent, None);
    }

    #[test]
    fn test_minimal_customer() {
        let customer: ShopifyCustomer = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(customer.email, None);
        assert!(customer.tag_list().is_empty());
    }

    #[test]
    fn test_order_with_embedded_customer_and_items() {
        let json = r#"{
            "id": 9001,
            "order_number": 1042,
            "total_price": "210.00",
            "currency": "USD",
            "financial_status": "paid",
            "customer": {"id": 501, "email": "buyer@shop.example"},
            "line_items": [
                {"product_id": 77, "title": "Widget", "quantity": 2, "price": "105.00"}
            ]
        }"#;
        let order: ShopifyOrder = serde_json::from_str(json).unwrap();

        assert_eq!(order.total_price, Some(dec("210.00")));
        assert_eq!(order.customer.as_ref().map(|c| c.id), Some(501));
        assert_eq!(order.line_items.len(), 1);
        assert_eq!(order.line_items[0].price, Some(dec("105.00")));
    }

    #[test]
    fn test_product_tags_and_handle() {
        let json = r#"{
            "id": 77,
            "title": "Widget",
            "handle": "widget",
            "tags": "sale, featured, sale"
        }"#;
        let product: ShopifyProduct = serde_json::from_str(json).unwrap();
        assert_eq!(product.handle.as_deref(), Some("widget"));
        assert_eq!(product.tag_list(), vec!["sale", "featured"]);
    }
}
