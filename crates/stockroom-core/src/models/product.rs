//! Catalog product types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    #[cfg_attr(feature = "ts", ts(type = "string | null"))]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    #[cfg_attr(feature = "ts", ts(type = "string | null"))]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Writable product fields, used for both create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut problems = Vec::new();
        if self.name.trim().is_empty() {
            problems.push("Product name is required".to_string());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            problems.push("Price must be a non-negative number".to_string());
        }
        if self.stock < 0 {
            problems.push("Stock cannot be negative".to_string());
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }
}

/// Search filters for the catalog. Unset filters are left out of the query.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
}

impl ProductQuery {
    pub fn text(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_product_response() {
        let json = r#"{"id":"p1","name":"Lamp","price":19.5,"stock":3,"category":"home","createdAt":"2024-03-01T12:00:00Z"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.name, "Lamp");
        assert!(product.in_stock());
        assert_eq!(product.description, None);
        assert!(product.created_at.is_some());
        assert_eq!(product.updated_at, None);
    }

    #[test]
    fn test_new_product_validation() {
        let ok = NewProduct {
            name: "Lamp".to_string(),
            description: None,
            price: 0.0,
            stock: 0,
            category: None,
            image_url: None,
        };
        assert!(ok.validate().is_ok());

        let bad = NewProduct {
            name: "".to_string(),
            price: f64::NAN,
            stock: -1,
            ..ok
        };
        assert_eq!(bad.validate().unwrap_err().len(), 3);
    }

    #[test]
    fn test_query_serializes_only_set_filters() {
        let query = ProductQuery {
            category: Some("home".to_string()),
            max_price: Some(50.0),
            ..Default::default()
        };
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value, serde_json::json!({"category": "home", "maxPrice": 50.0}));
    }
}
