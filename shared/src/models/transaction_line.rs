//! Transaction Line Model
//!
//! One row per product line within a transaction, as stored in the flat
//! append-only transaction log. Monetary and quantity columns may arrive
//! null from the source system, so they are optional here and coerced to
//! numbers at the accessor boundary — nothing downstream ever sees a null.

use serde::{Deserialize, Serialize};

/// Transaction type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum TrxType {
    #[serde(rename = "SALE")]
    #[cfg_attr(feature = "db", sqlx(rename = "SALE"))]
    Sale,
    #[serde(rename = "DELIVERY")]
    #[cfg_attr(feature = "db", sqlx(rename = "DELIVERY"))]
    Delivery,
    #[serde(rename = "RETURN")]
    #[cfg_attr(feature = "db", sqlx(rename = "RETURN"))]
    Return,
    #[serde(rename = "TARGET")]
    #[cfg_attr(feature = "db", sqlx(rename = "TARGET"))]
    Target,
}

/// Collection type for RETURN rows
///
/// GOOD = sellable/resalable return, BAD = wastage. Every RETURN row
/// carries exactly one of these; other transaction types carry none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum CollectionType {
    #[serde(rename = "GOOD")]
    #[cfg_attr(feature = "db", sqlx(rename = "GOOD"))]
    Good,
    #[serde(rename = "BAD")]
    #[cfg_attr(feature = "db", sqlx(rename = "BAD"))]
    Bad,
}

/// One product line of a transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TransactionLine {
    /// Transaction code (shared by all lines of one transaction)
    pub trx_code: String,
    /// Calendar day (YYYY-MM-DD)
    pub trx_date: String,
    pub trx_type: TrxType,
    /// Only present on RETURN rows
    pub collection_type: Option<CollectionType>,

    // -- Customer --
    pub customer_code: String,
    pub customer_name: String,
    /// Commercial segment of the customer (trade channel)
    pub channel_name: Option<String>,

    // -- Product --
    pub product_code: String,
    pub product_name: String,
    pub brand: Option<String>,
    pub category_name: Option<String>,
    /// Free-text reason captured with the return, if any
    pub return_reason: Option<String>,

    // -- Amounts --
    pub quantity: Option<f64>,
    pub unit_price: Option<f64>,
    /// |unit_price * quantity| for this line
    pub line_amount: Option<f64>,
    /// Total monetary value of the whole transaction
    pub total_amount: Option<f64>,

    // -- Organization --
    pub salesman_code: String,
    pub salesman_name: String,
    pub route_code: String,
    /// Route sub-area code assigned to the salesman
    pub subarea_code: Option<String>,
    pub region_code: String,
}

impl TransactionLine {
    /// Quantity coerced to a non-negative number (0 when missing)
    pub fn qty(&self) -> f64 {
        self.quantity.unwrap_or(0.0).abs()
    }

    /// Line-level amount: |line_amount|, falling back to
    /// |unit_price * quantity| when the source left the column null
    pub fn line_value(&self) -> f64 {
        match self.line_amount {
            Some(v) => v.abs(),
            None => (self.unit_price.unwrap_or(0.0) * self.quantity.unwrap_or(0.0)).abs(),
        }
    }

    /// Transaction-level amount, coerced (0 when missing)
    pub fn total_value(&self) -> f64 {
        self.total_amount.unwrap_or(0.0).abs()
    }

    pub fn is_good(&self) -> bool {
        self.collection_type == Some(CollectionType::Good)
    }

    pub fn is_bad(&self) -> bool {
        self.collection_type == Some(CollectionType::Bad)
    }
}
