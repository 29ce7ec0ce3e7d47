//! Analytics Report types
//!
//! The computed artifact of the analytics engine and the wire contract the
//! dashboard consumes. Envelope keys are camelCase (historical contract),
//! leaf fields snake_case. Every numeric leaf is a concrete number — the
//! coercion boundary in the engine guarantees no nulls survive aggregation.

use serde::{Deserialize, Serialize};

/// Full report tree, cached as one immutable value per filter combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    #[serde(rename = "returnReasons")]
    pub return_reasons: ReturnReasons,
    #[serde(rename = "periodReturns")]
    pub period_returns: PeriodReturns,
    #[serde(rename = "skuReturnPercentage")]
    pub sku_return_percentage: SkuReturnPercentage,
    #[serde(rename = "returnOnSales")]
    pub return_on_sales: ReturnOnSales,
    #[serde(rename = "goodReturnsDetail")]
    pub good_returns_detail: ReturnsDetail,
    #[serde(rename = "badReturnsDetail")]
    pub bad_returns_detail: ReturnsDetail,
}

/// "Why are goods coming back" view: brand ranking and the GOOD/BAD
/// split-row product ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnReasons {
    pub summary: ReturnsSummary,
    #[serde(rename = "byBrand")]
    pub by_brand: Vec<BrandReturns>,
    #[serde(rename = "byProduct")]
    pub by_product: Vec<ReturnReasonRow>,
}

/// Period-scoped breakdowns: per-product aggregates, channel ranking and
/// the daily trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodReturns {
    pub summary: ReturnsSummary,
    #[serde(rename = "byProduct")]
    pub by_product: Vec<ProductReturns>,
    #[serde(rename = "byCategory")]
    pub by_category: Vec<ChannelReturns>,
    #[serde(rename = "dailyTrend")]
    pub daily_trend: Vec<DailyReturns>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuReturnPercentage {
    pub summary: SkuSummary,
    pub data: Vec<SkuReturnRate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnOnSales {
    pub summary: SalesReturnSummary,
    pub data: Vec<SalesmanReturns>,
}

/// Unranked, unlimited row listing for drill-down export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnsDetail {
    pub data: Vec<ReturnDetailRow>,
}

/// Headline totals for the selected scope (transaction-level amounts)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnsSummary {
    pub good_return_value: f64,
    pub good_return_count: i64,
    pub bad_return_value: f64,
    pub bad_return_count: i64,
    /// Total return value (good + bad)
    pub return_value: f64,
    pub return_count: i64,
    pub return_qty: f64,
    pub sale_value: f64,
    pub sale_count: i64,
    /// return_value / sale_value * 100, 0 when sale_value <= 0
    pub return_percentage: f64,
    pub net_sales_value: f64,
    pub net_order_count: i64,
    pub currency_code: String,
}

/// Brand ranking row. Customer counts are distinct customers, not rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandReturns {
    pub brand_name: String,
    pub good_return_value: f64,
    pub good_customer_count: i64,
    pub bad_return_value: f64,
    pub bad_customer_count: i64,
    pub total_return_value: f64,
    pub customer_count: i64,
}

/// One split row of the product "return reason" ranking
///
/// A product appears at most twice: once as GOOD (Sellable Returns) and
/// once as BAD (Wastage), each only when that side has value > 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnReasonRow {
    /// "GOOD" or "BAD"
    pub return_category: String,
    /// Display reason: "Sellable Returns" or "Wastage"
    pub reason: String,
    pub product_code: String,
    pub product_name: String,
    pub brand: String,
    pub category_name: String,
    pub return_count: i64,
    /// Line-level value of this side of the split
    pub return_value: f64,
    pub return_qty: f64,
}

/// Per-product aggregate (line-level amounts, pre-split view)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductReturns {
    pub product_code: String,
    pub product_name: String,
    pub brand: String,
    pub category_name: String,
    pub return_qty: f64,
    pub return_value: f64,
    pub return_count: i64,
    pub good_return_value: f64,
    pub good_return_count: i64,
    pub bad_return_value: f64,
    pub bad_return_count: i64,
}

/// Channel ranking row (emitted under the historical `byCategory` key)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelReturns {
    pub category_name: String,
    pub return_qty: f64,
    pub return_value: f64,
    pub return_count: i64,
    pub good_return_value: f64,
    pub good_return_count: i64,
    pub bad_return_value: f64,
    pub bad_return_count: i64,
}

/// One calendar day of the trend, ascending by date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReturns {
    /// YYYY-MM-DD
    pub date: String,
    pub good_return_value: f64,
    pub good_return_count: i64,
    pub bad_return_value: f64,
    pub bad_return_count: i64,
    pub return_value: f64,
    pub return_count: i64,
    pub return_qty: f64,
}

/// SKU ranking summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuSummary {
    /// Distinct SKUs with returns that also sold in scope
    pub total_products_with_returns: i64,
    /// Unweighted mean of per-SKU return percentages
    pub avg_return_rate: f64,
    /// Units returned / units sold * 100
    pub overall_return_percentage: f64,
    pub total_sold: f64,
    pub total_returned: f64,
    pub good_returned: f64,
    pub bad_returned: f64,
    pub good_return_value: f64,
    pub bad_return_value: f64,
    pub total_return_value: f64,
    pub net_sales_value: f64,
    pub currency_code: String,
}

/// SKU row, ranked by return rate (not volume)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuReturnRate {
    pub product_code: String,
    pub product_name: String,
    pub category_name: String,
    /// Units sold in scope
    pub total_sold: f64,
    /// Units returned in scope
    pub total_returned: f64,
    /// return_value / sales_value * 100, 0 when sales_value <= 0
    pub return_percentage: f64,
    pub good_returned: f64,
    pub good_return_value: f64,
    pub bad_returned: f64,
    pub bad_return_value: f64,
    pub return_value: f64,
    pub sales_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReturnSummary {
    pub total_sales: f64,
    pub total_returns: f64,
    pub return_percentage: f64,
    pub good_return_value: f64,
    pub good_return_count: i64,
    pub bad_return_value: f64,
    pub bad_return_count: i64,
    pub currency_code: String,
}

/// Per-salesman row of the return-on-sales ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesmanReturns {
    pub salesman_code: String,
    pub salesman_name: String,
    /// Route sub-area code assigned to the salesman
    pub route_code: String,
    pub good_return_value: f64,
    pub good_return_count: i64,
    pub bad_return_value: f64,
    pub bad_return_count: i64,
    /// Total return value
    pub total_returns: f64,
    pub return_count: i64,
    /// Distinct customers who returned goods
    pub customer_count: i64,
    /// Left-joined sales total, 0 when the salesman made no sales in scope
    pub sales_value: f64,
    pub net_sales: f64,
    /// Rounded to 1 decimal, 0 when sales_value <= 0
    pub return_percentage: f64,
}

/// Full detail row for the good/bad listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnDetailRow {
    pub trx_code: String,
    pub trx_date: String,
    pub salesman_code: String,
    pub salesman_name: String,
    pub route_code: String,
    pub customer_code: String,
    pub customer_name: String,
    pub channel_name: String,
    pub region_code: String,
    pub product_code: String,
    pub product_name: String,
    pub category_name: String,
    pub brand: String,
    pub return_reason: String,
    pub quantity: f64,
    /// Line-level return value
    pub return_value: f64,
}
