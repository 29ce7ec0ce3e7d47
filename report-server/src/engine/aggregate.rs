//! Aggregation Engine
//!
//! Pure facet computations over the two working sets (returns / sales).
//! Both sets were fetched under one `FilterCriteria`, so every facet here
//! describes exactly the same scope. Amount semantics per facet:
//!
//! - summary, salesman ranking, daily trend: transaction-level totals
//! - brand, product, channel, SKU facets: line-level amounts, because one
//!   transaction can span several products/brands
//!
//! Ranking ties are broken by code/name ascending so output order is
//! deterministic for equal aggregate values.

use std::collections::{BTreeMap, HashMap, HashSet};

use shared::models::TransactionLine;
use shared::report::{
    BrandReturns, ChannelReturns, DailyReturns, ProductReturns, ReportData, ReturnDetailRow,
    ReturnOnSales, ReturnReasonRow, ReturnReasons, ReturnsDetail, ReturnsSummary,
    SalesReturnSummary, SalesmanReturns, SkuReturnPercentage, SkuReturnRate, SkuSummary,
    PeriodReturns,
};

use super::shape::{mean_pct, money, pct};

const TOP_BRANDS: usize = 5;
const TOP_CHANNELS: usize = 10;
const TOP_PRODUCT_ROWS: usize = 20;
const TOP_SKUS: usize = 50;

const CATEGORY_GOOD: &str = "GOOD";
const CATEGORY_BAD: &str = "BAD";
const REASON_GOOD: &str = "Sellable Returns";
const REASON_BAD: &str = "Wastage";
const UNKNOWN_CHANNEL: &str = "Unknown";

/// Assemble the complete report tree from the two working sets
pub fn build_report(
    returns: &[TransactionLine],
    sales: &[TransactionLine],
    currency: &str,
) -> ReportData {
    let summary = build_summary(returns, sales, currency);
    let products = product_aggregates(returns);
    let (good_detail, bad_detail) = build_details(returns);

    ReportData {
        return_reasons: ReturnReasons {
            summary: summary.clone(),
            by_brand: build_by_brand(returns),
            by_product: build_return_reason_rows(&products),
        },
        period_returns: PeriodReturns {
            summary,
            by_product: build_by_product(&products),
            by_category: build_by_channel(returns),
            daily_trend: build_daily_trend(returns),
        },
        sku_return_percentage: build_sku_return_percentage(returns, sales, currency),
        return_on_sales: build_return_on_sales(returns, sales, currency),
        good_returns_detail: good_detail,
        bad_returns_detail: bad_detail,
    }
}

/// Headline totals (transaction-level amounts)
pub fn build_summary(
    returns: &[TransactionLine],
    sales: &[TransactionLine],
    currency: &str,
) -> ReturnsSummary {
    let mut good_value = 0.0;
    let mut good_count = 0i64;
    let mut bad_value = 0.0;
    let mut bad_count = 0i64;
    let mut total_value = 0.0;
    let mut return_qty = 0.0;

    for line in returns {
        let value = line.total_value();
        total_value += value;
        return_qty += line.qty();
        if line.is_good() {
            good_value += value;
            good_count += 1;
        } else if line.is_bad() {
            bad_value += value;
            bad_count += 1;
        }
    }

    let sale_value: f64 = sales.iter().map(|l| l.total_value()).sum();
    let sale_count = sales.len() as i64;
    let return_count = returns.len() as i64;

    ReturnsSummary {
        good_return_value: money(good_value),
        good_return_count: good_count,
        bad_return_value: money(bad_value),
        bad_return_count: bad_count,
        return_value: money(total_value),
        return_count,
        return_qty,
        sale_value: money(sale_value),
        sale_count,
        return_percentage: pct(total_value, sale_value),
        net_sales_value: money(sale_value - total_value),
        net_order_count: sale_count - return_count,
        currency_code: currency.to_string(),
    }
}

/// Daily trend, ascending by calendar day (transaction-level amounts)
pub fn build_daily_trend(returns: &[TransactionLine]) -> Vec<DailyReturns> {
    // BTreeMap keyed by YYYY-MM-DD keeps days sorted ascending for free
    let mut days: BTreeMap<String, DailyReturns> = BTreeMap::new();

    for line in returns {
        let day = days
            .entry(line.trx_date.clone())
            .or_insert_with(|| DailyReturns {
                date: line.trx_date.clone(),
                good_return_value: 0.0,
                good_return_count: 0,
                bad_return_value: 0.0,
                bad_return_count: 0,
                return_value: 0.0,
                return_count: 0,
                return_qty: 0.0,
            });

        let value = line.total_value();
        day.return_value += value;
        day.return_count += 1;
        day.return_qty += line.qty();
        if line.is_good() {
            day.good_return_value += value;
            day.good_return_count += 1;
        } else if line.is_bad() {
            day.bad_return_value += value;
            day.bad_return_count += 1;
        }
    }

    days.into_values()
        .map(|mut d| {
            d.good_return_value = money(d.good_return_value);
            d.bad_return_value = money(d.bad_return_value);
            d.return_value = money(d.return_value);
            d
        })
        .collect()
}

struct BrandAgg {
    good_value: f64,
    bad_value: f64,
    good_customers: HashSet<String>,
    bad_customers: HashSet<String>,
    customers: HashSet<String>,
}

/// Top brands by total return value (line-level; customer counts are
/// distinct customers, not row counts). Rows without a brand are skipped.
pub fn build_by_brand(returns: &[TransactionLine]) -> Vec<BrandReturns> {
    let mut brands: HashMap<String, BrandAgg> = HashMap::new();

    for line in returns {
        let Some(brand) = line.brand.as_deref().filter(|b| !b.trim().is_empty()) else {
            continue;
        };
        let agg = brands.entry(brand.to_string()).or_insert_with(|| BrandAgg {
            good_value: 0.0,
            bad_value: 0.0,
            good_customers: HashSet::new(),
            bad_customers: HashSet::new(),
            customers: HashSet::new(),
        });

        let value = line.line_value();
        agg.customers.insert(line.customer_code.clone());
        if line.is_good() {
            agg.good_value += value;
            agg.good_customers.insert(line.customer_code.clone());
        } else if line.is_bad() {
            agg.bad_value += value;
            agg.bad_customers.insert(line.customer_code.clone());
        }
    }

    let mut rows: Vec<BrandReturns> = brands
        .into_iter()
        .map(|(brand_name, agg)| BrandReturns {
            brand_name,
            good_return_value: money(agg.good_value),
            good_customer_count: agg.good_customers.len() as i64,
            bad_return_value: money(agg.bad_value),
            bad_customer_count: agg.bad_customers.len() as i64,
            total_return_value: money(agg.good_value + agg.bad_value),
            customer_count: agg.customers.len() as i64,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_return_value
            .total_cmp(&a.total_return_value)
            .then_with(|| a.brand_name.cmp(&b.brand_name))
    });
    rows.truncate(TOP_BRANDS);
    rows
}

/// Per-product aggregate (line-level amounts), shared by the pre-split and
/// split product facets
pub struct ProductAgg {
    pub product_code: String,
    pub product_name: String,
    pub brand: String,
    pub category_name: String,
    pub good_value: f64,
    pub good_count: i64,
    pub good_qty: f64,
    pub bad_value: f64,
    pub bad_count: i64,
    pub bad_qty: f64,
}

impl ProductAgg {
    fn total_value(&self) -> f64 {
        self.good_value + self.bad_value
    }
}

pub fn product_aggregates(returns: &[TransactionLine]) -> Vec<ProductAgg> {
    let mut products: BTreeMap<String, ProductAgg> = BTreeMap::new();

    for line in returns {
        let agg = products
            .entry(line.product_code.clone())
            .or_insert_with(|| ProductAgg {
                product_code: line.product_code.clone(),
                product_name: line.product_name.clone(),
                brand: line.brand.clone().unwrap_or_default(),
                category_name: line.category_name.clone().unwrap_or_default(),
                good_value: 0.0,
                good_count: 0,
                good_qty: 0.0,
                bad_value: 0.0,
                bad_count: 0,
                bad_qty: 0.0,
            });

        let value = line.line_value();
        if line.is_good() {
            agg.good_value += value;
            agg.good_count += 1;
            agg.good_qty += line.qty();
        } else if line.is_bad() {
            agg.bad_value += value;
            agg.bad_count += 1;
            agg.bad_qty += line.qty();
        }
    }

    products.into_values().collect()
}

/// Top products by total return value (pre-split view)
pub fn build_by_product(products: &[ProductAgg]) -> Vec<ProductReturns> {
    let mut rows: Vec<ProductReturns> = products
        .iter()
        .filter(|p| p.total_value() > 0.0)
        .map(|p| ProductReturns {
            product_code: p.product_code.clone(),
            product_name: p.product_name.clone(),
            brand: p.brand.clone(),
            category_name: p.category_name.clone(),
            return_qty: p.good_qty + p.bad_qty,
            return_value: money(p.total_value()),
            return_count: p.good_count + p.bad_count,
            good_return_value: money(p.good_value),
            good_return_count: p.good_count,
            bad_return_value: money(p.bad_value),
            bad_return_count: p.bad_count,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.return_value
            .total_cmp(&a.return_value)
            .then_with(|| a.product_code.cmp(&b.product_code))
    });
    rows.truncate(TOP_PRODUCT_ROWS);
    rows
}

/// Split each product into up to two ranked rows (GOOD / BAD), then keep
/// the top rows across all products — top 20 ROWS, not top 20 products.
pub fn build_return_reason_rows(products: &[ProductAgg]) -> Vec<ReturnReasonRow> {
    let mut rows: Vec<ReturnReasonRow> = Vec::new();

    for p in products {
        if p.good_value > 0.0 {
            rows.push(ReturnReasonRow {
                return_category: CATEGORY_GOOD.to_string(),
                reason: REASON_GOOD.to_string(),
                product_code: p.product_code.clone(),
                product_name: p.product_name.clone(),
                brand: p.brand.clone(),
                category_name: p.category_name.clone(),
                return_count: p.good_count,
                return_value: money(p.good_value),
                return_qty: p.good_qty,
            });
        }
        if p.bad_value > 0.0 {
            rows.push(ReturnReasonRow {
                return_category: CATEGORY_BAD.to_string(),
                reason: REASON_BAD.to_string(),
                product_code: p.product_code.clone(),
                product_name: p.product_name.clone(),
                brand: p.brand.clone(),
                category_name: p.category_name.clone(),
                return_count: p.bad_count,
                return_value: money(p.bad_value),
                return_qty: p.bad_qty,
            });
        }
    }

    rows.sort_by(|a, b| {
        b.return_value
            .total_cmp(&a.return_value)
            .then_with(|| a.product_code.cmp(&b.product_code))
            .then_with(|| a.return_category.cmp(&b.return_category))
    });
    rows.truncate(TOP_PRODUCT_ROWS);
    rows
}

/// Top customer channels by return value (line-level amounts)
pub fn build_by_channel(returns: &[TransactionLine]) -> Vec<ChannelReturns> {
    let mut channels: HashMap<String, ChannelReturns> = HashMap::new();

    for line in returns {
        let name = line
            .channel_name
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(UNKNOWN_CHANNEL);
        let agg = channels
            .entry(name.to_string())
            .or_insert_with(|| ChannelReturns {
                category_name: name.to_string(),
                return_qty: 0.0,
                return_value: 0.0,
                return_count: 0,
                good_return_value: 0.0,
                good_return_count: 0,
                bad_return_value: 0.0,
                bad_return_count: 0,
            });

        let value = line.line_value();
        agg.return_value += value;
        agg.return_count += 1;
        agg.return_qty += line.qty();
        if line.is_good() {
            agg.good_return_value += value;
            agg.good_return_count += 1;
        } else if line.is_bad() {
            agg.bad_return_value += value;
            agg.bad_return_count += 1;
        }
    }

    let mut rows: Vec<ChannelReturns> = channels
        .into_values()
        .map(|mut c| {
            c.return_value = money(c.return_value);
            c.good_return_value = money(c.good_return_value);
            c.bad_return_value = money(c.bad_return_value);
            c
        })
        .collect();

    rows.sort_by(|a, b| {
        b.return_value
            .total_cmp(&a.return_value)
            .then_with(|| a.category_name.cmp(&b.category_name))
    });
    rows.truncate(TOP_CHANNELS);
    rows
}

struct SalesmanAgg {
    name: String,
    route_code: String,
    good_value: f64,
    good_count: i64,
    bad_value: f64,
    bad_count: i64,
    total_value: f64,
    return_count: i64,
    customers: HashSet<String>,
}

/// Return-on-sales ranking by salesman (transaction-level amounts).
/// Salesmen appear when they processed returns in scope; their sales total
/// is left-joined and may be 0.
pub fn build_return_on_sales(
    returns: &[TransactionLine],
    sales: &[TransactionLine],
    currency: &str,
) -> ReturnOnSales {
    let mut salesmen: HashMap<String, SalesmanAgg> = HashMap::new();
    for line in returns {
        let agg = salesmen
            .entry(line.salesman_code.clone())
            .or_insert_with(|| SalesmanAgg {
                name: line.salesman_name.clone(),
                // The dashboard's Route column shows the sub-area code
                route_code: line
                    .subarea_code
                    .clone()
                    .unwrap_or_else(|| line.route_code.clone()),
                good_value: 0.0,
                good_count: 0,
                bad_value: 0.0,
                bad_count: 0,
                total_value: 0.0,
                return_count: 0,
                customers: HashSet::new(),
            });

        let value = line.total_value();
        agg.total_value += value;
        agg.return_count += 1;
        agg.customers.insert(line.customer_code.clone());
        if line.is_good() {
            agg.good_value += value;
            agg.good_count += 1;
        } else if line.is_bad() {
            agg.bad_value += value;
            agg.bad_count += 1;
        }
    }

    let mut sales_by_salesman: HashMap<&str, f64> = HashMap::new();
    for line in sales {
        *sales_by_salesman.entry(&line.salesman_code).or_insert(0.0) += line.total_value();
    }

    let mut rows: Vec<SalesmanReturns> = salesmen
        .into_iter()
        .map(|(code, agg)| {
            let sales_value = sales_by_salesman.get(code.as_str()).copied().unwrap_or(0.0);
            SalesmanReturns {
                salesman_name: agg.name,
                route_code: agg.route_code,
                good_return_value: money(agg.good_value),
                good_return_count: agg.good_count,
                bad_return_value: money(agg.bad_value),
                bad_return_count: agg.bad_count,
                total_returns: money(agg.total_value),
                return_count: agg.return_count,
                customer_count: agg.customers.len() as i64,
                sales_value: money(sales_value),
                net_sales: money(sales_value - agg.total_value),
                return_percentage: pct(agg.total_value, sales_value),
                salesman_code: code,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_returns
            .total_cmp(&a.total_returns)
            .then_with(|| a.salesman_code.cmp(&b.salesman_code))
    });

    let total_sales: f64 = sales.iter().map(|l| l.total_value()).sum();
    let total_returns: f64 = returns.iter().map(|l| l.total_value()).sum();
    let good_value: f64 = returns
        .iter()
        .filter(|l| l.is_good())
        .map(|l| l.total_value())
        .sum();
    let bad_value: f64 = returns
        .iter()
        .filter(|l| l.is_bad())
        .map(|l| l.total_value())
        .sum();

    ReturnOnSales {
        summary: SalesReturnSummary {
            total_sales: money(total_sales),
            total_returns: money(total_returns),
            return_percentage: pct(total_returns, total_sales),
            good_return_value: money(good_value),
            good_return_count: returns.iter().filter(|l| l.is_good()).count() as i64,
            bad_return_value: money(bad_value),
            bad_return_count: returns.iter().filter(|l| l.is_bad()).count() as i64,
            currency_code: currency.to_string(),
        },
        data: rows,
    }
}

struct SkuSales {
    name: String,
    category: String,
    units: f64,
    value: f64,
    transactions: HashSet<String>,
}

struct SkuReturns {
    good_units: f64,
    good_value: f64,
    bad_units: f64,
    bad_value: f64,
}

/// SKU ranking by return RATE, not volume
///
/// Left-join sales → returns per SKU; SKUs with sales but zero returns are
/// excluded from the ranked list. `avg_return_rate` is the unweighted mean
/// over the joined set, computed before the top-N truncation.
pub fn build_sku_return_percentage(
    returns: &[TransactionLine],
    sales: &[TransactionLine],
    currency: &str,
) -> SkuReturnPercentage {
    let mut sales_by_sku: BTreeMap<String, SkuSales> = BTreeMap::new();
    for line in sales {
        let agg = sales_by_sku
            .entry(line.product_code.clone())
            .or_insert_with(|| SkuSales {
                name: line.product_name.clone(),
                category: line.category_name.clone().unwrap_or_default(),
                units: 0.0,
                value: 0.0,
                transactions: HashSet::new(),
            });
        agg.units += line.qty();
        agg.value += line.line_value();
        agg.transactions.insert(line.trx_code.clone());
    }

    let mut returns_by_sku: HashMap<String, SkuReturns> = HashMap::new();
    for line in returns {
        let agg = returns_by_sku
            .entry(line.product_code.clone())
            .or_insert_with(|| SkuReturns {
                good_units: 0.0,
                good_value: 0.0,
                bad_units: 0.0,
                bad_value: 0.0,
            });
        if line.is_good() {
            agg.good_units += line.qty();
            agg.good_value += line.line_value();
        } else if line.is_bad() {
            agg.bad_units += line.qty();
            agg.bad_value += line.line_value();
        }
    }

    let mut rows: Vec<SkuReturnRate> = Vec::new();
    for (code, sku_sales) in &sales_by_sku {
        let Some(sku_returns) = returns_by_sku.get(code) else {
            continue;
        };
        let return_value = sku_returns.good_value + sku_returns.bad_value;
        // SKUs that sold but had nothing come back are not "return" SKUs
        if return_value <= 0.0 {
            continue;
        }
        rows.push(SkuReturnRate {
            product_code: code.clone(),
            product_name: sku_sales.name.clone(),
            category_name: sku_sales.category.clone(),
            total_sold: sku_sales.units,
            total_returned: sku_returns.good_units + sku_returns.bad_units,
            return_percentage: pct(return_value, sku_sales.value),
            good_returned: sku_returns.good_units,
            good_return_value: money(sku_returns.good_value),
            bad_returned: sku_returns.bad_units,
            bad_return_value: money(sku_returns.bad_value),
            return_value: money(return_value),
            sales_value: money(sku_sales.value),
        });
    }

    // Summary stats cover the full joined set, not just the top N
    let joined_rates: Vec<f64> = rows.iter().map(|r| r.return_percentage).collect();
    let total_products_with_returns = rows.len() as i64;

    rows.sort_by(|a, b| {
        b.return_percentage
            .total_cmp(&a.return_percentage)
            .then_with(|| a.product_code.cmp(&b.product_code))
    });
    rows.truncate(TOP_SKUS);

    let total_sold: f64 = sales.iter().map(|l| l.qty()).sum();
    let total_returned: f64 = returns.iter().map(|l| l.qty()).sum();
    let good_returned: f64 = returns.iter().filter(|l| l.is_good()).map(|l| l.qty()).sum();
    let bad_returned: f64 = returns.iter().filter(|l| l.is_bad()).map(|l| l.qty()).sum();
    let good_value: f64 = returns
        .iter()
        .filter(|l| l.is_good())
        .map(|l| l.line_value())
        .sum();
    let bad_value: f64 = returns
        .iter()
        .filter(|l| l.is_bad())
        .map(|l| l.line_value())
        .sum();
    let sales_value: f64 = sales.iter().map(|l| l.line_value()).sum();
    let return_value: f64 = returns.iter().map(|l| l.line_value()).sum();

    SkuReturnPercentage {
        summary: SkuSummary {
            total_products_with_returns,
            avg_return_rate: mean_pct(&joined_rates),
            overall_return_percentage: pct(total_returned, total_sold),
            total_sold,
            total_returned,
            good_returned,
            bad_returned,
            good_return_value: money(good_value),
            bad_return_value: money(bad_value),
            total_return_value: money(return_value),
            net_sales_value: money(sales_value - return_value),
            currency_code: currency.to_string(),
        },
        data: rows,
    }
}

/// Row-level drill-down listings, split by collection type.
/// Sorted by date descending, then product code ascending.
pub fn build_details(returns: &[TransactionLine]) -> (ReturnsDetail, ReturnsDetail) {
    let mut good: Vec<ReturnDetailRow> = Vec::new();
    let mut bad: Vec<ReturnDetailRow> = Vec::new();

    for line in returns {
        let row = ReturnDetailRow {
            trx_code: line.trx_code.clone(),
            trx_date: line.trx_date.clone(),
            salesman_code: line.salesman_code.clone(),
            salesman_name: line.salesman_name.clone(),
            route_code: line.route_code.clone(),
            customer_code: line.customer_code.clone(),
            customer_name: line.customer_name.clone(),
            channel_name: line
                .channel_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_CHANNEL.to_string()),
            region_code: line.region_code.clone(),
            product_code: line.product_code.clone(),
            product_name: line.product_name.clone(),
            category_name: line.category_name.clone().unwrap_or_default(),
            brand: line.brand.clone().unwrap_or_default(),
            return_reason: line
                .return_reason
                .clone()
                .unwrap_or_else(|| "No Reason Specified".to_string()),
            quantity: line.qty(),
            return_value: money(line.line_value()),
        };
        if line.is_good() {
            good.push(row);
        } else if line.is_bad() {
            bad.push(row);
        }
    }

    let by_date_desc = |a: &ReturnDetailRow, b: &ReturnDetailRow| {
        b.trx_date
            .cmp(&a.trx_date)
            .then_with(|| a.product_code.cmp(&b.product_code))
    };
    good.sort_by(by_date_desc);
    bad.sort_by(by_date_desc);

    (ReturnsDetail { data: good }, ReturnsDetail { data: bad })
}
