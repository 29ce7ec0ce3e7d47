//! Transaction Line Repository
//!
//! Fetches the two working sets the aggregation engine runs on. Both sets
//! share the exact same `FilterCriteria` scope — the SQL here is the only
//! place that scope is applied, which is what keeps every report facet
//! mutually consistent.

use sqlx::SqlitePool;

use shared::models::TransactionLine;
use shared::response::CodeName;

use super::RepoResult;
use crate::engine::FilterCriteria;

const LINE_COLUMNS: &str = "trx_code, trx_date, trx_type, collection_type, customer_code, customer_name, channel_name, product_code, product_name, brand, category_name, return_reason, quantity, unit_price, line_amount, total_amount, salesman_code, salesman_name, route_code, subarea_code, region_code";

/// RETURN rows within scope
pub async fn fetch_returns(
    pool: &SqlitePool,
    criteria: &FilterCriteria,
) -> RepoResult<Vec<TransactionLine>> {
    fetch_by_type(pool, "RETURN", criteria).await
}

/// SALE rows within scope (value comparison only)
pub async fn fetch_sales(
    pool: &SqlitePool,
    criteria: &FilterCriteria,
) -> RepoResult<Vec<TransactionLine>> {
    fetch_by_type(pool, "SALE", criteria).await
}

async fn fetch_by_type(
    pool: &SqlitePool,
    trx_type: &str,
    criteria: &FilterCriteria,
) -> RepoResult<Vec<TransactionLine>> {
    let mut sql = format!(
        "SELECT {LINE_COLUMNS} FROM transaction_line WHERE trx_type = ? AND trx_date BETWEEN ? AND ?"
    );
    if criteria.region.is_some() {
        sql.push_str(" AND region_code = ?");
    }
    if criteria.route.is_some() {
        sql.push_str(" AND route_code = ?");
    }
    if criteria.salesman.is_some() {
        sql.push_str(" AND salesman_code = ?");
    }

    let mut query = sqlx::query_as::<_, TransactionLine>(&sql)
        .bind(trx_type.to_string())
        .bind(criteria.start_str())
        .bind(criteria.end_str());
    if let Some(region) = &criteria.region {
        query = query.bind(region.clone());
    }
    if let Some(route) = &criteria.route {
        query = query.bind(route.clone());
    }
    if let Some(salesman) = &criteria.salesman {
        query = query.bind(salesman.clone());
    }

    Ok(query.fetch_all(pool).await?)
}

/// Regions that actually have returns in the date range, busiest first
pub async fn distinct_regions(
    pool: &SqlitePool,
    start: &str,
    end: &str,
) -> RepoResult<Vec<CodeName>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT region_code FROM transaction_line \
         WHERE trx_type = 'RETURN' AND trx_date BETWEEN ? AND ? AND region_code != '' \
         GROUP BY region_code ORDER BY COUNT(DISTINCT route_code) DESC, region_code",
    )
    .bind(start.to_string())
    .bind(end.to_string())
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(code,)| CodeName {
            name: code.clone(),
            code,
        })
        .collect())
}

/// Routes with returns in range, optionally narrowed to one region
pub async fn distinct_routes(
    pool: &SqlitePool,
    start: &str,
    end: &str,
    region: Option<&str>,
) -> RepoResult<Vec<CodeName>> {
    let mut sql = String::from(
        "SELECT route_code FROM transaction_line \
         WHERE trx_type = 'RETURN' AND trx_date BETWEEN ? AND ? AND route_code != ''",
    );
    if region.is_some() {
        sql.push_str(" AND region_code = ?");
    }
    sql.push_str(" GROUP BY route_code ORDER BY route_code");

    let mut query = sqlx::query_as::<_, (String,)>(&sql)
        .bind(start.to_string())
        .bind(end.to_string());
    if let Some(region) = region {
        query = query.bind(region.to_string());
    }

    let rows = query.fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .map(|(code,)| CodeName {
            name: code.clone(),
            code,
        })
        .collect())
}

/// Salesmen with returns in range, optionally narrowed by region/route
pub async fn distinct_salesmen(
    pool: &SqlitePool,
    start: &str,
    end: &str,
    region: Option<&str>,
    route: Option<&str>,
) -> RepoResult<Vec<CodeName>> {
    let mut sql = String::from(
        "SELECT salesman_code, MAX(salesman_name) FROM transaction_line \
         WHERE trx_type = 'RETURN' AND trx_date BETWEEN ? AND ? AND salesman_code != ''",
    );
    if region.is_some() {
        sql.push_str(" AND region_code = ?");
    }
    if route.is_some() {
        sql.push_str(" AND route_code = ?");
    }
    sql.push_str(" GROUP BY salesman_code ORDER BY salesman_code");

    let mut query = sqlx::query_as::<_, (String, String)>(&sql)
        .bind(start.to_string())
        .bind(end.to_string());
    if let Some(region) = region {
        query = query.bind(region.to_string());
    }
    if let Some(route) = route {
        query = query.bind(route.to_string());
    }

    let rows = query.fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .map(|(code, name)| CodeName { code, name })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use chrono::NaiveDate;

    async fn seed(
        pool: &SqlitePool,
        trx_type: &str,
        date: &str,
        region: &str,
        route: &str,
        salesman: &str,
    ) {
        sqlx::query(
            "INSERT INTO transaction_line (trx_code, trx_date, trx_type, collection_type, \
             customer_code, customer_name, product_code, product_name, quantity, unit_price, \
             line_amount, total_amount, salesman_code, salesman_name, route_code, region_code) \
             VALUES ('T1', ?, ?, 'GOOD', 'C1', 'Customer', 'P1', 'Product', 1, 10, 10, 10, ?, 'Name', ?, ?)",
        )
        .bind(date)
        .bind(trx_type)
        .bind(salesman)
        .bind(route)
        .bind(region)
        .execute(pool)
        .await
        .unwrap();
    }

    fn criteria(region: &str, route: &str, salesman: &str) -> FilterCriteria {
        FilterCriteria::new(
            (
                NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            ),
            region,
            route,
            salesman,
        )
    }

    #[tokio::test]
    async fn date_range_is_inclusive_on_both_ends() {
        let db = DbService::in_memory().await.unwrap();
        seed(&db.pool, "RETURN", "2025-05-31", "DXB", "R1", "S1").await;
        seed(&db.pool, "RETURN", "2025-06-01", "DXB", "R1", "S1").await;
        seed(&db.pool, "RETURN", "2025-06-30", "DXB", "R1", "S1").await;
        seed(&db.pool, "RETURN", "2025-07-01", "DXB", "R1", "S1").await;

        let rows = fetch_returns(&db.pool, &criteria("all", "all", "all"))
            .await
            .unwrap();
        let dates: Vec<&str> = rows.iter().map(|r| r.trx_date.as_str()).collect();
        assert_eq!(dates.len(), 2);
        assert!(dates.contains(&"2025-06-01"));
        assert!(dates.contains(&"2025-06-30"));
    }

    #[tokio::test]
    async fn dimension_filters_combine_with_and_semantics() {
        let db = DbService::in_memory().await.unwrap();
        seed(&db.pool, "RETURN", "2025-06-10", "DXB", "R1", "S1").await;
        seed(&db.pool, "RETURN", "2025-06-10", "DXB", "R2", "S2").await;
        seed(&db.pool, "RETURN", "2025-06-10", "AUH", "R1", "S1").await;

        let rows = fetch_returns(&db.pool, &criteria("DXB", "R1", "S1"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].region_code, "DXB");
        assert_eq!(rows[0].route_code, "R1");
    }

    #[tokio::test]
    async fn type_split_keeps_sales_out_of_returns() {
        let db = DbService::in_memory().await.unwrap();
        seed(&db.pool, "RETURN", "2025-06-10", "DXB", "R1", "S1").await;
        seed(&db.pool, "SALE", "2025-06-10", "DXB", "R1", "S1").await;
        seed(&db.pool, "DELIVERY", "2025-06-10", "DXB", "R1", "S1").await;

        let returns = fetch_returns(&db.pool, &criteria("all", "all", "all"))
            .await
            .unwrap();
        let sales = fetch_sales(&db.pool, &criteria("all", "all", "all"))
            .await
            .unwrap();
        assert_eq!(returns.len(), 1);
        assert_eq!(sales.len(), 1);
    }

    #[tokio::test]
    async fn filter_options_cascade_by_region() {
        let db = DbService::in_memory().await.unwrap();
        seed(&db.pool, "RETURN", "2025-06-10", "DXB", "R1", "S1").await;
        seed(&db.pool, "RETURN", "2025-06-10", "AUH", "R2", "S2").await;

        let routes = distinct_routes(&db.pool, "2025-06-01", "2025-06-30", Some("DXB"))
            .await
            .unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].code, "R1");

        let salesmen = distinct_salesmen(&db.pool, "2025-06-01", "2025-06-30", None, None)
            .await
            .unwrap();
        assert_eq!(salesmen.len(), 2);
    }
}
