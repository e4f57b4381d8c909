//! Repository for the append-only `qr_code_scans` table.
//!
//! A scan belongs to the company of the person who scanned it.

use sitetrack_core::status::ScanType;
use sitetrack_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::qr_scan::{CreateQrCodeScan, QrCodeScan, ScanFactRow, ScanScope, ScanTypeCount};
use crate::repositories::filter::{BindValue, Filter};

/// Joined projection. Aliases: `s` qr_code_scans, `u` users, `p` projects.
const COLUMNS: &str = "s.id, s.qr_code_data, s.user_id, s.project_id, s.scanned_at, s.location, \
                       s.scan_type_id, s.notes, s.is_valid, s.additional_data, s.latitude, \
                       s.longitude, s.created_at, \
                       NULLIF(TRIM(CONCAT(u.first_name, ' ', u.last_name)), '') AS user_name, \
                       p.name AS project_name";

const FROM: &str = "qr_code_scans s \
                    JOIN users u ON u.id = s.user_id \
                    LEFT JOIN projects p ON p.id = s.project_id";

/// Scan history and the fact projections used by presence and reports.
pub struct QrScanRepo;

impl QrScanRepo {
    /// Record a scan, returning its id.
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        input: &CreateQrCodeScan,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO qr_code_scans (qr_code_data, user_id, project_id, scanned_at, location,
                                        scan_type_id, notes, additional_data, latitude, longitude)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING id",
        )
        .bind(&input.qr_code_data)
        .bind(input.user_id)
        .bind(input.project_id)
        .bind(input.scanned_at)
        .bind(&input.location)
        .bind(input.scan_type.id())
        .bind(&input.notes)
        .bind(&input.additional_data)
        .bind(input.latitude)
        .bind(input.longitude)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<QrCodeScan>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE s.id = $1");
        sqlx::query_as::<_, QrCodeScan>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Paged scans in scope, newest first. Includes invalid scans.
    pub async fn list(
        pool: &PgPool,
        scope: &ScanScope,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<QrCodeScan>, sqlx::Error> {
        let filter = build_scan_filter(scope);
        let bind_idx = filter.next_index();
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} {} \
             ORDER BY s.scanned_at DESC, s.id DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            filter.where_clause(),
            bind_idx + 1
        );
        filter
            .bind_as(sqlx::query_as::<_, QrCodeScan>(&query))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Scans in scope, oldest first, unpaged.
    pub async fn list_ascending(
        pool: &PgPool,
        scope: &ScanScope,
    ) -> Result<Vec<QrCodeScan>, sqlx::Error> {
        let filter = build_scan_filter(scope);
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} {} ORDER BY s.scanned_at, s.id",
            filter.where_clause()
        );
        filter
            .bind_as(sqlx::query_as::<_, QrCodeScan>(&query))
            .fetch_all(pool)
            .await
    }

    /// Count scans in scope (for pagination metadata).
    pub async fn count(pool: &PgPool, scope: &ScanScope) -> Result<i64, sqlx::Error> {
        let filter = build_scan_filter(scope);
        let query = format!("SELECT COUNT(*) FROM {FROM} {}", filter.where_clause());
        filter
            .bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    /// Valid scans in scope, oldest first, as aggregation facts.
    pub async fn facts(pool: &PgPool, scope: &ScanScope) -> Result<Vec<ScanFactRow>, sqlx::Error> {
        let mut filter = build_scan_filter(scope);
        filter.raw("s.is_valid = true");
        let query = format!(
            "SELECT s.user_id, s.project_id, s.scanned_at, s.scan_type_id FROM {FROM} {} \
             ORDER BY s.scanned_at, s.id",
            filter.where_clause()
        );
        filter
            .bind_as(sqlx::query_as::<_, ScanFactRow>(&query))
            .fetch_all(pool)
            .await
    }

    /// Valid check-ins in scope.
    pub async fn count_check_ins(pool: &PgPool, scope: &ScanScope) -> Result<i64, sqlx::Error> {
        let mut filter = build_scan_filter(scope);
        filter
            .raw("s.is_valid = true")
            .push("s.scan_type_id = {}", BindValue::SmallInt(ScanType::CheckIn.id()));
        let query = format!("SELECT COUNT(*) FROM {FROM} {}", filter.where_clause());
        filter
            .bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    /// Scan count per type in scope.
    pub async fn count_by_type(
        pool: &PgPool,
        scope: &ScanScope,
    ) -> Result<Vec<ScanTypeCount>, sqlx::Error> {
        let filter = build_scan_filter(scope);
        let query = format!(
            "SELECT s.scan_type_id, COUNT(*) AS count FROM {FROM} {} \
             GROUP BY s.scan_type_id ORDER BY s.scan_type_id",
            filter.where_clause()
        );
        filter
            .bind_as(sqlx::query_as::<_, ScanTypeCount>(&query))
            .fetch_all(pool)
            .await
    }

    /// Latest scan time of a user, valid or not.
    pub async fn last_scan_at(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Timestamp>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<Timestamp>>(
            "SELECT MAX(scanned_at) FROM qr_code_scans WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}

/// Translate a [`ScanScope`] into a dynamic `WHERE` clause.
fn build_scan_filter(scope: &ScanScope) -> Filter {
    let mut filter = Filter::new();
    if let Some(company_id) = scope.company_id {
        filter.push("u.company_id = {}", BindValue::BigInt(company_id));
    }
    if let Some(project_id) = scope.project_id {
        filter.push("s.project_id = {}", BindValue::BigInt(project_id));
    }
    if let Some(user_id) = scope.user_id {
        filter.push("s.user_id = {}", BindValue::BigInt(user_id));
    }
    if let Some(from) = scope.from {
        filter.push("s.scanned_at >= {}", BindValue::Timestamp(from));
    }
    if let Some(to) = scope.to {
        filter.push("s.scanned_at < {}", BindValue::Timestamp(to));
    }
    filter
}
