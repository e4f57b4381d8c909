//! QR code scan model and DTOs.

use serde::Serialize;
use sitetrack_core::aggregation::ScanFact;
use sitetrack_core::presence::PresenceScan;
use sitetrack_core::status::{ScanType, StatusId};
use sitetrack_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `qr_code_scans` table joined with user and project names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QrCodeScan {
    pub id: DbId,
    pub qr_code_data: String,
    pub user_id: DbId,
    pub project_id: Option<DbId>,
    pub scanned_at: Timestamp,
    pub location: Option<String>,
    pub scan_type_id: StatusId,
    pub notes: Option<String>,
    pub is_valid: bool,
    pub additional_data: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: Timestamp,
    pub user_name: Option<String>,
    pub project_name: Option<String>,
}

/// DTO for recording a scan.
#[derive(Debug, Clone)]
pub struct CreateQrCodeScan {
    pub qr_code_data: String,
    pub user_id: DbId,
    pub project_id: Option<DbId>,
    pub scanned_at: Timestamp,
    pub location: Option<String>,
    pub scan_type: ScanType,
    pub notes: Option<String>,
    pub additional_data: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// The minimal projection of a valid scan used by presence and aggregation.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct ScanFactRow {
    pub user_id: DbId,
    pub project_id: Option<DbId>,
    pub scanned_at: Timestamp,
    pub scan_type_id: StatusId,
}

impl ScanFactRow {
    fn scan_type(&self) -> ScanType {
        ScanType::from_id(self.scan_type_id).unwrap_or(ScanType::Other)
    }
}

impl From<ScanFactRow> for ScanFact {
    fn from(row: ScanFactRow) -> Self {
        Self {
            user_id: row.user_id,
            project_id: row.project_id,
            scanned_at: row.scanned_at,
            scan_type: row.scan_type(),
        }
    }
}

impl From<ScanFactRow> for PresenceScan {
    fn from(row: ScanFactRow) -> Self {
        Self {
            scanned_at: row.scanned_at,
            scan_type: row.scan_type(),
            project_id: row.project_id,
        }
    }
}

/// Scope for scan fact queries. All fields narrow the result.
#[derive(Debug, Clone, Default)]
pub struct ScanScope {
    pub company_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub user_id: Option<DbId>,
    /// Inclusive lower bound.
    pub from: Option<Timestamp>,
    /// Exclusive upper bound.
    pub to: Option<Timestamp>,
}

/// Count of scans of one type.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScanTypeCount {
    pub scan_type_id: StatusId,
    pub count: i64,
}
