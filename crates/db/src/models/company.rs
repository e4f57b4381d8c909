//! Company entity model and DTOs.

use serde::{Deserialize, Serialize};
use sitetrack_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `companies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Company {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub tax_number: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a company.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCompany {
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub tax_number: Option<String>,
}

/// DTO for updating a company. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCompany {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub tax_number: Option<String>,
}
