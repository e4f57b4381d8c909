//! QR code payload validation and scan-list limits.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Shortest QR payload accepted as a real site code.
pub const MIN_QR_CODE_LEN: usize = 5;

/// Default number of scans returned by "recent scans".
pub const DEFAULT_RECENT_SCANS: i64 = 10;
/// Upper bound for "recent scans".
pub const MAX_RECENT_SCANS: i64 = 100;

/// Whether a payload looks like a usable QR code.
pub fn is_valid_qr_code(payload: &str) -> bool {
    let trimmed = payload.trim();
    !trimmed.is_empty() && trimmed.chars().count() >= MIN_QR_CODE_LEN
}

pub fn ensure_valid_qr_code(payload: &str) -> Result<(), CoreError> {
    if is_valid_qr_code(payload) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "QR code data must be at least {MIN_QR_CODE_LEN} characters"
        )))
    }
}

/// Latitude/longitude must both be present or both absent, and in range.
pub fn validate_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<(), CoreError> {
    match (latitude, longitude) {
        (None, None) => Ok(()),
        (Some(lat), Some(lon)) if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) => {
            Ok(())
        }
        (Some(_), Some(_)) => Err(CoreError::Validation("Coordinates are out of range".into())),
        _ => Err(CoreError::Validation(
            "Latitude and longitude must be provided together".into(),
        )),
    }
}

/// A throwaway payload for exercising scanners in the field.
#[derive(Debug, Clone, Serialize)]
pub struct TestQrCode {
    /// JSON document to encode into the QR image.
    pub qr_code_data: String,
    /// The plain token embedded in `qr_code_data`.
    pub qr_code_text: String,
    pub project_id: Option<DbId>,
    pub project_name: String,
    pub location: String,
    pub generated_at: Timestamp,
}

/// Build a test QR payload. `nonce` keeps successive payloads distinct.
pub fn test_qr_code(project_id: Option<DbId>, nonce: &str, now: Timestamp) -> TestQrCode {
    let qr_code_text = format!("TEST_QR_CODE_{}_{nonce}", now.timestamp_millis());
    let project_name = "Test Project".to_string();
    let location = "Test Location".to_string();
    let qr_code_data = serde_json::json!({
        "type": "test",
        "project_id": project_id,
        "project_name": project_name,
        "location": location,
        "timestamp": now.to_rfc3339(),
        "data": qr_code_text,
    })
    .to_string();

    TestQrCode {
        qr_code_data,
        qr_code_text,
        project_id,
        project_name,
        location,
        generated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn qr_code_length_rule() {
        assert!(is_valid_qr_code("SITE-1"));
        assert!(is_valid_qr_code("12345"));
        assert!(!is_valid_qr_code("1234"));
        assert!(!is_valid_qr_code("   "));
        assert!(!is_valid_qr_code("  abc  "));
        assert!(ensure_valid_qr_code("").is_err());
    }

    #[test]
    fn coordinates_must_pair() {
        assert!(validate_coordinates(None, None).is_ok());
        assert!(validate_coordinates(Some(41.0), Some(29.0)).is_ok());
        assert!(validate_coordinates(Some(41.0), None).is_err());
        assert!(validate_coordinates(Some(91.0), Some(29.0)).is_err());
    }

    #[test]
    fn test_payload_is_valid_and_self_describing() {
        let now = Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap();
        let code = test_qr_code(Some(7), "ab12", now);
        assert!(is_valid_qr_code(&code.qr_code_data));
        let parsed: serde_json::Value = serde_json::from_str(&code.qr_code_data).unwrap();
        assert_eq!(parsed["type"], "test");
        assert_eq!(parsed["project_id"], 7);
        assert_eq!(parsed["data"], code.qr_code_text);
        assert!(code.qr_code_text.ends_with("_ab12"));
    }
}
