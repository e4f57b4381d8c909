//! Personnel validation rules.

use crate::error::CoreError;

/// Minimum password length for personnel accounts.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum length of a first or last name.
pub const MAX_NAME_LEN: usize = 64;

/// Maximum length of an email address.
pub const MAX_EMAIL_LEN: usize = 256;

/// Columns the personnel list may be sorted by.
pub const SORTABLE_COLUMNS: &[&str] = &["first_name", "last_name", "email", "hire_date"];

/// Default personnel sort column.
pub const DEFAULT_SORT_COLUMN: &str = "first_name";

/// "First Last", trimmed.
pub fn full_name(first: &str, last: &str) -> String {
    format!("{} {}", first.trim(), last.trim()).trim().to_string()
}

/// Lowercase and trim an email so uniqueness checks are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Structural email check: one `@`, non-empty local part, dotted domain.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    let email = email.trim();
    let invalid = || CoreError::Validation(format!("'{email}' is not a valid email address"));

    if email.is_empty() {
        return Err(CoreError::Validation("Email is required".into()));
    }
    if email.len() > MAX_EMAIL_LEN || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let valid_domain = domain.contains('.') && domain.split('.').all(|label| !label.is_empty());
    if !valid_domain {
        return Err(invalid());
    }
    Ok(())
}

pub fn validate_person_name(label: &str, value: &str) -> Result<(), CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{label} is required")));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "{label} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn accepts_ordinary_addresses() {
        assert!(validate_email("site.lead@builder.example.com").is_ok());
        assert!(validate_email("a@b.co").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["", "plain", "@x.com", "a@", "a@b", "a@@b.com", "a b@c.com", "a@b..com"] {
            assert_matches!(validate_email(bad), Err(CoreError::Validation(_)), "{bad}");
        }
    }

    #[test]
    fn normalizes_email_case() {
        assert_eq!(normalize_email("  Foo@Bar.COM "), "foo@bar.com");
    }

    #[test]
    fn full_name_trims() {
        assert_eq!(full_name(" Ada ", "Lovelace"), "Ada Lovelace");
        assert_eq!(full_name("Ada", ""), "Ada");
    }

    #[test]
    fn names_are_required() {
        assert!(validate_person_name("First name", "Ada").is_ok());
        assert_matches!(
            validate_person_name("First name", " "),
            Err(CoreError::Validation(msg)) if msg.contains("First name")
        );
    }
}
