//! Pagination, sorting and free-text search helpers shared by list queries.

use crate::error::CoreError;

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_SIZE: i64 = 20;
/// Upper bound on any requested page size.
pub const MAX_PAGE_SIZE: i64 = 100;
/// Default page size for task lists, which are usually shown in full.
pub const DEFAULT_TASK_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided limit to `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Build an `ILIKE` pattern matching `term` anywhere in a column.
///
/// Returns `None` for blank input. `%`, `_` and `\` are escaped so user
/// input is matched literally.
pub fn like_pattern(term: Option<&str>) -> Option<String> {
    let term = term?.trim();
    if term.is_empty() {
        return None;
    }
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    Some(escaped)
}

/// Sort direction for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Parse a sort expression such as `"last_name desc"` against a whitelist.
///
/// Returns the whitelisted column and direction. Unknown columns are a
/// validation error so raw input never reaches SQL.
pub fn parse_sorting(
    sorting: Option<&str>,
    allowed: &[&'static str],
    default_column: &'static str,
) -> Result<(&'static str, SortDirection), CoreError> {
    let Some(raw) = sorting.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok((default_column, SortDirection::Asc));
    };

    let mut parts = raw.split_whitespace();
    let field = parts.next().unwrap_or_default().to_ascii_lowercase();
    let direction = match parts.next().map(str::to_ascii_lowercase).as_deref() {
        None | Some("asc") => SortDirection::Asc,
        Some("desc") => SortDirection::Desc,
        Some(other) => {
            return Err(CoreError::Validation(format!(
                "Unknown sort direction '{other}'"
            )))
        }
    };

    let normalized = field.replace('_', "");
    allowed
        .iter()
        .find(|col| col.replace('_', "") == normalized)
        .map(|col| (*col, direction))
        .ok_or_else(|| CoreError::Validation(format!("Cannot sort by '{field}'")))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn clamp_limit_uses_default_when_none() {
        assert_eq!(clamp_limit(None, 20, 100), 20);
    }

    #[test]
    fn clamp_limit_respects_max() {
        assert_eq!(clamp_limit(Some(200), 20, 100), 100);
    }

    #[test]
    fn clamp_limit_floors_at_one() {
        assert_eq!(clamp_limit(Some(-5), 20, 100), 1);
        assert_eq!(clamp_limit(Some(0), 20, 100), 1);
    }

    #[test]
    fn clamp_offset_floors_at_zero() {
        assert_eq!(clamp_offset(Some(-3)), 0);
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(40)), 40);
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(Some(" ali ")).as_deref(), Some("%ali%"));
        assert_eq!(like_pattern(Some("50%_off")).as_deref(), Some("%50\\%\\_off%"));
        assert_eq!(like_pattern(Some("   ")), None);
        assert_eq!(like_pattern(None), None);
    }

    #[test]
    fn sorting_accepts_camel_and_snake_case() {
        let allowed = ["first_name", "last_name"];
        assert_eq!(
            parse_sorting(Some("lastname desc"), &allowed, "first_name").unwrap(),
            ("last_name", SortDirection::Desc)
        );
        assert_eq!(
            parse_sorting(Some("first_name"), &allowed, "first_name").unwrap(),
            ("first_name", SortDirection::Asc)
        );
        assert_eq!(
            parse_sorting(None, &allowed, "first_name").unwrap(),
            ("first_name", SortDirection::Asc)
        );
    }

    #[test]
    fn sorting_rejects_unknown_columns() {
        assert_matches!(
            parse_sorting(Some("password_hash"), &["first_name"], "first_name"),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            parse_sorting(Some("first_name sideways"), &["first_name"], "first_name"),
            Err(CoreError::Validation(_))
        );
    }
}
