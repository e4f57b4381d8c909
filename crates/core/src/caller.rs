//! The authenticated caller, passed explicitly into every service call.

use crate::error::CoreError;
use crate::status::UserRole;
use crate::types::DbId;

/// Identity and visibility scope of the user making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerContext {
    pub user_id: DbId,
    pub role: UserRole,
    pub company_id: Option<DbId>,
}

impl CallerContext {
    pub fn new(user_id: DbId, role: UserRole, company_id: Option<DbId>) -> Self {
        Self {
            user_id,
            role,
            company_id,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Resolve the company filter a query must apply for this caller.
    ///
    /// Admins get exactly what they asked for (`None` means every company).
    /// Everyone else is pinned to their own company; asking for another one,
    /// or having no company at all, is forbidden.
    pub fn scope_company(&self, requested: Option<DbId>) -> Result<Option<DbId>, CoreError> {
        if self.is_admin() {
            return Ok(requested);
        }
        let own = self.company_id.ok_or_else(|| {
            CoreError::Forbidden("No company is assigned to this account".into())
        })?;
        match requested {
            Some(other) if other != own => Err(CoreError::Forbidden(
                "Access to another company's data is not allowed".into(),
            )),
            _ => Ok(Some(own)),
        }
    }

    /// Fail unless the caller may see rows belonging to `company_id`.
    pub fn ensure_company_visible(&self, company_id: Option<DbId>) -> Result<(), CoreError> {
        if self.is_admin() {
            return Ok(());
        }
        match (self.company_id, company_id) {
            (Some(own), Some(target)) if own == target => Ok(()),
            _ => Err(CoreError::Forbidden(
                "Access to another company's data is not allowed".into(),
            )),
        }
    }

    /// Fail unless the caller is an admin.
    pub fn require_admin(&self) -> Result<(), CoreError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(CoreError::Forbidden("Admin role required".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn admin() -> CallerContext {
        CallerContext::new(1, UserRole::Admin, Some(10))
    }

    fn site_staff(company: Option<DbId>) -> CallerContext {
        CallerContext::new(2, UserRole::SiteStaff, company)
    }

    #[test]
    fn admin_without_filter_sees_all_companies() {
        assert_eq!(admin().scope_company(None).unwrap(), None);
    }

    #[test]
    fn admin_filter_is_honoured() {
        assert_eq!(admin().scope_company(Some(77)).unwrap(), Some(77));
    }

    #[test]
    fn non_admin_is_pinned_to_own_company_without_filter() {
        assert_eq!(site_staff(Some(5)).scope_company(None).unwrap(), Some(5));
    }

    #[test]
    fn non_admin_may_name_own_company() {
        assert_eq!(site_staff(Some(5)).scope_company(Some(5)).unwrap(), Some(5));
    }

    #[test]
    fn non_admin_cannot_name_another_company() {
        assert_matches!(
            site_staff(Some(5)).scope_company(Some(6)),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn non_admin_without_company_is_forbidden() {
        assert_matches!(
            site_staff(None).scope_company(None),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn visibility_check() {
        assert!(admin().ensure_company_visible(Some(99)).is_ok());
        assert!(site_staff(Some(5)).ensure_company_visible(Some(5)).is_ok());
        assert!(site_staff(Some(5)).ensure_company_visible(Some(6)).is_err());
        assert!(site_staff(Some(5)).ensure_company_visible(None).is_err());
    }
}
