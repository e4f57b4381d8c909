//! Enumerations backed by SMALLINT lookup tables.
//!
//! Each variant's discriminant matches the seed rows of the corresponding
//! lookup table in the migrations. The display label of every variant lives
//! next to its id so the mapping is a single data table, not scattered
//! `match` arms.

use crate::error::CoreError;

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Every variant, in id order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// Return the database id.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Resolve a database id, `None` for ids outside the seed data.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some(Self::$variant), )+
                    _ => None,
                }
            }

            /// Human-readable display name.
            pub fn label(self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl TryFrom<StatusId> for $name {
            type Error = CoreError;

            fn try_from(id: StatusId) -> Result<Self, Self::Error> {
                Self::from_id(id).ok_or_else(|| {
                    CoreError::Validation(format!(
                        "Unknown {} id: {id}",
                        stringify!($name)
                    ))
                })
            }
        }
    };
}

define_status_enum! {
    /// Personnel role. Admin is the only cross-company role.
    UserRole {
        Admin = 1 => "Admin",
        OfficeStaff = 2 => "Office Staff",
        SiteStaff = 3 => "Site Staff",
        Subcontractor = 4 => "Subcontractor",
    }
}

impl UserRole {
    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }
}

define_status_enum! {
    /// Project lifecycle status.
    ProjectStatus {
        Planning = 1 => "Planning",
        Active = 2 => "Active",
        OnHold = 3 => "On Hold",
        Completed = 4 => "Completed",
        Cancelled = 5 => "Cancelled",
        Delayed = 6 => "Delayed",
    }
}

define_status_enum! {
    /// Kind of event recorded in the activity log.
    ActivityType {
        UserLogin = 1 => "User Login",
        UserLogout = 2 => "User Logout",
        ProjectCreated = 3 => "Project Created",
        ProjectUpdated = 4 => "Project Updated",
        ProjectCompleted = 5 => "Project Completed",
        QrCodeScanned = 6 => "QR Code Scanned",
        ReportGenerated = 7 => "Report Generated",
        MaterialAdded = 8 => "Material Added",
        MaterialUsed = 9 => "Material Used",
        PersonnelAssigned = 10 => "Personnel Assigned",
        PersonnelRemoved = 11 => "Personnel Removed",
        Other = 99 => "Other",
    }
}

define_status_enum! {
    /// Activity log priority. Ordered, so `>= High` comparisons work.
    ActivityPriority {
        Low = 1 => "Low",
        Normal = 2 => "Normal",
        High = 3 => "High",
        Critical = 4 => "Critical",
    }
}

define_status_enum! {
    /// Kind of QR code scan.
    ScanType {
        CheckIn = 1 => "Check In",
        CheckOut = 2 => "Check Out",
        MaterialScan = 3 => "Material Scan",
        LocationScan = 4 => "Location Scan",
        EquipmentScan = 5 => "Equipment Scan",
        Other = 99 => "Other",
    }
}

define_status_enum! {
    /// Project task workflow status.
    TaskStatus {
        Todo = 1 => "To Do",
        InProgress = 2 => "In Progress",
        Completed = 3 => "Completed",
        Cancelled = 4 => "Cancelled",
    }
}

define_status_enum! {
    /// Project task priority.
    TaskPriority {
        Low = 1 => "Low",
        Medium = 2 => "Medium",
        High = 3 => "High",
        Critical = 4 => "Critical",
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn ids_round_trip_for_every_variant() {
        for status in ProjectStatus::ALL {
            assert_eq!(ProjectStatus::from_id(status.id()), Some(*status));
        }
        for kind in ActivityType::ALL {
            assert_eq!(ActivityType::from_id(kind.id()), Some(*kind));
        }
    }

    #[test]
    fn other_variants_use_sparse_id() {
        assert_eq!(ScanType::Other.id(), 99);
        assert_eq!(ActivityType::Other.id(), 99);
        assert_eq!(ScanType::from_id(6), None);
    }

    #[test]
    fn unknown_id_is_a_validation_error() {
        assert_matches!(TaskStatus::try_from(42), Err(CoreError::Validation(_)));
    }

    #[test]
    fn priority_ordering_follows_ids() {
        assert!(ActivityPriority::Critical > ActivityPriority::High);
        assert!(ActivityPriority::Normal < ActivityPriority::High);
    }

    #[test]
    fn only_admin_is_admin() {
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::OfficeStaff.is_admin());
        assert!(!UserRole::Subcontractor.is_admin());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&ScanType::CheckIn).unwrap();
        assert_eq!(json, "\"check_in\"");
    }
}
