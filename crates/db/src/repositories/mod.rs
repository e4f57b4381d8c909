//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Reads
//! take `&PgPool`; writes that may run inside a "mutate + audit"
//! transaction take any `PgExecutor`, so callers pass either the pool or
//! `&mut *tx`.

mod filter;

pub mod activity_log_repo;
pub mod company_repo;
pub mod project_repo;
pub mod qr_scan_repo;
pub mod session_repo;
pub mod task_comment_repo;
pub mod task_photo_repo;
pub mod task_repo;
pub mod user_project_repo;
pub mod user_repo;

pub use activity_log_repo::ActivityLogRepo;
pub use company_repo::CompanyRepo;
pub use project_repo::ProjectRepo;
pub use qr_scan_repo::QrScanRepo;
pub use session_repo::SessionRepo;
pub use task_comment_repo::TaskCommentRepo;
pub use task_photo_repo::TaskPhotoRepo;
pub use task_repo::TaskRepo;
pub use user_project_repo::UserProjectRepo;
pub use user_repo::UserRepo;
