//! Application services.
//!
//! Each service wraps the port traits from `domains` and carries the
//! use-case rules: input validation, the ownership gate, and the staff gate.
//! Handlers call services; services call ports. Authorization lives here so
//! a new handler cannot accidentally bypass it.

pub mod accounts;
pub mod admin;
pub mod articles;
pub mod categories;
pub mod comments;
pub mod pages;

mod validate;

pub use accounts::{AccountService, ProfileUpdate, RegisterAccount};
pub use admin::AdminService;
pub use articles::{ArticleService, ArticleFields};
pub use categories::CategoryService;
pub use comments::CommentService;
pub use pages::{ContactMessage, ContactService};

use domains::{Account, AppError, Result};

/// Staff gate for back-office operations.
pub(crate) fn require_staff(acting: &Account) -> Result<()> {
    if acting.is_staff {
        Ok(())
    } else {
        Err(AppError::Forbidden("staff access required".into()))
    }
}
