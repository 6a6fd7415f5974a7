//! Domain layer for Inkwell.
//!
//! Pure data: entity models, the error taxonomy, and the port traits the
//! adapter crates implement. Nothing in here touches a socket or a disk.

pub mod error;
pub mod models;
pub mod ports;

pub use error::{AppError, FieldError, Result, ValidationErrors};
pub use models::*;
pub use ports::*;
