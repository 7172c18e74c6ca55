//! REST API module.
//!
//! Contains all API handlers following the admin frontend contract. Data
//! endpoints return their payloads as raw JSON (the frontend consumes the
//! snapshot and the version list directly); errors use the envelope from
//! [`crate::errors`].

mod content;
mod session;

pub use content::*;
pub use session::*;
