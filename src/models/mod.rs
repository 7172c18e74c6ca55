//! Data models shared between the API layer and the repository.

mod content;
mod version;

pub use content::*;
pub use version::*;
