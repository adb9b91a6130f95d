//! Derived views over the held snapshot.
//!
//! - monthly sales history per product (`history`)
//! - terminal formatting for the CLI (`format`)

pub mod format;
pub mod history;

pub use format::format_summary;
pub use history::reshape;
