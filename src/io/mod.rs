//! Input helpers.
//!
//! - CSV decoding with encoding fallback (`decode`)
//! - product schema validation (`schema`)

pub mod decode;
pub mod schema;

pub use decode::*;
pub use schema::*;
