//! OpenAPI document loading and operation extraction.
mod build;
mod load;
mod types;

pub use build::*;
pub use load::*;
pub use types::*;
