//! Analysis module - spectrum extraction and acoustic signature matching

mod matcher;
mod patterns;
mod spectrum;

pub use matcher::*;
pub use patterns::*;
pub use spectrum::*;
