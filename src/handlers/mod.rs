//! HTTP handlers generated per resource.

pub mod resource;
pub use resource::*;
