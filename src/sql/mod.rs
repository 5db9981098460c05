//! Safe SQL builder: identifiers from the table description only, values as parameters.

mod builder;
pub mod params;
mod table;
pub use builder::*;
pub use params::*;
pub use table::{ColumnSpec, TableSpec};
