pub mod common;
pub mod resource;
pub mod set;

pub use common::common_routes;
pub use resource::{crud_router, route_specs, Operation, RouteSpec};
pub use set::ResourceSet;
