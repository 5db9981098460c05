pub mod resource;
pub mod settings;
pub mod validator;

pub use resource::*;
pub use settings::*;
pub use validator::*;
