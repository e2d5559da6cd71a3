pub mod types;
pub mod policy;

pub use types::*;
pub use policy::*;
