pub mod spec;
pub mod types;

pub use spec::*;
pub use types::*;
