pub mod error;
pub mod event;
pub mod fields;

pub use error::*;
pub use event::*;
pub use fields::FieldScope;
