pub mod controller;
pub mod events;
pub mod projections;

pub use controller::*;
pub use events::*;
pub use projections::*;
