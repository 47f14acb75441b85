pub mod aggregate;
pub mod ports;

pub use aggregate::*;
pub use ports::*;
