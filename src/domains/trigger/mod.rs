pub mod effects;
pub mod kinds;

pub use effects::*;
pub use kinds::*;
