pub mod agent;
pub mod logger;
pub mod motion;
pub mod trigger;
pub mod waypoint;

pub use agent::*;
pub use logger::*;
pub use motion::*;
pub use trigger::*;
pub use waypoint::*;
