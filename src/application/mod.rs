pub mod command_gateway;
pub mod tick_scheduler;

pub use command_gateway::*;
pub use tick_scheduler::*;
