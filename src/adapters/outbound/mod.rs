pub mod buffered_logger;
pub mod console_logger;
pub mod effect_sinks;
pub mod file_logger;
pub mod in_memory_registry;
pub mod multi_logger;
pub mod noop_logger;

pub use buffered_logger::*;
pub use console_logger::*;
pub use effect_sinks::*;
pub use file_logger::*;
pub use in_memory_registry::*;
pub use multi_logger::*;
pub use noop_logger::*;
