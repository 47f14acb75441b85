pub mod json_commands;
pub mod line_reader;

pub use json_commands::*;
pub use line_reader::*;
