use crate::domains::logger::DomainLogger;
use std::sync::Arc;

/// Discards everything. Default logger for unit tests and headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl DomainLogger for NoopLogger {
    fn info(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
}

pub fn init_noop_logger() -> Arc<dyn DomainLogger> {
    Arc::new(NoopLogger)
}
