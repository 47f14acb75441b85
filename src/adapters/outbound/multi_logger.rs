use crate::domains::logger::DomainLogger;
use std::sync::Arc;

/// Forwards every message to a primary logger and an optional secondary one.
pub struct MultiLogger {
    primary: Arc<dyn DomainLogger>,
    secondary: Option<Arc<dyn DomainLogger>>,
}

impl MultiLogger {
    pub fn new(primary: Arc<dyn DomainLogger>, secondary: Option<Arc<dyn DomainLogger>>) -> Self {
        Self { primary, secondary }
    }
}

impl DomainLogger for MultiLogger {
    fn info(&self, msg: &str) {
        self.primary.info(msg);
        if let Some(sec) = &self.secondary {
            sec.info(msg);
        }
    }

    fn warn(&self, msg: &str) {
        self.primary.warn(msg);
        if let Some(sec) = &self.secondary {
            sec.warn(msg);
        }
    }

    fn error(&self, msg: &str) {
        self.primary.error(msg);
        if let Some(sec) = &self.secondary {
            sec.error(msg);
        }
    }
}

/// File plus console output when a log file is configured, console only otherwise
/// (or when fast_log cannot be initialized).
pub fn init_simulation_logger(file: Option<&str>, level: log::LevelFilter) -> Arc<dyn DomainLogger> {
    let console = crate::adapters::outbound::init_console_logger();
    let Some(path) = file else {
        return console;
    };
    match crate::adapters::outbound::file_logger::init_file_logger(path, level) {
        Ok(file_logger) => Arc::new(MultiLogger::new(file_logger, Some(console))),
        Err(e) => {
            console.warn(&format!("{}; falling back to console logging", e));
            console
        }
    }
}
