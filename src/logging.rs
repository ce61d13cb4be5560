// src/logging.rs

use crate::errors::{ParlanceError, ParlanceResult};
use flexi_logger::{FileSpec, Logger, LoggerHandle};
use log::info;
use std::path::PathBuf;

/// Details of one backend request, logged after every exchange.
#[derive(Debug)]
pub struct RequestLog {
    pub endpoint: String,
    pub request_summary: String,
    pub response_status: u16,
    pub response_time_ms: u128,
}

/// Starts the file logger. The returned handle must stay alive for the
/// lifetime of the program.
pub fn init_logging(log_level: &str) -> ParlanceResult<LoggerHandle> {
    Logger::try_with_env_or_str(log_level)
        .map_err(|e| ParlanceError::config_error(format!("Invalid log level: {}", e)))?
        .log_to_file(
            FileSpec::default()
                .directory(log_directory())
                .basename("parlance"),
        )
        .start()
        .map_err(|e| ParlanceError::config_error(format!("Failed to start logger: {}", e)))
}

fn log_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("parlance")
        .join("logs")
}

pub fn log_request(entry: &RequestLog) {
    info!(
        "{} - {} - Status: {} - Time: {}ms",
        entry.endpoint, entry.request_summary, entry.response_status, entry.response_time_ms
    );
}
