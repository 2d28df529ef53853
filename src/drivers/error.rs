use std::time::Duration;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("max_samples must be greater than zero")]
    InvalidCapacity,
    #[error("window width must be a positive finite number of seconds, got {0}")]
    InvalidWindow(f64),
    #[error("{name} must be greater than zero")]
    ZeroInterval { name: &'static str },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Config(#[from] serde_json::Error),
    #[error("failed to open serial port: {0}")]
    Serial(#[from] serialport::Error),
    #[error("reader thread did not stop within {waited:?}")]
    JoinTimeout { waited: Duration },
    #[error("reader thread panicked")]
    ReaderPanicked,
}
