use std::io;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("command execution failed: {0}")]
    Command(#[from] io::Error),

    #[error("cryptographic engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("engine exited with status {status}: {stderr}")]
    Engine { status: i32, stderr: String },

    #[error("engine is busy with another enumeration")]
    EngineBusy,

    #[error("invalid search pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("protocol violation: {0}")]
    ProtocolViolation(&'static str),

    #[error("failed to capture stdout from engine subprocess")]
    StdoutCaptureFailed,
}

pub type Result<T> = std::result::Result<T, Error>;
