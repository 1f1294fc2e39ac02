//! Error types for dockerexec.

use std::io;
use thiserror::Error;

/// Main error type for dockerexec operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Remote session setup errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Local terminal mode errors
    #[error("Terminal error: {0}")]
    Terminal(#[from] TerminalError),

    /// Errors while relaying bytes in either direction
    #[error("Relay error: {0}")]
    Relay(#[from] RelayError),

    /// Prompt detection errors
    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),
}

/// Remote session setup errors (PTY allocation, docker CLI spawn).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to allocate a pseudo-terminal
    #[error("Failed to open PTY: {0}")]
    Pty(String),

    /// Failed to start the exec command
    #[error("Failed to spawn '{program}': {message}")]
    Spawn { program: String, message: String },

    /// No container identifier was configured
    #[error("A container id is required")]
    MissingContainer,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Local terminal mode errors.
#[derive(Error, Debug)]
pub enum TerminalError {
    /// Failed to switch the local terminal into raw mode
    #[error("Failed to enable raw mode: {0}")]
    RawMode(#[source] io::Error),

    /// Failed to restore the previous terminal mode
    #[error("Failed to restore terminal mode: {0}")]
    Restore(#[source] io::Error),
}

/// Errors raised by the two relay directions.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Reading local input failed (including end of input)
    #[error("Failed to read local input: {0}")]
    InputRead(#[source] io::Error),

    /// Writing to the remote input failed
    #[error("Failed to write remote input: {0}")]
    InputWrite(#[source] io::Error),

    /// Reading remote output failed
    #[error("Failed to read remote output: {0}")]
    OutputRead(#[source] io::Error),

    /// Writing to the local output failed
    #[error("Failed to write local output: {0}")]
    OutputWrite(#[source] io::Error),

    /// The output task ended without reporting a result
    #[error("Output task failed: {message}")]
    OutputTaskFailed { message: String },
}

/// Prompt detector construction errors.
#[derive(Error, Debug)]
pub enum PromptError {
    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Result type alias using dockerexec's Error.
pub type Result<T> = std::result::Result<T, Error>;
