//! Remote session transport.
//!
//! A provider turns an [`ExecConfig`] into a pair of byte streams connected
//! to an interactive, PTY-backed shell: an input sink the relay writes
//! keystrokes to and an output source it reads terminal output from.

pub mod config;
mod docker;

use log::debug;
use portable_pty::ChildKiller;
use tokio::io::{AsyncRead, AsyncWrite};

pub use config::ExecConfig;
pub use docker::DockerExec;

use crate::error::Result;

/// Opens interactive remote sessions.
pub trait RemoteSessionProvider {
    /// Stream the relay writes keystrokes to.
    type Input: AsyncWrite + Unpin + Send + 'static;

    /// Stream the relay reads terminal output from.
    type Output: AsyncRead + Unpin + Send + 'static;

    /// Start the remote shell.
    ///
    /// Shutting down the returned input must signal end of input to the
    /// remote side without closing the output.
    fn open(&self, config: &ExecConfig) -> Result<RemoteSession<Self::Input, Self::Output>>;
}

/// An open remote session.
pub struct RemoteSession<I, O> {
    /// Input sink.
    pub input: I,
    /// Output source.
    pub output: O,
    process: Option<ProcessHandle>,
}

impl<I, O> RemoteSession<I, O> {
    /// Wrap a pair of streams with no process attached.
    pub fn new(input: I, output: O) -> Self {
        Self {
            input,
            output,
            process: None,
        }
    }

    pub(crate) fn with_process(mut self, process: ProcessHandle) -> Self {
        self.process = Some(process);
        self
    }

    /// Split into input, output and the process handle.
    ///
    /// Keep the handle alive for as long as the session runs; dropping it
    /// kills the local process backing the session.
    pub fn into_parts(self) -> (I, O, Option<ProcessHandle>) {
        (self.input, self.output, self.process)
    }
}

/// Kills the process backing a session when dropped.
pub struct ProcessHandle {
    killer: Box<dyn ChildKiller + Send + Sync>,
}

impl ProcessHandle {
    pub(crate) fn new(killer: Box<dyn ChildKiller + Send + Sync>) -> Self {
        Self { killer }
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        // Already gone once the remote shell has exited.
        if let Err(e) = self.killer.kill() {
            debug!("transport: kill on drop: {}", e);
        }
    }
}
