//! `docker exec` transport.
//!
//! The container CLI runs inside a local pseudo-terminal so that it can
//! allocate a TTY in the container (`-t`). The PTY's blocking reader and
//! writer are pumped into async duplex pipes on blocking worker threads.

use std::io::{ErrorKind, Read, Write};

use log::{debug, warn};
use portable_pty::{CommandBuilder, PtySize, native_pty_system};
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream, duplex};
use tokio::runtime::Handle;

use super::config::ExecConfig;
use super::{ProcessHandle, RemoteSession, RemoteSessionProvider};
use crate::error::{Result, TransportError};

/// Capacity of each duplex pipe between the PTY workers and the relay.
const PIPE_CAPACITY: usize = 8192;

/// Size of a single PTY read.
const PTY_READ_SIZE: usize = 4096;

/// Runs a shell in a container through the docker CLI.
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Default, Clone)]
pub struct DockerExec;

impl DockerExec {
    /// Create the provider.
    pub fn new() -> Self {
        Self
    }
}

impl RemoteSessionProvider for DockerExec {
    type Input = DuplexStream;
    type Output = DuplexStream;

    fn open(&self, config: &ExecConfig) -> Result<RemoteSession<DuplexStream, DuplexStream>> {
        if config.container.is_empty() {
            return Err(TransportError::MissingContainer.into());
        }
        let runtime = Handle::try_current()
            .map_err(|e| TransportError::Io(std::io::Error::other(e)))?;

        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(PtySize {
                rows: config.terminal_height,
                cols: config.terminal_width,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| TransportError::Pty(e.to_string()))?;

        let mut cmd = CommandBuilder::new(&config.docker_binary);
        cmd.args(config.exec_args());
        cmd.env("TERM", "xterm-256color");

        debug!(
            "transport: spawning {} {}",
            config.docker_binary,
            config.exec_args().join(" ")
        );
        let mut child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| TransportError::Spawn {
                program: config.docker_binary.clone(),
                message: e.to_string(),
            })?;
        drop(pair.slave);

        let reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| TransportError::Pty(e.to_string()))?;
        let writer = pair
            .master
            .take_writer()
            .map_err(|e| TransportError::Pty(e.to_string()))?;
        let killer = child.clone_killer();

        let (input, input_pump) = duplex(PIPE_CAPACITY);
        let (output, output_pump) = duplex(PIPE_CAPACITY);

        let handle = runtime.clone();
        runtime.spawn_blocking(move || pump_output(reader, output_pump, handle));
        let handle = runtime.clone();
        runtime.spawn_blocking(move || pump_input(input_pump, writer, handle));

        let master = pair.master;
        runtime.spawn_blocking(move || {
            match child.wait() {
                Ok(status) => debug!("transport: exec exited with code {}", status.exit_code()),
                Err(e) => warn!("transport: failed to wait for exec: {}", e),
            }
            drop(master);
        });

        Ok(RemoteSession::new(input, output).with_process(ProcessHandle::new(killer)))
    }
}

/// Copy PTY output into the relay's output pipe until either side closes.
fn pump_output(mut reader: Box<dyn Read + Send>, mut pipe: DuplexStream, runtime: Handle) {
    let mut buf = [0u8; PTY_READ_SIZE];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                if let Err(e) = runtime.block_on(pipe.write_all(&buf[..n])) {
                    debug!("transport: output pipe closed: {}", e);
                    break;
                }
            }
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            // Linux reports EIO once the child exits and the slave side closes.
            Err(e) => {
                debug!("transport: pty read ended: {}", e);
                break;
            }
        }
    }
}

/// Copy keystrokes from the relay's input pipe into the PTY.
fn pump_input(mut pipe: DuplexStream, mut writer: Box<dyn Write + Send>, runtime: Handle) {
    let mut buf = [0u8; PTY_READ_SIZE];
    loop {
        let n = match runtime.block_on(pipe.read(&mut buf)) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                debug!("transport: input pipe failed: {}", e);
                break;
            }
        };
        if let Err(e) = writer.write_all(&buf[..n]).and_then(|()| writer.flush()) {
            debug!("transport: pty write failed: {}", e);
            break;
        }
    }
    debug!("transport: remote input closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn test_missing_container() {
        let result = DockerExec::new().open(&ExecConfig::new(""));
        assert!(matches!(
            result,
            Err(Error::Transport(TransportError::MissingContainer))
        ));
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let config = ExecConfig::new("abc").docker_binary("/nonexistent/dockerexec-test-binary");
        let result = DockerExec::new().open(&config);
        assert!(matches!(
            result,
            Err(Error::Transport(TransportError::Spawn { .. }))
                | Err(Error::Transport(TransportError::Pty(_)))
        ));
    }

    #[test]
    fn test_requires_runtime() {
        let result = DockerExec::new().open(&ExecConfig::new("abc"));
        assert!(matches!(result, Err(Error::Transport(TransportError::Io(_)))));
    }
}
