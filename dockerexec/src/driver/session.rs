//! Session controller.
//!
//! Runs the two relay directions for one interactive session:
//!
//! ```text
//! local input  --forward_input-->     remote input
//! remote output --OutputTransformer--> local output
//! ```
//!
//! The session ends when the remote output reaches end of stream (the
//! remote shell exited) or when either direction fails. Local input has no
//! natural end, so the input side is simply dropped once output is done.

use std::fmt;

use log::debug;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::oneshot;

use super::input::forward_input;
use super::output::OutputTransformer;
use crate::error::{RelayError, Result};
use crate::terminal::{RawModeGuard, TerminalMode};

/// Lifecycle of a session, logged at debug level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Configuration parsed, remote session being opened.
    Initializing,
    /// Switching the local terminal to raw mode.
    RawMode,
    /// Both directions running.
    Relaying,
    /// Putting the previous terminal mode back.
    Restoring,
    /// Done.
    Terminated,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Initializing => "initializing",
            SessionState::RawMode => "raw-mode",
            SessionState::Relaying => "relaying",
            SessionState::Restoring => "restoring",
            SessionState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

fn enter(state: SessionState) {
    debug!("session: {}", state);
}

/// One interactive session.
///
/// Built by [`SessionBuilder`](super::SessionBuilder); consumed by
/// [`run`](Self::run).
pub struct Session<T: TerminalMode> {
    terminal: T,
    transformer: OutputTransformer,
}

impl<T: TerminalMode> Session<T> {
    /// Create a session from its parts.
    pub fn new(terminal: T, transformer: OutputTransformer) -> Self {
        enter(SessionState::Initializing);
        Self {
            terminal,
            transformer,
        }
    }

    /// Run the session to completion.
    ///
    /// Raw mode is held for the whole relay and released on every path out
    /// of this function. `remote_in` is shut down once the relay is over,
    /// whichever direction ended it.
    ///
    /// The first error wins: a relay failure is reported even if restoring
    /// the terminal also fails.
    pub async fn run<LI, LO, RI, RO>(
        self,
        local_in: LI,
        local_out: LO,
        remote_in: RI,
        remote_out: RO,
    ) -> Result<()>
    where
        LI: AsyncRead + Unpin,
        LO: AsyncWrite + Unpin + Send + 'static,
        RI: AsyncWrite + Unpin,
        RO: AsyncRead + Unpin + Send + 'static,
    {
        let Self {
            mut terminal,
            transformer,
        } = self;

        enter(SessionState::RawMode);
        let guard = RawModeGuard::acquire(&mut terminal)?;

        enter(SessionState::Relaying);
        let relayed = relay(transformer, local_in, local_out, remote_in, remote_out).await;

        enter(SessionState::Restoring);
        let restored = guard.restore();

        enter(SessionState::Terminated);
        relayed?;
        restored?;
        Ok(())
    }
}

async fn relay<LI, LO, RI, RO>(
    transformer: OutputTransformer,
    mut local_in: LI,
    mut local_out: LO,
    mut remote_in: RI,
    mut remote_out: RO,
) -> Result<()>
where
    LI: AsyncRead + Unpin,
    LO: AsyncWrite + Unpin + Send + 'static,
    RI: AsyncWrite + Unpin,
    RO: AsyncRead + Unpin + Send + 'static,
{
    let (done_tx, done_rx) = oneshot::channel();
    let output = tokio::spawn(async move {
        let result = transformer.run(&mut remote_out, &mut local_out).await;
        let _ = done_tx.send(result);
    });

    let outcome = tokio::select! {
        biased;

        done = done_rx => match done {
            Ok(result) => result,
            Err(_) => Err(RelayError::OutputTaskFailed {
                message: "output task stopped without reporting".to_string(),
            }
            .into()),
        },
        err = forward_input(&mut local_in, &mut remote_in) => {
            debug!("session: input side stopped: {}", err);
            output.abort();
            Err(err.into())
        }
    };

    if let Err(e) = remote_in.shutdown().await {
        debug!("session: closing remote input: {}", e);
    }
    drop(remote_in);

    outcome
}
