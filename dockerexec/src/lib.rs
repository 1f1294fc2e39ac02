//! # dockerexec
//!
//! Interactive shell sessions inside containers, with a restyled prompt.
//!
//! dockerexec attaches the local terminal to a shell started with
//! `docker exec` and rewrites the shell's `user@host:path#` prompt into a
//! configurable, colored template while passing every other byte through
//! untouched.
//!
//! ## Features
//!
//! - Async relay on tokio: keystrokes go out one byte at a time, output
//!   comes back in bounded chunks
//! - Byte-regex prompt detection that keeps terminal escape prefixes
//!   (window title, bracketed paste, screen clear) intact
//! - Prompt templates with `\u`, `\w` and `\p` placeholders
//! - Raw mode restored on every exit path
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dockerexec::{CrosstermTerminal, DockerExec, ExecConfig, RemoteSessionProvider, SessionBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), dockerexec::Error> {
//!     let config = ExecConfig::new("4ac0a1a3eb6c").user("root");
//!     let (remote_in, remote_out, _process) = DockerExec::new().open(&config)?.into_parts();
//!
//!     SessionBuilder::new()
//!         .style("\\u@\\w:\\p ")
//!         .symbol("$")
//!         .build(CrosstermTerminal::new())?
//!         .run(tokio::io::stdin(), tokio::io::stdout(), remote_in, remote_out)
//!         .await
//! }
//! ```

pub mod channel;
pub mod driver;
pub mod error;
pub mod terminal;
pub mod transport;

// Re-export main types for convenience
pub use channel::{EscapePrefix, PromptDetector, PromptMatch, PromptStyle, PromptTheme};
pub use driver::{OutputTransformer, Session, SessionBuilder, forward_input};
pub use error::Error;
pub use terminal::{CrosstermTerminal, RawModeGuard, TerminalMode};
pub use transport::{DockerExec, ExecConfig, RemoteSession, RemoteSessionProvider};
