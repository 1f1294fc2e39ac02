//! Session driver.
//!
//! The driver layer wires the prompt rewriter, the keystroke forwarder and
//! the local terminal together into one interactive session.

mod builder;
mod input;
mod output;
mod session;

pub use builder::SessionBuilder;
pub use input::forward_input;
pub use output::{CHUNK_SIZE, OutputTransformer};
pub use session::{Session, SessionState};
