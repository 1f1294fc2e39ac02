//! Builder for creating sessions.

use super::output::{CHUNK_SIZE, OutputTransformer};
use super::session::Session;
use crate::channel::{
    DEFAULT_SYMBOL, EscapePrefix, PromptDetector, PromptDetectorBuilder, PromptStyle, PromptTheme,
};
use crate::error::Result;
use crate::terminal::TerminalMode;

/// Builder for constructing sessions.
///
/// # Example
///
/// ```rust,no_run
/// use dockerexec::{CrosstermTerminal, SessionBuilder};
///
/// # fn example() -> Result<(), dockerexec::Error> {
/// let session = SessionBuilder::new()
///     .style("\\u@\\w:\\p")
///     .symbol("$")
///     .build(CrosstermTerminal::new())?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    style: PromptStyle,
    symbol: String,
    theme: PromptTheme,
    detector: PromptDetectorBuilder,
    chunk_size: usize,
}

impl SessionBuilder {
    /// Create a builder with the default style, symbol and escape prefixes.
    ///
    /// The theme defaults to [`PromptTheme::detect`].
    pub fn new() -> Self {
        Self {
            style: PromptStyle::default(),
            symbol: DEFAULT_SYMBOL.to_string(),
            theme: PromptTheme::detect(),
            detector: PromptDetector::builder(),
            chunk_size: CHUNK_SIZE,
        }
    }

    /// Set the prompt style template.
    pub fn style(mut self, style: impl Into<PromptStyle>) -> Self {
        self.style = style.into();
        self
    }

    /// Set the prompt symbol substituted for `\p`.
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    /// Set the colors used for the prompt fields.
    pub fn theme(mut self, theme: PromptTheme) -> Self {
        self.theme = theme;
        self
    }

    /// Recognize an additional escape sequence in front of prompts.
    pub fn escape_prefix(mut self, prefix: EscapePrefix) -> Self {
        self.detector = self.detector.prefix(prefix);
        self
    }

    /// Forget the default escape prefixes.
    pub fn without_default_prefixes(mut self) -> Self {
        self.detector = self.detector.without_prefixes();
        self
    }

    /// Set the output read size.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Build only the output side.
    pub fn build_transformer(self) -> Result<OutputTransformer> {
        let detector = self.detector.build()?;
        Ok(
            OutputTransformer::new(detector, self.style, self.symbol, self.theme)
                .with_chunk_size(self.chunk_size),
        )
    }

    /// Build the session.
    ///
    /// This compiles the prompt detector but touches neither the terminal
    /// nor the remote side. Call [`Session::run`] to start relaying.
    pub fn build<T: TerminalMode>(self, terminal: T) -> Result<Session<T>> {
        let transformer = self.build_transformer()?;
        Ok(Session::new(terminal, transformer))
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
