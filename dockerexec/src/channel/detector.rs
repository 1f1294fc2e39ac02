//! Shell prompt detection on raw output chunks.
//!
//! A single compiled byte regex finds `user@host:path#` (or `$`) prompts,
//! optionally preceded by one of a configurable set of terminal escape
//! sequences. The escape sequence is kept verbatim in front of the
//! replacement so terminal state changes (window title, bracketed paste)
//! still reach the local terminal.

use std::borrow::Cow;
use std::ops::Range;

use regex::bytes::{Captures, Regex};

use crate::error::{PromptError, Result};

/// Prompt body shared by every detector: `user@host:path` followed by `#` or `$`.
///
/// `(?-u)` keeps the classes ASCII and lets `[^\s#$]` match arbitrary bytes,
/// so paths with invalid UTF-8 are still recognized.
const PROMPT_BODY: &str = r"(?P<user>\w+)@(?P<host>[\w.-]+):(?P<path>[^\s#$]+)[#$]";

/// A terminal escape sequence allowed directly in front of a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapePrefix {
    name: String,
    pattern: String,
}

impl EscapePrefix {
    /// Create a prefix from a byte-regex fragment.
    ///
    /// The fragment is compiled in ASCII mode and must not define the
    /// capture groups `prefix`, `prefix_<n>`, `user`, `host` or `path`.
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }

    /// OSC "set window title" sequence: `ESC ] ... BEL`.
    pub fn osc_title() -> Self {
        Self::new("osc-title", r"\x1b\][^\x07]*\x07")
    }

    /// Bracketed paste mode on: `ESC [ ? 2004 h`.
    pub fn bracketed_paste() -> Self {
        Self::new("bracketed-paste", r"\x1b\[\?2004h")
    }

    /// Clear screen: `ESC [ 2 J`.
    pub fn screen_clear() -> Self {
        Self::new("screen-clear", r"\x1b\[2J")
    }

    /// The prefixes recognized by default.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::osc_title(),
            Self::bracketed_paste(),
            Self::screen_clear(),
        ]
    }

    /// Short name, reported in trace logs when this prefix is matched.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The regex fragment.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// A prompt found in one chunk.
///
/// Borrowed from the chunk it was found in; it lives for a single
/// transformation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMatch<'a> {
    /// Escape sequence in front of the prompt, empty if there was none.
    pub prefix: &'a [u8],
    /// User name.
    pub user: &'a [u8],
    /// Host name. Matched but not rendered.
    pub host: &'a [u8],
    /// Working directory.
    pub path: &'a [u8],
    /// Byte range of the whole match, prefix and terminator included.
    pub span: Range<usize>,
    prefix_index: Option<usize>,
}

impl<'a> PromptMatch<'a> {
    fn from_captures(caps: &Captures<'a>, prefix_groups: &[String]) -> Self {
        let group = |name: &str| caps.name(name).map_or(&[][..], |m| m.as_bytes());
        let span = caps.get(0).map_or(0..0, |m| m.range());
        Self {
            prefix: group("prefix"),
            user: group("user"),
            host: group("host"),
            path: group("path"),
            span,
            prefix_index: prefix_groups.iter().position(|g| caps.name(g).is_some()),
        }
    }

    /// User name as text.
    pub fn user_str(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.user)
    }

    /// Working directory as text (lossy for non UTF-8 paths).
    pub fn path_str(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.path)
    }
}

/// Compiled prompt detector.
#[derive(Debug, Clone)]
pub struct PromptDetector {
    regex: Regex,
    prefixes: Vec<EscapePrefix>,
    prefix_groups: Vec<String>,
}

impl PromptDetector {
    /// Create a detector recognizing the default escape prefixes.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Start building a detector with a custom prefix set.
    pub fn builder() -> PromptDetectorBuilder {
        PromptDetectorBuilder::default()
    }

    /// The escape prefixes this detector recognizes.
    pub fn prefixes(&self) -> &[EscapePrefix] {
        &self.prefixes
    }

    /// The prefix that matched in front of `found`, if any.
    pub fn matched_prefix(&self, found: &PromptMatch<'_>) -> Option<&EscapePrefix> {
        found.prefix_index.and_then(|i| self.prefixes.get(i))
    }

    /// Find the leftmost prompt in `chunk`.
    pub fn find<'a>(&self, chunk: &'a [u8]) -> Option<PromptMatch<'a>> {
        if !might_contain_prompt(chunk) {
            return None;
        }
        self.regex
            .captures(chunk)
            .map(|caps| PromptMatch::from_captures(&caps, &self.prefix_groups))
    }

    /// Replace the first prompt in `chunk` with its prefix followed by
    /// the bytes produced by `render`.
    ///
    /// Returns the chunk untouched (borrowed) when no prompt is found.
    /// Later prompts in the same chunk are left as they are.
    pub fn rewrite<'a, F>(&self, chunk: &'a [u8], mut render: F) -> Cow<'a, [u8]>
    where
        F: FnMut(&PromptMatch<'_>) -> Vec<u8>,
    {
        if !might_contain_prompt(chunk) {
            return Cow::Borrowed(chunk);
        }
        // A closure replacer never expands `$name` references, so a `$`
        // inside the rendered prompt is written as is.
        self.regex.replacen(chunk, 1, |caps: &Captures<'_>| {
            let found = PromptMatch::from_captures(caps, &self.prefix_groups);
            let rendered = render(&found);
            let mut replacement = Vec::with_capacity(found.prefix.len() + rendered.len());
            replacement.extend_from_slice(found.prefix);
            replacement.extend_from_slice(&rendered);
            replacement
        })
    }
}

/// Every prompt contains an `@`; skip the regex for chunks without one.
fn might_contain_prompt(chunk: &[u8]) -> bool {
    memchr::memchr(b'@', chunk).is_some()
}

/// Builder for [`PromptDetector`].
#[derive(Debug, Clone)]
pub struct PromptDetectorBuilder {
    prefixes: Vec<EscapePrefix>,
}

impl Default for PromptDetectorBuilder {
    fn default() -> Self {
        Self {
            prefixes: EscapePrefix::defaults(),
        }
    }
}

impl PromptDetectorBuilder {
    /// Recognize an additional escape prefix.
    pub fn prefix(mut self, prefix: EscapePrefix) -> Self {
        self.prefixes.push(prefix);
        self
    }

    /// Drop all prefixes, including the defaults.
    pub fn without_prefixes(mut self) -> Self {
        self.prefixes.clear();
        self
    }

    /// Compile the detector.
    pub fn build(self) -> Result<PromptDetector> {
        for prefix in &self.prefixes {
            Regex::new(&format!("(?-u){}", prefix.pattern)).map_err(PromptError::InvalidPattern)?;
        }

        let prefix_groups: Vec<String> = (0..self.prefixes.len())
            .map(|i| format!("prefix_{}", i))
            .collect();

        let pattern = if self.prefixes.is_empty() {
            format!("(?-u){}", PROMPT_BODY)
        } else {
            let alternatives: Vec<String> = self
                .prefixes
                .iter()
                .zip(&prefix_groups)
                .map(|(p, group)| format!("(?P<{}>{})", group, p.pattern))
                .collect();
            format!("(?-u)(?P<prefix>{})?{}", alternatives.join("|"), PROMPT_BODY)
        };

        let regex = Regex::new(&pattern).map_err(PromptError::InvalidPattern)?;
        Ok(PromptDetector {
            regex,
            prefixes: self.prefixes,
            prefix_groups,
        })
    }
}
