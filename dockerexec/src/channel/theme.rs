//! Colors applied to the rendered prompt fields.

use std::io::IsTerminal;

use crossterm::Command;
use crossterm::style::{Attribute, Color, ContentStyle, SetAttribute, SetStyle};

/// Styles for the three prompt placeholders.
///
/// Passed to the template renderer explicitly; there is no global color
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTheme {
    /// Style for `\u`.
    pub user: ContentStyle,
    /// Style for `\w`.
    pub path: ContentStyle,
    /// Style for `\p`.
    pub symbol: ContentStyle,
    enabled: bool,
}

impl PromptTheme {
    /// Blue user, yellow path, bold green symbol.
    pub fn colored() -> Self {
        Self {
            user: foreground(Color::DarkBlue),
            path: foreground(Color::DarkYellow),
            symbol: ContentStyle {
                attributes: Attribute::Bold.into(),
                ..foreground(Color::DarkGreen)
            },
            enabled: true,
        }
    }

    /// No escape sequences at all.
    pub fn plain() -> Self {
        Self {
            user: ContentStyle::default(),
            path: ContentStyle::default(),
            symbol: ContentStyle::default(),
            enabled: false,
        }
    }

    /// Colored when stdout is a terminal and `NO_COLOR` is unset.
    pub fn detect() -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        if no_color || !std::io::stdout().is_terminal() {
            Self::plain()
        } else {
            Self::colored()
        }
    }

    /// Whether styles are emitted.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append `text` to `out`, wrapped in `style` when styling is enabled.
    ///
    /// `text` is copied byte for byte; it does not have to be UTF-8.
    pub(crate) fn paint(&self, style: ContentStyle, text: &[u8], out: &mut Vec<u8>) {
        if !self.enabled || style == ContentStyle::default() {
            out.extend_from_slice(text);
            return;
        }
        let mut codes = String::new();
        // Formatting into a String never fails.
        let _ = SetStyle(style).write_ansi(&mut codes);
        out.extend_from_slice(codes.as_bytes());
        out.extend_from_slice(text);
        codes.clear();
        let _ = SetAttribute(Attribute::Reset).write_ansi(&mut codes);
        out.extend_from_slice(codes.as_bytes());
    }
}

impl Default for PromptTheme {
    fn default() -> Self {
        Self::colored()
    }
}

fn foreground(color: Color) -> ContentStyle {
    ContentStyle {
        foreground_color: Some(color),
        ..ContentStyle::default()
    }
}
