//! Prompt style templates.
//!
//! A template is plain text with three placeholders:
//!
//! - `\u` - the user name
//! - `\w` - the working directory
//! - `\p` - the prompt symbol
//!
//! Everything else, including other backslash sequences such as the two
//! characters `\r`, is copied to the output unchanged.

use super::theme::PromptTheme;

/// Default prompt style.
pub const DEFAULT_STYLE: &str = "👨 \\u ~> 📂\\w\r\n\\p";

/// Default prompt symbol.
pub const DEFAULT_SYMBOL: &str = ">";

/// A parsed-once, immutable prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptStyle {
    template: String,
}

impl PromptStyle {
    /// Create a style from a template string.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Create a style from text typed by a user, turning the two-character
    /// sequences `\n`, `\r` and `\t` into the control characters they name.
    ///
    /// Placeholders and any other backslash sequence are left alone.
    pub fn unescaped(text: &str) -> Self {
        Self::new(
            text.replace("\\n", "\n")
                .replace("\\r", "\r")
                .replace("\\t", "\t"),
        )
    }

    /// The raw template.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Render the template for one prompt.
    ///
    /// Substitution is a single pass over the template, so placeholder
    /// text that appears inside a substituted value is never expanded.
    /// `user` and `path` are the bytes captured from the shell's output and
    /// are copied verbatim, valid UTF-8 or not.
    pub fn render(&self, user: &[u8], path: &[u8], symbol: &str, theme: &PromptTheme) -> Vec<u8> {
        let mut out =
            Vec::with_capacity(self.template.len() + user.len() + path.len() + symbol.len());
        let mut rest = self.template.as_bytes();

        while let Some(pos) = memchr::memchr(b'\\', rest) {
            out.extend_from_slice(&rest[..pos]);
            let after = &rest[pos + 1..];
            let style_and_value = match after.first() {
                Some(b'u') => Some((theme.user, user)),
                Some(b'w') => Some((theme.path, path)),
                Some(b'p') => Some((theme.symbol, symbol.as_bytes())),
                _ => None,
            };
            match style_and_value {
                Some((style, value)) => {
                    theme.paint(style, value, &mut out);
                    rest = &after[1..];
                }
                None => {
                    out.push(b'\\');
                    rest = after;
                }
            }
        }

        out.extend_from_slice(rest);
        out
    }
}

impl Default for PromptStyle {
    fn default() -> Self {
        Self::new(DEFAULT_STYLE)
    }
}

impl From<&str> for PromptStyle {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

impl From<String> for PromptStyle {
    fn from(template: String) -> Self {
        Self::new(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> PromptTheme {
        PromptTheme::plain()
    }

    fn render(style: &str, user: &str, path: &str, symbol: &str, theme: &PromptTheme) -> String {
        let out = PromptStyle::new(style).render(user.as_bytes(), path.as_bytes(), symbol, theme);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_default_style() {
        let out = render(DEFAULT_STYLE, "root", "/srv", ">", &plain());
        assert_eq!(out, "👨 root ~> 📂/srv\r\n>");
    }

    #[test]
    fn test_custom_style() {
        let out = render("\\u@\\w:\\p", "root", "/", "$", &plain());
        assert_eq!(out, "root@/:$");
    }

    #[test]
    fn test_unknown_escapes_are_literal() {
        let out = render("\\u@\\w:\\p\\r\\t", "root", "/", "$", &plain());
        assert_eq!(out, "root@/:$\\r\\t");
    }

    #[test]
    fn test_trailing_backslash() {
        let out = render("\\p\\", "root", "/", "#", &plain());
        assert_eq!(out, "#\\");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let out = render("\\u|\\w|\\p", "\\w", "\\p", "\\u", &plain());
        assert_eq!(out, "\\w|\\p|\\u");
    }

    #[test]
    fn test_repeated_placeholders() {
        let out = render("\\u \\u", "app", "/", "$", &plain());
        assert_eq!(out, "app app");
    }

    #[test]
    fn test_render_is_pure() {
        let style = PromptStyle::default();
        let theme = PromptTheme::colored();
        let first = style.render(b"root", b"/home", ">", &theme);
        let second = style.render(b"root", b"/home", ">", &theme);
        assert_eq!(first, second);
    }

    #[test]
    fn test_colored_render_styles_each_field() {
        let theme = PromptTheme::colored();
        let out = render("\\u:\\w\\p", "root", "/", ">", &theme);
        let mut expected = Vec::new();
        theme.paint(theme.user, b"root", &mut expected);
        expected.push(b':');
        theme.paint(theme.path, b"/", &mut expected);
        theme.paint(theme.symbol, b">", &mut expected);
        assert_eq!(out.as_bytes(), &expected[..]);
        assert_ne!(out, "root:/>");
    }

    #[test]
    fn test_unescaped() {
        let style = PromptStyle::unescaped("\\u\\r\\n\\t\\p");
        assert_eq!(style.template(), "\\u\r\n\t\\p");
        assert_eq!(PromptStyle::unescaped("\\w").template(), "\\w");
        assert_eq!(
            PromptStyle::unescaped("👨 \\u ~> 📂\\w\\r\\n\\p"),
            PromptStyle::default()
        );
    }

    #[test]
    fn test_raw_path_bytes_are_kept() {
        let out = PromptStyle::new("\\w\\p").render(b"root", b"/tmp/\xff", "#", &plain());
        assert_eq!(out, b"/tmp/\xff#");
    }
}
