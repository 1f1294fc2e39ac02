//! Channel layer: prompt detection and prompt restyling.
//!
//! This module works on individual output chunks. It finds shell prompts
//! in raw terminal bytes and renders their replacement.

mod detector;
mod template;
mod theme;

pub use detector::{EscapePrefix, PromptDetector, PromptDetectorBuilder, PromptMatch};
pub use template::{DEFAULT_STYLE, DEFAULT_SYMBOL, PromptStyle};
pub use theme::PromptTheme;
