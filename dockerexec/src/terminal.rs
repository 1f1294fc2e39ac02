//! Local terminal mode handling.
//!
//! The session puts the local terminal into raw mode so every keystroke is
//! forwarded as typed. [`RawModeGuard`] puts the previous mode back when it
//! goes out of scope, including on early returns and unwinding panics.

use std::io;

use crossterm::terminal;
use log::{debug, warn};

use crate::error::TerminalError;

/// Switches a terminal into raw mode and back.
pub trait TerminalMode {
    /// Whatever is needed to restore the mode that was active before.
    type Mode;

    /// Enable raw mode, returning the previous mode.
    fn acquire_raw_mode(&mut self) -> io::Result<Self::Mode>;

    /// Restore a mode returned by [`acquire_raw_mode`](Self::acquire_raw_mode).
    ///
    /// Called from `Drop` during unwinding, so it must not panic.
    fn restore_mode(&mut self, previous: Self::Mode) -> io::Result<()>;
}

/// Mode saved by [`CrosstermTerminal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedMode {
    /// Raw mode was already on before the session started.
    pub was_raw: bool,
}

/// Terminal mode handling for the process's controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermTerminal;

impl CrosstermTerminal {
    /// Create a handle to the controlling terminal.
    pub fn new() -> Self {
        Self
    }
}

impl TerminalMode for CrosstermTerminal {
    type Mode = SavedMode;

    fn acquire_raw_mode(&mut self) -> io::Result<SavedMode> {
        let was_raw = terminal::is_raw_mode_enabled()?;
        if !was_raw {
            terminal::enable_raw_mode()?;
        }
        Ok(SavedMode { was_raw })
    }

    fn restore_mode(&mut self, previous: SavedMode) -> io::Result<()> {
        if !previous.was_raw {
            terminal::disable_raw_mode()?;
        }
        Ok(())
    }
}

/// Holds raw mode for as long as it lives.
pub struct RawModeGuard<'a, T: TerminalMode> {
    terminal: &'a mut T,
    previous: Option<T::Mode>,
}

impl<'a, T: TerminalMode> RawModeGuard<'a, T> {
    /// Enable raw mode on `terminal`.
    pub fn acquire(terminal: &'a mut T) -> Result<Self, TerminalError> {
        let previous = terminal
            .acquire_raw_mode()
            .map_err(TerminalError::RawMode)?;
        debug!("terminal: raw mode enabled");
        Ok(Self {
            terminal,
            previous: Some(previous),
        })
    }

    /// Restore the previous mode now and report any failure.
    pub fn restore(mut self) -> Result<(), TerminalError> {
        match self.previous.take() {
            Some(previous) => {
                self.terminal
                    .restore_mode(previous)
                    .map_err(TerminalError::Restore)?;
                debug!("terminal: previous mode restored");
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl<T: TerminalMode> Drop for RawModeGuard<'_, T> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            if let Err(e) = self.terminal.restore_mode(previous) {
                warn!("terminal: failed to restore previous mode: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeTerminal {
        raw: bool,
        restores: usize,
        fail_acquire: bool,
    }

    impl TerminalMode for FakeTerminal {
        type Mode = bool;

        fn acquire_raw_mode(&mut self) -> io::Result<bool> {
            if self.fail_acquire {
                return Err(io::Error::new(io::ErrorKind::Unsupported, "not a tty"));
            }
            let previous = self.raw;
            self.raw = true;
            Ok(previous)
        }

        fn restore_mode(&mut self, previous: bool) -> io::Result<()> {
            self.raw = previous;
            self.restores += 1;
            Ok(())
        }
    }

    #[test]
    fn test_guard_restores_on_drop() {
        let mut terminal = FakeTerminal::default();
        {
            let _guard = RawModeGuard::acquire(&mut terminal).unwrap();
        }
        assert!(!terminal.raw);
        assert_eq!(terminal.restores, 1);
    }

    #[test]
    fn test_explicit_restore_runs_once() {
        let mut terminal = FakeTerminal::default();
        let guard = RawModeGuard::acquire(&mut terminal).unwrap();
        guard.restore().unwrap();
        assert_eq!(terminal.restores, 1);
    }

    #[test]
    fn test_keeps_raw_if_already_raw() {
        let mut terminal = FakeTerminal {
            raw: true,
            ..Default::default()
        };
        RawModeGuard::acquire(&mut terminal).unwrap().restore().unwrap();
        assert!(terminal.raw);
    }

    #[test]
    fn test_acquire_failure() {
        let mut terminal = FakeTerminal {
            fail_acquire: true,
            ..Default::default()
        };
        assert!(matches!(
            RawModeGuard::acquire(&mut terminal),
            Err(TerminalError::RawMode(_))
        ));
        assert_eq!(terminal.restores, 0);
    }
}
