//! Error types for ttk-terminal.

use thiserror::Error;
use ttk_core::TtkError;

/// Errors from the terminal substrate.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// IO error from terminal operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stdout is not attached to a terminal.
    #[error("Terminal not available")]
    TerminalNotAvailable,

    /// The terminal reported a zero-sized screen.
    #[error("terminal reported an empty screen ({cols}x{rows})")]
    EmptyScreen {
        /// Reported columns.
        cols: u16,
        /// Reported rows.
        rows: u16,
    },
}

impl From<TerminalError> for TtkError {
    fn from(err: TerminalError) -> Self {
        match err {
            TerminalError::Io(io) => Self::Io(io),
            other => Self::Init(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_error_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: TerminalError = io_err.into();
        assert!(matches!(err, TerminalError::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_io_maps_to_ttk_io() {
        let err = TerminalError::Io(std::io::Error::other("boom"));
        assert!(matches!(TtkError::from(err), TtkError::Io(_)));
    }

    #[test]
    fn test_other_maps_to_init() {
        let err: TtkError = TerminalError::TerminalNotAvailable.into();
        match err {
            TtkError::Init(msg) => assert!(msg.contains("not available")),
            other => panic!("unexpected {other:?}"),
        }
        let err: TtkError = TerminalError::EmptyScreen { cols: 0, rows: 0 }.into();
        assert!(err.to_string().contains("empty screen"));
    }
}
