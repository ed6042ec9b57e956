//! Error types for ttk-core.
//!
//! Validation failures are developer-facing contract violations, so every
//! message names the offending field and the accepted range or type.

use thiserror::Error;

/// Result alias used across the toolkit.
pub type Result<T, E = TtkError> = std::result::Result<T, E>;

/// Top-level error returned by renderer operations.
#[derive(Debug, Error)]
pub enum TtkError {
    /// An argument violated the Renderer contract.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A command mapping could not be parsed.
    #[error("invalid command: {0}")]
    Command(#[from] CommandError),

    /// IO error from the display substrate.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The display resource could not be acquired.
    #[error("failed to initialize backend: {0}")]
    Init(String),

    /// An operation needed a live display but `initialize()` has not succeeded.
    #[error("backend is not initialized")]
    NotInitialized,
}

/// Argument validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Pair 0 holds the substrate defaults and cannot be redefined.
    #[error("color pair 0 is reserved for default colors; pair_id must be in 1..=255")]
    ColorPairReserved,

    /// `pair_id` passed to `init_color_pair` outside 1..=255.
    #[error("pair_id must be in 1..=255, got {value}")]
    PairIdOutOfRange {
        /// Rejected value.
        value: i64,
    },

    /// `color_pair` passed to a drawing operation outside 0..=255.
    #[error("color_pair must be in 0..=255, got {value}")]
    ColorPairOutOfRange {
        /// Rejected value.
        value: i64,
    },

    /// One channel of an RGB triple outside 0..=255.
    #[error("{field}[{index}] must be in 0..=255, got {value}")]
    RgbComponentOutOfRange {
        /// Field carrying the triple (`fg_color`, `bg_color`, ...).
        field: &'static str,
        /// Channel index (0 = red).
        index: usize,
        /// Rejected value.
        value: i64,
    },

    /// A length, height or width below zero.
    #[error("{field} must be >= 0, got {value}")]
    NegativeDimension {
        /// Parameter name.
        field: &'static str,
        /// Rejected value.
        value: i64,
    },
}

/// Failure to turn a serialized mapping back into a [`Command`](crate::Command).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Input was not a JSON object.
    #[error("expected a command mapping, got {found}")]
    NotAnObject {
        /// JSON type that was found instead.
        found: &'static str,
    },

    /// The `command_type` discriminator is absent.
    #[error("missing required field 'command_type'")]
    MissingCommandType,

    /// The discriminator names no known command.
    #[error("unknown command_type: {0}")]
    UnknownCommandType(String),

    /// Required parameters absent for this command type.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// A parameter is present with the wrong JSON type.
    #[error("field '{field}' must be {expected}, got {found}")]
    WrongType {
        /// Parameter name.
        field: &'static str,
        /// Expected type.
        expected: &'static str,
        /// Type that was found.
        found: &'static str,
    },

    /// An RGB-like field that is not a 3-element array.
    #[error("{field} must be a 3-element array, got {len} element(s)")]
    RgbLength {
        /// Parameter name.
        field: &'static str,
        /// Observed length (0 when the value is not an array at all).
        len: usize,
    },

    /// An RGB-like field containing a non-integer element.
    #[error("{field} elements must be integers (element {index} is not)")]
    RgbElement {
        /// Parameter name.
        field: &'static str,
        /// Offending element.
        index: usize,
    },

    /// Well-typed value outside the accepted range.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// Text input was not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(String),
}

impl From<serde_json::Error> for CommandError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
