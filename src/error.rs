//! Unified error types for the decision core.
//!
//! A single `Error` enum that every module converts into, keeping the
//! orchestrator's error handling uniform. All variants are `Copy` so they
//! can be returned from the pure rule and fusion functions without
//! allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the core funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An ML confidence value was NaN or outside `[0, 1]`.
    InvalidConfidence,
    /// A reading field was non-finite or outside its physical range.
    InvalidReading(ReadingError),
    /// A device class tag did not name a known device class.
    UnknownDeviceClass,
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfidence => write!(f, "confidence must lie in [0, 1]"),
            Self::InvalidReading(e) => write!(f, "invalid reading: {e}"),
            Self::UnknownDeviceClass => write!(f, "unknown device class"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Reading errors
// ---------------------------------------------------------------------------

/// The reading field a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Temperature,
    Illumination,
    Humidity,
    PowerDraw,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temperature => write!(f, "temperature"),
            Self::Illumination => write!(f, "illumination"),
            Self::Humidity => write!(f, "humidity"),
            Self::PowerDraw => write!(f, "power draw"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingError {
    /// Value is NaN or infinite.
    NonFinite(Field),
    /// Value is outside the physically plausible range.
    OutOfRange(Field),
}

impl fmt::Display for ReadingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite(field) => write!(f, "{field} is not a finite number"),
            Self::OutOfRange(field) => write!(f, "{field} out of range"),
        }
    }
}

impl From<ReadingError> for Error {
    fn from(e: ReadingError) -> Self {
        Self::InvalidReading(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
