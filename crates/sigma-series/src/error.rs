//! Error taxonomy shared by every sigma crate.

use thiserror::Error;

/// Coarse classification of a [`SeriesError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong argument type or shape.
    Type,
    /// Right type, invalid value.
    Value,
    /// Division by the additive identity.
    ZeroDivision,
    /// Well-typed but mathematically undefined.
    Arithmetic,
    /// Exponent or encoding exceeds the representable range.
    Overflow,
}

/// Errors raised by series construction, arithmetic and persistence.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SeriesError {
    /// Operands or archives of incompatible types.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// An argument has an acceptable type but an invalid value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Division by zero.
    #[error("division by zero: {0}")]
    ZeroDivision(String),

    /// The operation has no result in the current representation.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// An exponent or packed code left its representable range.
    #[error("overflow: {0}")]
    Overflow(String),
}

impl SeriesError {
    /// Builds a [`SeriesError::TypeMismatch`].
    pub fn type_mismatch(msg: impl Into<String>) -> Self {
        Self::TypeMismatch(msg.into())
    }

    /// Builds a [`SeriesError::InvalidArgument`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Builds a [`SeriesError::ZeroDivision`].
    pub fn zero_division(msg: impl Into<String>) -> Self {
        Self::ZeroDivision(msg.into())
    }

    /// Builds a [`SeriesError::Arithmetic`].
    pub fn arithmetic(msg: impl Into<String>) -> Self {
        Self::Arithmetic(msg.into())
    }

    /// Builds a [`SeriesError::Overflow`].
    pub fn overflow(msg: impl Into<String>) -> Self {
        Self::Overflow(msg.into())
    }

    /// Returns the kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TypeMismatch(_) => ErrorKind::Type,
            Self::InvalidArgument(_) => ErrorKind::Value,
            Self::ZeroDivision(_) => ErrorKind::ZeroDivision,
            Self::Arithmetic(_) => ErrorKind::Arithmetic,
            Self::Overflow(_) => ErrorKind::Overflow,
        }
    }

    /// Returns the message without the kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::TypeMismatch(m)
            | Self::InvalidArgument(m)
            | Self::ZeroDivision(m)
            | Self::Arithmetic(m)
            | Self::Overflow(m) => m,
        }
    }
}

/// Result alias used throughout sigma.
pub type Result<T> = std::result::Result<T, SeriesError>;
