//! Outcome of one decode or encode step.

use thiserror::Error;

/// Why a step stopped.
///
/// `Underflow` and `Overflow` are flow-control signals: supply more input, or
/// more room for output. `Malformed` and `Unmappable` name the length of the
/// offending run of source units, which begins at the source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoderResult {
    /// All input was consumed, or more is needed to make progress.
    Underflow,
    /// The destination is full.
    Overflow,
    /// The input is not valid in the source encoding.
    Malformed(usize),
    /// The input is valid but has no representation in the target encoding.
    Unmappable(usize),
}

impl CoderResult {
    /// Construct a `Malformed` result.
    ///
    /// # Panics
    ///
    /// Panics if `length` is zero.
    pub fn malformed_for_length(length: usize) -> Self {
        assert!(length > 0, "malformed run length must be positive");
        CoderResult::Malformed(length)
    }

    /// Construct an `Unmappable` result.
    ///
    /// # Panics
    ///
    /// Panics if `length` is zero.
    pub fn unmappable_for_length(length: usize) -> Self {
        assert!(length > 0, "unmappable run length must be positive");
        CoderResult::Unmappable(length)
    }

    pub fn is_underflow(self) -> bool {
        self == CoderResult::Underflow
    }

    pub fn is_overflow(self) -> bool {
        self == CoderResult::Overflow
    }

    /// Whether this is `Malformed` or `Unmappable`.
    pub fn is_error(self) -> bool {
        matches!(self, CoderResult::Malformed(_) | CoderResult::Unmappable(_))
    }

    pub fn is_malformed(self) -> bool {
        matches!(self, CoderResult::Malformed(_))
    }

    pub fn is_unmappable(self) -> bool {
        matches!(self, CoderResult::Unmappable(_))
    }

    /// The length of the offending run. Flow-control results have none.
    pub fn length(self) -> Option<usize> {
        match self {
            CoderResult::Malformed(n) | CoderResult::Unmappable(n) => Some(n),
            CoderResult::Underflow | CoderResult::Overflow => None,
        }
    }

    /// The error this result stands for, if it is one.
    pub fn into_error(self) -> Option<CharacterCodingError> {
        match self {
            CoderResult::Malformed(n) => Some(CharacterCodingError::MalformedInput(n)),
            CoderResult::Unmappable(n) => Some(CharacterCodingError::UnmappableCharacter(n)),
            CoderResult::Underflow | CoderResult::Overflow => None,
        }
    }

    /// Pass flow-control results through, and raise errors.
    pub fn check(self) -> Result<Self, CharacterCodingError> {
        match self.into_error() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}

/// A checked character coding error.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterCodingError {
    /// Input not valid in the source encoding.
    #[error("Malformed input of length {0}.")]
    MalformedInput(usize),
    /// Input with no representation in the target encoding.
    #[error("Unmappable character of length {0}.")]
    UnmappableCharacter(usize),
}

impl CharacterCodingError {
    /// The length of the offending run.
    pub fn length(self) -> usize {
        match self {
            CharacterCodingError::MalformedInput(n) | CharacterCodingError::UnmappableCharacter(n) => n,
        }
    }
}

impl From<CharacterCodingError> for CoderResult {
    fn from(err: CharacterCodingError) -> Self {
        match err {
            CharacterCodingError::MalformedInput(n) => CoderResult::Malformed(n),
            CharacterCodingError::UnmappableCharacter(n) => CoderResult::Unmappable(n),
        }
    }
}

