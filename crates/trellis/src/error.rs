//! Error types for the row/column model.

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, RowColError>;

/// Errors returned by structural model operations.
///
/// A failed call commits no mutation: the sequence, counters, indices and
/// selection are exactly as they were before the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowColError {
    /// The operation would break the `[headers][fixed][normal]` ordering.
    #[error("structural constraint violation at position {position}: {violation}")]
    StructuralConstraintViolation {
        /// Which rule was broken.
        violation: Violation,
        /// Offending position: the item's place in the submitted batch for
        /// `add`, or its would-be place in the sequence otherwise.
        position: usize,
    },
}

impl RowColError {
    pub fn violation(violation: Violation, position: usize) -> Self {
        Self::StructuralConstraintViolation {
            violation,
            position,
        }
    }
}

/// The sequence rule an operation tried to break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    /// A fixed descriptor was added after an unfixed, non-header one.
    #[error("cannot add a fixed descriptor after an unfixed one")]
    FixedAfterUnfixed,
    /// A header would leave the header prefix.
    #[error("header descriptors must stay in the header prefix")]
    HeaderOutsidePrefix,
    /// A fixed descriptor would leave the block following the headers.
    #[error("fixed descriptors must stay contiguous with the header prefix")]
    FixedOutsideBlock,
    /// The descriptor already occupies a position in a sequence.
    #[error("descriptor is already part of a sequence")]
    AlreadyInSequence,
    /// The descriptor was created by a different model.
    #[error("descriptor belongs to another model")]
    ForeignDescriptor,
}
