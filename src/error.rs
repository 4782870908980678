//! RLNC-specific errors
//!
//! There are a few geometry errors, raised when building committers and sources, and most of the
//! others are raised by [`crate::destination::DestinationNode::receive`].
use thiserror::Error;

/// An error that the coding engine could end up producing.
///
/// There are a few families of errors:
/// - related to the _geometry_ of the message, i.e. its size, the number of chunks and the number
///   of field elements per chunk
/// - related to _receiving_ coded packets
/// - related to _decoding_ the message
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RlncError {
    /// `{0}` explains which part of the geometry is inconsistent.
    #[error("Size mismatch: {0}")]
    SizeMismatch(String),
    /// `{0}` is the reason why the bytes or the packet could not be understood.
    #[error("Invalid message: {0}")]
    InvalidMessage(String),
    #[error("Expected {expected} commitments, found {found}")]
    ChunkCountMismatch { expected: usize, found: usize },
    #[error("Commitments do not match the ones of the current message")]
    CommitmentsMismatch,
    #[error("Coded chunk is not a linear combination of the committed chunks")]
    VerificationFailed,
    #[error("Coded chunk is linearly dependent on the chunks already received")]
    LinearlyDependentChunk,
    #[error("Not enough chunks to decode, rank is {rank} out of {num_chunks}")]
    NotReady { rank: usize, num_chunks: usize },
    /// `{0}` is the error reported by the serializer.
    #[error("Serialization error: {0}")]
    Serialization(String),
}
