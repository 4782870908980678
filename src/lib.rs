//! RLNC: verifiable Random Linear Network Coding
//!
//! A message is split into $n$ chunks of equal size, each packed into $m$ elements of a prime
//! field $\mathbb{F}_p$ with [`codec`]. Each chunk is then committed with a homomorphic
//! commitment, see [`commitment`], against a basis that anyone can derive.
//!
//! A [`source::SourceNode`] sends random linear combinations of the chunks, together with their
//! coding vectors and the commitments of all the chunks. Because the commitment is linear, a
//! [`destination::DestinationNode`] can check any coded packet before using it, without knowing
//! anything about the message, and keeps only the packets that bring new information. Once it has
//! received $n$ of them, it can decode the message.
//!
//! # Example
//! ```
//! use ark_ed25519::{EdwardsProjective, Fr};
//! use ark_std::rand::{rngs::StdRng, SeedableRng};
//! use rlnc::{committer::Committer, destination::DestinationNode, source::SourceNode, RlncError};
//!
//! let rng = &mut StdRng::seed_from_u64(0);
//! let message = b"a message of exactly sixty-four bytes, split into four chunks!!!";
//!
//! let committer = Committer::<Fr, EdwardsProjective>::for_message(message.len(), 4).unwrap();
//! let source = SourceNode::new(committer.clone(), message, 4).unwrap();
//! let mut destination = DestinationNode::new(committer, message.len(), 4).unwrap();
//!
//! while !destination.is_full() {
//!     let bytes = source.chunk_to_send(rng).to_bytes().unwrap();
//!     match destination.receive_bytes(&bytes) {
//!         Ok(()) | Err(RlncError::LinearlyDependentChunk) => {}
//!         Err(e) => panic!("{e}"),
//!     }
//! }
//!
//! assert_eq!(destination.decode().unwrap(), message);
//! ```
use ark_serialize::{Compress, Validate};

pub mod algebra;
pub mod codec;
pub mod commitment;
pub mod committer;
pub mod destination;
pub mod error;
pub mod packet;
pub mod source;

pub use error::RlncError;

/// Curve points are always serialized in compressed form.
pub const COMPRESS: Compress = Compress::Yes;
/// Deserialized curve points are always checked to be in the prime order subgroup.
pub const VALIDATE: Validate = Validate::Yes;
