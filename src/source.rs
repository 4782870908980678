//! The encoder: holds the original message and emits an endless stream of coded packets.
use ark_ec::CurveGroup;
use ark_ff::PrimeField;
use ark_std::rand::{CryptoRng, RngCore};
use tracing::{debug, info};

use crate::{
    algebra, codec,
    commitment::{self, Commitment},
    committer::Committer,
    error::RlncError,
    packet::Packet,
};

/// A node that holds the full message.
///
/// The message is split into $n$ chunks of $m$ elements each, all committed once and for all when
/// the node is built. Every call to [`SourceNode::chunk_to_send`] then draws a fresh random
/// coding vector and sends the matching combination of the chunks.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceNode<F: PrimeField, G: CurveGroup<ScalarField = F>> {
    committer: Committer<F, G>,
    chunks: Vec<Vec<F>>,
    commitments: Vec<Commitment<F, G>>,
}

impl<F: PrimeField, G: CurveGroup<ScalarField = F>> SourceNode<F, G> {
    /// Splits `message` into `num_chunks` chunks and commits them.
    ///
    /// # Errors
    /// [`RlncError::SizeMismatch`] when the size of the message is not a positive multiple of
    /// `num_chunks` or when its chunks do not fit exactly in the chunks of the `committer`.
    pub fn new(
        committer: Committer<F, G>,
        message: &[u8],
        num_chunks: usize,
    ) -> Result<Self, RlncError> {
        let chunks = codec::split_message(message, num_chunks)?;

        let nb_elements = codec::nb_elements::<F>(chunks[0].len());
        if nb_elements != committer.nb_elements() {
            return Err(RlncError::SizeMismatch(format!(
                "chunks of {} bytes need {} elements, committer expects {}",
                chunks[0].len(),
                nb_elements,
                committer.nb_elements()
            )));
        }

        info!(
            "encoding {} bytes into {} chunks of {} elements",
            message.len(),
            num_chunks,
            nb_elements
        );
        let chunks: Vec<Vec<F>> = chunks.into_iter().map(codec::encode_chunk).collect();

        debug!("committing {} chunks", chunks.len());
        let commitments = chunks
            .iter()
            .map(|c| committer.commit(c))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            committer,
            chunks,
            commitments,
        })
    }

    /// Builds a new coded packet with a fresh random coding vector.
    ///
    /// `rng` should be a cryptographically secure source of randomness: predictable coefficients
    /// would allow an attacker to anticipate which packets are redundant.
    pub fn chunk_to_send<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Packet<F, G> {
        let coding_vector = algebra::random_vector(self.num_chunks(), rng);
        let payload = algebra::linear_combination(&coding_vector, &self.chunks);

        Packet::new(coding_vector, payload, self.commitments.clone())
    }

    /// Builds the packet of a given coding vector.
    ///
    /// # Errors
    /// [`RlncError::SizeMismatch`] when the coding vector does not have one element per chunk.
    pub fn chunk_with_coding_vector(&self, coding_vector: &[F]) -> Result<Packet<F, G>, RlncError> {
        if coding_vector.len() != self.num_chunks() {
            return Err(RlncError::SizeMismatch(format!(
                "expected a coding vector of {} elements, found {}",
                self.num_chunks(),
                coding_vector.len()
            )));
        }

        let payload = algebra::linear_combination(coding_vector, &self.chunks);
        Ok(Packet::new(
            coding_vector.to_vec(),
            payload,
            self.commitments.clone(),
        ))
    }

    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    pub fn committer(&self) -> &Committer<F, G> {
        &self.committer
    }

    pub fn commitments(&self) -> &[Commitment<F, G>] {
        &self.commitments
    }

    /// See [`commitment::commitments_hash`].
    pub fn commitments_hash(&self) -> Result<[u8; 32], RlncError> {
        commitment::commitments_hash(&self.commitments)
    }
}
