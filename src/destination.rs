//! The decoder: collects verified packets until the message can be recovered.
use ark_ec::CurveGroup;
use ark_ff::PrimeField;
use ark_std::rand::{CryptoRng, RngCore};
use tracing::{debug, info, warn};

use crate::{
    algebra::{self, linalg::Echelon},
    codec,
    commitment::{self, Commitment},
    committer::Committer,
    error::RlncError,
    packet::Packet,
};

/// A node that receives coded packets and decodes the message.
///
/// Every packet is checked against the commitments of the message before being used, so a
/// [`DestinationNode`] never stores anything that is not a linear combination of the committed
/// chunks. Packets that do not bring new information are rejected as well, which means that the
/// node holds at most $n$ packets, always in reduced row-echelon form.
///
/// The reference commitments are either given up front, with [`DestinationNode::with_commitments`],
/// or adopted from the first packet that is accepted. The size of the message is never read from
/// packets: it is part of the configuration of the node, like the [`Committer`].
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationNode<F: PrimeField, G: CurveGroup<ScalarField = F>> {
    committer: Committer<F, G>,
    num_chunks: usize,
    chunk_size: usize,
    commitments: Option<Vec<Commitment<F, G>>>,
    echelon: Echelon<F>,
}

impl<F: PrimeField, G: CurveGroup<ScalarField = F>> DestinationNode<F, G> {
    /// Builds an empty node waiting for a message of `nb_bytes` bytes split into `num_chunks`
    /// chunks.
    ///
    /// # Errors
    /// [`RlncError::SizeMismatch`] when `nb_bytes` is not a positive multiple of `num_chunks` or
    /// when the chunks do not fit exactly in the chunks of the `committer`, see
    /// [`SourceNode::new`](crate::source::SourceNode::new).
    pub fn new(
        committer: Committer<F, G>,
        nb_bytes: usize,
        num_chunks: usize,
    ) -> Result<Self, RlncError> {
        let chunk_size = codec::chunk_size(nb_bytes, num_chunks)?;

        let nb_elements = codec::nb_elements::<F>(chunk_size);
        if nb_elements != committer.nb_elements() {
            return Err(RlncError::SizeMismatch(format!(
                "chunks of {} bytes need {} elements, committer expects {}",
                chunk_size,
                nb_elements,
                committer.nb_elements()
            )));
        }

        Ok(Self {
            committer,
            num_chunks,
            chunk_size,
            commitments: None,
            echelon: Echelon::new(num_chunks),
        })
    }

    /// Builds an empty node that only accepts packets of the message behind `commitments`.
    ///
    /// # Errors
    /// See [`Self::new`], with one chunk per commitment.
    pub fn with_commitments(
        committer: Committer<F, G>,
        nb_bytes: usize,
        commitments: Vec<Commitment<F, G>>,
    ) -> Result<Self, RlncError> {
        let mut node = Self::new(committer, nb_bytes, commitments.len())?;
        node.commitments = Some(commitments);
        Ok(node)
    }

    /// Parses a packet and receives it, see [`Packet::from_bytes`] and [`Self::receive`].
    pub fn receive_bytes(&mut self, bytes: &[u8]) -> Result<(), RlncError> {
        let packet = Packet::from_bytes(bytes)?;
        self.receive(&packet)
    }

    fn check_commitments(&self, packet: &Packet<F, G>) -> Result<(), RlncError> {
        match &self.commitments {
            Some(commitments) if commitments.as_slice() != packet.commitments() => {
                Err(RlncError::CommitmentsMismatch)
            }
            Some(_) => Ok(()),
            None if packet.commitments().len() != self.num_chunks => {
                Err(RlncError::ChunkCountMismatch {
                    expected: self.num_chunks,
                    found: packet.commitments().len(),
                })
            }
            None => Ok(()),
        }
    }

    fn check_shape(&self, packet: &Packet<F, G>) -> Result<(), RlncError> {
        if packet.coding_vector().len() != self.num_chunks {
            return Err(RlncError::InvalidMessage(format!(
                "expected a coding vector of {} elements, found {}",
                self.num_chunks,
                packet.coding_vector().len()
            )));
        }
        if packet.payload().len() != self.committer.nb_elements() {
            return Err(RlncError::InvalidMessage(format!(
                "expected a payload of {} elements, found {}",
                self.committer.nb_elements(),
                packet.payload().len()
            )));
        }

        Ok(())
    }

    /// Receives a coded packet.
    ///
    /// The packet goes through the following checks, in order:
    /// 1. its commitments should be the ones of the message being decoded, if any, or there should
    ///    be one per chunk
    /// 2. its coding vector and payload should have the sizes expected by the node
    /// 3. the commitment of its payload should be the combination of its commitments with its
    ///    coding vector
    /// 4. it should be linearly independent from the packets already received
    ///
    /// Only then is the packet added to the node, which is left untouched by any failure.
    ///
    /// # Errors
    /// - [`RlncError::CommitmentsMismatch`] when the packet belongs to another message
    /// - [`RlncError::ChunkCountMismatch`] when the first packet does not carry one commitment per
    ///   chunk
    /// - [`RlncError::InvalidMessage`] when the sizes of the packet are inconsistent with the node
    /// - [`RlncError::VerificationFailed`] when the payload does not match the commitments
    /// - [`RlncError::LinearlyDependentChunk`] when the packet is redundant, which is always the
    ///   case once the node [`Self::is_full`]
    pub fn receive(&mut self, packet: &Packet<F, G>) -> Result<(), RlncError> {
        self.check_commitments(packet)?;
        self.check_shape(packet)?;

        let claimed = self.committer.commit(packet.payload())?;
        if !commitment::verify_linear_combination(
            packet.coding_vector(),
            packet.commitments(),
            &claimed,
        ) {
            warn!("rejecting a packet that does not match its commitments");
            return Err(RlncError::VerificationFailed);
        }

        if !self
            .echelon
            .insert(packet.coding_vector(), packet.payload())?
        {
            return Err(RlncError::LinearlyDependentChunk);
        }

        if self.commitments.is_none() {
            self.commitments = Some(packet.commitments().to_vec());
        }

        debug!("rank is now {}/{}", self.rank(), self.num_chunks);
        if self.is_full() {
            info!("received enough packets to decode {} chunks", self.num_chunks);
        }

        Ok(())
    }

    pub fn is_full(&self) -> bool {
        self.echelon.is_full()
    }

    /// The number of linearly independent packets received so far.
    pub fn rank(&self) -> usize {
        self.echelon.rank()
    }

    pub fn num_chunks(&self) -> usize {
        self.num_chunks
    }

    /// The size of the message, in bytes.
    pub fn nb_bytes(&self) -> usize {
        self.chunk_size * self.num_chunks
    }

    pub fn committer(&self) -> &Committer<F, G> {
        &self.committer
    }

    /// The reference commitments, if they are known yet.
    pub fn commitments(&self) -> Option<&[Commitment<F, G>]> {
        self.commitments.as_deref()
    }

    /// See [`commitment::commitments_hash`], `None` when no commitments are known yet.
    pub fn commitments_hash(&self) -> Option<Result<[u8; 32], RlncError>> {
        self.commitments
            .as_ref()
            .map(|commitments| commitment::commitments_hash(commitments))
    }

    /// Recovers the original message.
    ///
    /// # Errors
    /// [`RlncError::NotReady`] when fewer than [`Self::num_chunks`] independent packets have been
    /// received.
    pub fn decode(&self) -> Result<Vec<u8>, RlncError> {
        if !self.is_full() {
            return Err(RlncError::NotReady {
                rank: self.rank(),
                num_chunks: self.num_chunks,
            });
        }

        let mut message = Vec::with_capacity(self.nb_bytes());
        for (_, payload) in self.echelon.rows() {
            message.extend(codec::decode_chunk(payload, self.chunk_size)?);
        }

        Ok(message)
    }

    /// Builds a new packet from the packets received so far, without decoding.
    ///
    /// The new coding vector is the combination of the coding vectors of the received packets
    /// with fresh random coefficients, and the same goes for the payload, so the packet verifies
    /// against the same commitments.
    ///
    /// Returns `None` as long as no packet has been received.
    pub fn recode<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Option<Packet<F, G>> {
        let commitments = match &self.commitments {
            Some(commitments) if !self.echelon.is_empty() => commitments,
            _ => return None,
        };

        let coefficients: Vec<F> = algebra::random_vector(self.rank(), rng);
        let (coding_vectors, payloads): (Vec<&[F]>, Vec<&[F]>) = self.echelon.rows().unzip();

        Some(Packet::new(
            algebra::linear_combination(&coefficients, &coding_vectors),
            algebra::linear_combination(&coefficients, &payloads),
            commitments.clone(),
        ))
    }
}
