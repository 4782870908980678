//! The wire format of a coded chunk.
use ark_ec::CurveGroup;
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

use crate::{
    commitment::{self, Commitment},
    error::RlncError,
    COMPRESS, VALIDATE,
};

/// A coded chunk, ready to be sent to another node.
///
/// A packet carries
/// - the _coding vector_, i.e. the coefficients of the linear combination of the source chunks,
///   one per source chunk
/// - the _payload_, i.e. the result of that linear combination, as $m$ elements of
///   $\mathbb{F}_p$
/// - the _commitments_ of all the source chunks, the same for all the packets of a message
///
/// On the wire, a packet is the canonical serialization of these three fields, compressed and
/// validated, see [`Packet::to_bytes`] and [`Packet::from_bytes`].
///
/// The size of the message is not part of a packet: nothing in a packet is trusted that is not
/// checked against the commitments, so the receiver has to know the size beforehand, see
/// [`crate::destination::DestinationNode::new`].
#[derive(Debug, Default, Clone, PartialEq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Packet<F: PrimeField, G: CurveGroup<ScalarField = F>> {
    coding_vector: Vec<F>,
    payload: Vec<F>,
    commitments: Vec<Commitment<F, G>>,
}

impl<F: PrimeField, G: CurveGroup<ScalarField = F>> std::fmt::Display for Packet<F, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{{")?;
        write!(f, "coding_vector: [")?;
        for x in &self.coding_vector {
            if x.is_zero() {
                write!(f, "0,")?;
            } else {
                write!(f, r#""{}","#, x)?;
            }
        }
        write!(f, "]")?;
        write!(f, ",")?;
        write!(f, "payload: [")?;
        for x in &self.payload {
            if x.is_zero() {
                write!(f, "0,")?;
            } else {
                write!(f, r#""{}","#, x)?;
            }
        }
        write!(f, "]")?;
        write!(f, ",")?;
        write!(f, "commits: [")?;
        for commit in &self.commitments {
            write!(f, r#""{}","#, commit.0)?;
        }
        write!(f, "]")?;
        write!(f, "}}")?;

        Ok(())
    }
}

impl<F: PrimeField, G: CurveGroup<ScalarField = F>> Packet<F, G> {
    pub(crate) fn new(
        coding_vector: Vec<F>,
        payload: Vec<F>,
        commitments: Vec<Commitment<F, G>>,
    ) -> Self {
        Self {
            coding_vector,
            payload,
            commitments,
        }
    }

    pub fn coding_vector(&self) -> &[F] {
        &self.coding_vector
    }

    pub fn payload(&self) -> &[F] {
        &self.payload
    }

    pub fn commitments(&self) -> &[Commitment<F, G>] {
        &self.commitments
    }

    /// Identifies the message this packet belongs to, see [`commitment::commitments_hash`].
    pub fn commitments_hash(&self) -> Result<[u8; 32], RlncError> {
        commitment::commitments_hash(&self.commitments)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RlncError> {
        let mut serialized = vec![0; self.serialized_size(COMPRESS)];
        self.serialize_with_mode(&mut serialized[..], COMPRESS)
            .map_err(|e| RlncError::Serialization(e.to_string()))?;

        Ok(serialized)
    }

    /// Parses a packet.
    ///
    /// Curve points are checked to be valid points of the prime order subgroup.
    ///
    /// # Errors
    /// [`RlncError::InvalidMessage`] when the bytes are not exactly one serialized packet.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RlncError> {
        let mut reader = bytes;
        let packet = Self::deserialize_with_mode(&mut reader, COMPRESS, VALIDATE)
            .map_err(|e| RlncError::InvalidMessage(e.to_string()))?;
        if !reader.is_empty() {
            return Err(RlncError::InvalidMessage(format!(
                "{} trailing bytes after packet",
                reader.len()
            )));
        }

        Ok(packet)
    }
}
