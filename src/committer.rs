//! The [`Committer`] fixes the geometry of the chunks and commits them.
use ark_ec::CurveGroup;
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use tracing::{debug, info};

use crate::{
    codec,
    commitment::{self, Basis, Commitment},
    error::RlncError,
    COMPRESS, VALIDATE,
};

/// The largest number $m$ of elements in a chunk, i.e. 31.5MiB of data per chunk
/// on Ed25519.
///
/// Every point of the basis has to be derived and kept in memory, so committers larger than this
/// are refused, in particular when they are parsed from untrusted bytes.
pub const MAX_NB_ELEMENTS: usize = 1 << 20;

/// Commits chunks of exactly $m$ elements of $\mathbb{F}_p$.
///
/// A [`Committer`] only depends on $m$: its basis is derived with [`commitment::derive_basis`],
/// so two committers built with the same $m$, e.g. one rebuilt from the output of
/// [`Committer::to_bytes`], produce exactly the same commitments.
#[derive(Debug, Clone, PartialEq)]
pub struct Committer<F: PrimeField, G: CurveGroup<ScalarField = F>> {
    basis: Basis<F, G>,
}

impl<F: PrimeField, G: CurveGroup<ScalarField = F>> Committer<F, G> {
    /// Builds a committer for chunks of `nb_elements` elements.
    ///
    /// # Errors
    /// [`RlncError::SizeMismatch`] when `nb_elements` is zero or above [`MAX_NB_ELEMENTS`].
    pub fn new(nb_elements: usize) -> Result<Self, RlncError> {
        if nb_elements == 0 {
            return Err(RlncError::SizeMismatch(
                "chunks should have at least one element".to_string(),
            ));
        }
        if nb_elements > MAX_NB_ELEMENTS {
            return Err(RlncError::SizeMismatch(format!(
                "chunks of {} elements are too large, max is {}",
                nb_elements, MAX_NB_ELEMENTS
            )));
        }

        info!("deriving a basis of {} points", nb_elements);
        Ok(Self {
            basis: commitment::derive_basis(nb_elements),
        })
    }

    /// Builds a committer for a message of `nb_bytes` bytes split into `num_chunks` chunks.
    ///
    /// # Errors
    /// See [`codec::chunk_size`].
    pub fn for_message(nb_bytes: usize, num_chunks: usize) -> Result<Self, RlncError> {
        let chunk_size = codec::chunk_size(nb_bytes, num_chunks)?;
        debug!(
            "{} bytes in {} chunks of {} bytes",
            nb_bytes, num_chunks, chunk_size
        );
        Self::new(codec::nb_elements::<F>(chunk_size))
    }

    /// The number $m$ of elements in a chunk.
    pub fn nb_elements(&self) -> usize {
        self.basis.len()
    }

    pub fn basis(&self) -> &Basis<F, G> {
        &self.basis
    }

    /// Commits a single chunk.
    ///
    /// # Errors
    /// [`RlncError::SizeMismatch`] when the chunk does not have exactly [`Self::nb_elements`]
    /// elements.
    pub fn commit(&self, chunk: &[F]) -> Result<Commitment<F, G>, RlncError> {
        if chunk.len() != self.nb_elements() {
            return Err(RlncError::SizeMismatch(format!(
                "expected a chunk of {} elements, found {}",
                self.nb_elements(),
                chunk.len()
            )));
        }

        commitment::commit(&self.basis, chunk)
    }

    /// Serializes the committer.
    ///
    /// Only $m$ is written, as a canonical `u64`: the basis is derived again by
    /// [`Self::from_bytes`].
    pub fn to_bytes(&self) -> Result<Vec<u8>, RlncError> {
        let m = self.nb_elements() as u64;

        let mut serialized = vec![0; m.serialized_size(COMPRESS)];
        m.serialize_with_mode(&mut serialized[..], COMPRESS)
            .map_err(|e| RlncError::Serialization(e.to_string()))?;

        Ok(serialized)
    }

    /// Rebuilds a committer from the output of [`Self::to_bytes`].
    ///
    /// # Errors
    /// - [`RlncError::InvalidMessage`] when the bytes cannot be parsed, when there are trailing
    ///   bytes or when the serialized $m$ is above [`MAX_NB_ELEMENTS`]
    /// - [`RlncError::SizeMismatch`] when the serialized $m$ is zero
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RlncError> {
        let mut reader = bytes;
        let m = u64::deserialize_with_mode(&mut reader, COMPRESS, VALIDATE)
            .map_err(|e| RlncError::InvalidMessage(e.to_string()))?;
        if !reader.is_empty() {
            return Err(RlncError::InvalidMessage(format!(
                "{} trailing bytes after committer",
                reader.len()
            )));
        }

        if m > MAX_NB_ELEMENTS as u64 {
            return Err(RlncError::InvalidMessage(format!(
                "committer of {} elements is too large, max is {}",
                m, MAX_NB_ELEMENTS
            )));
        }

        Self::new(m as usize)
    }
}

#[cfg(test)]
mod tests {
    use ark_bls12_381::{Fr, G1Projective};
    use ark_ec::CurveGroup;
    use ark_ed25519::{EdwardsProjective, Fr as Fe};
    use ark_ff::PrimeField;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    use crate::{algebra::random_vector, error::RlncError};

    use super::{Committer, MAX_NB_ELEMENTS};

    #[test]
    fn geometry() {
        assert_eq!(
            Committer::<Fe, EdwardsProjective>::for_message(8 * 31 * 512, 8)
                .unwrap()
                .nb_elements(),
            504
        );
        assert_eq!(
            Committer::<Fe, EdwardsProjective>::for_message(30, 3)
                .unwrap()
                .nb_elements(),
            1
        );

        assert!(matches!(
            Committer::<Fe, EdwardsProjective>::new(0),
            Err(RlncError::SizeMismatch(..))
        ));
        assert!(matches!(
            Committer::<Fe, EdwardsProjective>::for_message(10, 3),
            Err(RlncError::SizeMismatch(..))
        ));
        assert!(matches!(
            Committer::<Fe, EdwardsProjective>::for_message(0, 3),
            Err(RlncError::SizeMismatch(..))
        ));
        assert!(matches!(
            Committer::<Fe, EdwardsProjective>::new(MAX_NB_ELEMENTS + 1),
            Err(RlncError::SizeMismatch(..))
        ));
        assert!(matches!(
            Committer::<Fe, EdwardsProjective>::for_message(usize::MAX, 1),
            Err(RlncError::SizeMismatch(..))
        ));
    }

    #[test]
    fn commit_wrong_size() {
        let rng = &mut StdRng::seed_from_u64(0);
        let committer = Committer::<Fe, EdwardsProjective>::new(4).unwrap();

        assert!(committer.commit(&random_vector(4, rng)).is_ok());
        for size in [0, 3, 5] {
            assert!(matches!(
                committer.commit(&random_vector(size, rng)),
                Err(RlncError::SizeMismatch(..))
            ));
        }
    }

    fn serialization_template<F: PrimeField, G: CurveGroup<ScalarField = F>>(m: usize) {
        let rng = &mut StdRng::seed_from_u64(0);

        let committer = Committer::<F, G>::new(m).unwrap();
        let bytes = committer.to_bytes().unwrap();
        assert_eq!(bytes.len(), 8);

        let deserialized = Committer::<F, G>::from_bytes(&bytes).unwrap();
        assert_eq!(deserialized, committer);

        let chunk: Vec<F> = random_vector(m, rng);
        assert_eq!(
            deserialized.commit(&chunk).unwrap(),
            committer.commit(&chunk).unwrap(),
            "TEST | m: {m}"
        );

        // two independent committers agree as well
        assert_eq!(
            Committer::<F, G>::new(m).unwrap().commit(&chunk).unwrap(),
            committer.commit(&chunk).unwrap()
        );
    }

    #[test]
    fn serialization() {
        for m in [1, 7, 64] {
            serialization_template::<Fe, EdwardsProjective>(m);
            serialization_template::<Fr, G1Projective>(m);
        }
    }

    #[test]
    fn invalid_serialization() {
        type C = Committer<Fe, EdwardsProjective>;

        assert!(matches!(
            C::from_bytes(&[]),
            Err(RlncError::InvalidMessage(..))
        ));
        assert!(matches!(
            C::from_bytes(&[1, 0, 0]),
            Err(RlncError::InvalidMessage(..))
        ));
        assert!(matches!(
            C::from_bytes(&[1, 0, 0, 0, 0, 0, 0, 0, 42]),
            Err(RlncError::InvalidMessage(..))
        ));
        assert!(matches!(
            C::from_bytes(&[0; 8]),
            Err(RlncError::SizeMismatch(..))
        ));
        for m in [MAX_NB_ELEMENTS as u64 + 1, u32::MAX as u64, u64::MAX] {
            assert!(
                matches!(
                    C::from_bytes(&m.to_le_bytes()),
                    Err(RlncError::InvalidMessage(..))
                ),
                "a committer of {m} elements should be refused"
            );
        }
        assert_eq!(
            C::from_bytes(&[3, 0, 0, 0, 0, 0, 0, 0])
                .unwrap()
                .nb_elements(),
            3
        );
    }
}
