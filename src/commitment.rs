//! Homomorphic commitments to vectors of elements of $\mathbb{F}_p$.
//!
//! A vector $v = (v_j)$ of $m$ elements is committed against a public _basis_ of $m$ points
//! $(G_j)$ of a group $\mathbb{G}$ whose scalar field is $\mathbb{F}_p$:
//!
//! $$ \text{com}(v) = \sum\limits_{j = 0}^{m - 1} v_j G_j $$
//!
//! The commitment is linear, i.e. for any $a, b \in \mathbb{F}_p$ and vectors $u, v$
//!
//! $$ \text{com}(a u + b v) = a \cdot \text{com}(u) + b \cdot \text{com}(v) $$
//!
//! This is what allows to check that a coded chunk is a linear combination of the source chunks
//! by only looking at the commitments of the source chunks, see [`verify_linear_combination`].
//!
//! The basis does not come from a trusted setup: point $j$ is derived by hashing a fixed domain
//! tag together with $j$, which makes the basis reproducible by anyone and leaves no one with a
//! known relation between the points.
use ark_ec::{AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{end_timer, start_timer};
use rs_merkle::{algorithms::Sha256, Hasher};

use crate::{error::RlncError, COMPRESS};

/// The domain separation tag used to derive the points of a [`Basis`].
pub const BASIS_DOMAIN_TAG: &[u8] = b"rlnc/generator-basis/v1";

/// A public basis of points used to commit vectors.
///
/// This is a simple wrapper around a sequence of elements of the curve.
#[derive(Debug, Clone, Default, CanonicalSerialize, CanonicalDeserialize, PartialEq)]
pub struct Basis<F: PrimeField, G: CurveGroup<ScalarField = F>>(pub Vec<G::Affine>);

impl<F: PrimeField, G: CurveGroup<ScalarField = F>> Basis<F, G> {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A commitment to a vector, i.e. a single element of the curve.
///
/// If $v = (v_j)$ is the vector to commit and $(G_j)$ is the basis, then [`Commitment`] will hold
/// $$\text{com}(v) = \sum\limits\_{j = 0}^{m - 1} v_j G_j$$
#[derive(Debug, Clone, Copy, Default, CanonicalSerialize, CanonicalDeserialize, PartialEq)]
pub struct Commitment<F: PrimeField, G: CurveGroup<ScalarField = F>>(pub G::Affine);

// expand the domain tag, the index of the point and a retry counter into `nb_bytes` bytes
fn expand(index: u64, counter: u64, nb_bytes: usize) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(nb_bytes + 32);
    let mut block = 0u64;
    while bytes.len() < nb_bytes {
        let mut input = BASIS_DOMAIN_TAG.to_vec();
        input.extend_from_slice(&index.to_le_bytes());
        input.extend_from_slice(&counter.to_le_bytes());
        input.extend_from_slice(&block.to_le_bytes());
        bytes.extend_from_slice(&Sha256::hash(&input));
        block += 1;
    }
    bytes.truncate(nb_bytes);

    bytes
}

fn derive_point<F: PrimeField, G: CurveGroup<ScalarField = F>>(index: usize) -> G::Affine {
    let nb_bytes = G::Affine::generator().compressed_size();

    // try-and-increment: roughly half of the candidates are on the curve
    let mut counter = 0u64;
    loop {
        if let Some(point) = G::Affine::from_random_bytes(&expand(index as u64, counter, nb_bytes))
        {
            let point = point.clear_cofactor();
            if !point.into_group().is_zero() {
                return point;
            }
        }
        counter += 1;
    }
}

/// Derives a basis of `nb_points` points.
///
/// This is a pure function of `nb_points` and [`BASIS_DOMAIN_TAG`]: two calls with the same
/// number of points, in any process, give the same basis, and the basis with $m$ points is the
/// prefix of the basis with $m' \geq m$ points.
pub fn derive_basis<F: PrimeField, G: CurveGroup<ScalarField = F>>(
    nb_points: usize,
) -> Basis<F, G> {
    let basis_time = start_timer!(|| format!("deriving a basis of {} points", nb_points));
    let points = (0..nb_points).map(derive_point::<F, G>).collect();
    end_timer!(basis_time);

    Basis(points)
}

/// Computes the commitment of a vector on a basis.
///
/// # Errors
/// [`RlncError::SizeMismatch`] when the vector has more elements than there are points in the
/// basis.
pub fn commit<F, G>(basis: &Basis<F, G>, elements: &[F]) -> Result<Commitment<F, G>, RlncError>
where
    F: PrimeField,
    G: CurveGroup<ScalarField = F>,
{
    if elements.len() > basis.len() {
        return Err(RlncError::SizeMismatch(format!(
            "too many elements: max is {}, found {}",
            basis.len(),
            elements.len()
        )));
    }

    let commit_time = start_timer!(|| format!("committing {} elements", elements.len()));
    let bigints = elements.iter().map(|e| e.into_bigint()).collect::<Vec<_>>();
    let commitment = <G as VariableBaseMSM>::msm_bigint(&basis.0[..elements.len()], &bigints);
    end_timer!(commit_time);

    Ok(Commitment(commitment.into_affine()))
}

/// Checks that a commitment is the linear combination of other commitments.
///
/// Returns `true` if and only if
/// $$ \texttt{claimed} = \sum\limits_{k = 0}^{n - 1} c_k \cdot \texttt{commitments}_k $$
/// where $(c_k)$ is the `coding_vector`.
///
/// Thanks to the homomorphic property of [`commit`], if `claimed` is the commitment of a coded
/// payload, this proves that the payload has been built with the coding vector from the vectors
/// behind `commitments`.
///
/// A coding vector whose length does not match the number of commitments never verifies.
pub fn verify_linear_combination<F, G>(
    coding_vector: &[F],
    commitments: &[Commitment<F, G>],
    claimed: &Commitment<F, G>,
) -> bool
where
    F: PrimeField,
    G: CurveGroup<ScalarField = F>,
{
    if coding_vector.len() != commitments.len() {
        return false;
    }

    let verify_time = start_timer!(|| format!("combining {} commitments", commitments.len()));
    let bases = commitments.iter().map(|c| c.0).collect::<Vec<_>>();
    let bigints = coding_vector
        .iter()
        .map(|c| c.into_bigint())
        .collect::<Vec<_>>();
    let combination = <G as VariableBaseMSM>::msm_bigint(&bases, &bigints);
    end_timer!(verify_time);

    combination.into_affine() == claimed.0
}

/// Computes a fingerprint of an ordered sequence of commitments.
///
/// The commitments are serialized canonically, compressed, and hashed with SHA-256. All the
/// packets of a given message carry the same commitments, so this gives a short identifier of a
/// committed message that can be compared out of band.
pub fn commitments_hash<F, G>(commitments: &[Commitment<F, G>]) -> Result<[u8; 32], RlncError>
where
    F: PrimeField,
    G: CurveGroup<ScalarField = F>,
{
    let mut serialized = vec![0; commitments.serialized_size(COMPRESS)];
    commitments
        .serialize_with_mode(&mut serialized[..], COMPRESS)
        .map_err(|e| RlncError::Serialization(e.to_string()))?;

    Ok(Sha256::hash(&serialized))
}
