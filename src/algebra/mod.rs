//! Manipulate vectors of elements from a finite field $\mathbb{F}_p$.
use ark_ff::Field;
use ark_std::rand::RngCore;

pub mod linalg;

/// Computes the [scalar product] between two vectors of elements of $\mathbb{F}_p$.
///
/// [`scalar_product`] computes the [scalar product] $c$ of $(a_i) \in \mathbb{F}_p^n \sim \texttt{lhs}$ and
/// $(b_i) \in \mathbb{F}_p^n \sim \texttt{rhs}$ as
///
/// $$ c = a \cdot b = \sum\limits_{i = 0}^{n - 1} a_i b_i $$
///
/// ## Preconditions
/// - `lhs` and `rhs` should contain the same number of elements, extra elements are ignored.
///
/// [scalar product]: <https://en.wikipedia.org/wiki/Dot_product>
pub fn scalar_product<F: Field>(lhs: &[F], rhs: &[F]) -> F {
    lhs.iter().zip(rhs.iter()).map(|(l, r)| *l * r).sum()
}

/// Computes the linear combination of vectors of elements of $\mathbb{F}_p$.
///
/// [`linear_combination`] computes the vector $v$ from $n$ vectors $(v_i) \sim \texttt{vectors}$
/// and coefficients $(c_i) \sim \texttt{coefficients}$ as
///
/// $$ v = \sum\limits_{i = 0}^{n - 1} c_i v_i $$
///
/// where the sum and the product are taken element-wise.
///
/// ## Preconditions
/// - all the `vectors` should have the same length
/// - `coefficients` should have one element per vector
///
/// The result is empty when there are no vectors.
pub fn linear_combination<F: Field, V: AsRef<[F]>>(coefficients: &[F], vectors: &[V]) -> Vec<F> {
    let width = vectors.first().map(|v| v.as_ref().len()).unwrap_or(0);

    let mut combination = vec![F::zero(); width];
    for (c, v) in coefficients.iter().zip(vectors.iter()) {
        if c.is_zero() {
            continue;
        }
        for (x, y) in combination.iter_mut().zip(v.as_ref().iter()) {
            *x += *c * y;
        }
    }

    combination
}

/// Draws a vector of `len` uniformly random elements of $\mathbb{F}_p$.
pub fn random_vector<F: Field, R: RngCore>(len: usize, rng: &mut R) -> Vec<F> {
    (0..len).map(|_| F::rand(rng)).collect()
}
