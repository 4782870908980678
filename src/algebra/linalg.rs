//! Keep a linear system in _reduced row-echelon form_, one row at a time.
//!
//! Each row of an [`Echelon`] is made of two parts:
//! - the _coefficients_, i.e. a coding vector of $n$ elements of $\mathbb{F}_p$
//! - the _payload_, i.e. the data that has been combined with these coefficients
//!
//! Every operation applied to the coefficients of a row is applied to its payload as well, so
//! that, for every row, the payload remains the combination of the source chunks described by
//! the coefficients.
//!
//! The system is always kept in _reduced_ form:
//! - each row has a _pivot_ column whose coefficient is $1$
//! - the pivot column of a row is $0$ in all the other rows
//!
//! As a consequence, once there are $n$ rows, the coefficients form the identity matrix and the
//! payload of row $i$ is the source chunk $i$.
use ark_ff::Field;

use crate::error::RlncError;

#[derive(Clone, Debug, PartialEq)]
struct Row<F: Field> {
    pivot: usize,
    coefficients: Vec<F>,
    payload: Vec<F>,
}

/// A system of linearly independent rows in reduced row-echelon form, sorted by pivot column.
#[derive(Clone, Debug, PartialEq)]
pub struct Echelon<F: Field> {
    width: usize,
    rows: Vec<Row<F>>,
}

// compute _destination = destination - source * factor_
fn sub_scaled<F: Field>(destination: &mut [F], source: &[F], factor: F) {
    for (d, s) in destination.iter_mut().zip(source.iter()) {
        *d -= factor * s;
    }
}

// compute _vector = vector * factor_
fn scale<F: Field>(vector: &mut [F], factor: F) {
    for x in vector.iter_mut() {
        *x *= factor;
    }
}

impl<F: Field> Echelon<F> {
    /// Builds an empty system whose rows will have `width` coefficients.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            rows: Vec::with_capacity(width),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// The number of linearly independent rows in the system.
    pub fn rank(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.rows.len() == self.width
    }

    /// Tries to add a new row to the system.
    ///
    /// The row is first reduced against all the rows already in the system.
    /// - if nothing remains of the coefficients, the row was a linear combination of the system
    ///   and `false` is returned, leaving the system untouched
    /// - otherwise, the reduced row is normalized on its new pivot, that pivot is eliminated from
    ///   all the other rows and `true` is returned
    ///
    /// Because the system is reduced, the factor used to eliminate row $r$ is simply the
    /// coefficient of the new row at the pivot of $r$, so the payload is only touched once the
    /// row is known to be independent.
    ///
    /// # Errors
    /// [`RlncError::SizeMismatch`] when the coefficients do not have [`Self::width`] elements or
    /// when the payload does not have the size of the payloads already in the system.
    pub fn insert(&mut self, coefficients: &[F], payload: &[F]) -> Result<bool, RlncError> {
        if coefficients.len() != self.width {
            return Err(RlncError::SizeMismatch(format!(
                "expected {} coefficients, found {}",
                self.width,
                coefficients.len()
            )));
        }
        if let Some(row) = self.rows.first() {
            if row.payload.len() != payload.len() {
                return Err(RlncError::SizeMismatch(format!(
                    "expected a payload of {} elements, found {}",
                    row.payload.len(),
                    payload.len()
                )));
            }
        }

        let factors: Vec<(usize, F)> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| (i, coefficients[row.pivot]))
            .filter(|(_, factor)| !factor.is_zero())
            .collect();

        let mut coefficients = coefficients.to_vec();
        for &(i, factor) in &factors {
            sub_scaled(&mut coefficients, &self.rows[i].coefficients, factor);
        }

        let pivot = match coefficients.iter().position(|c| !c.is_zero()) {
            Some(pivot) => pivot,
            None => return Ok(false),
        };
        let inverse = match coefficients[pivot].inverse() {
            Some(inverse) => inverse,
            None => return Ok(false),
        };

        let mut payload = payload.to_vec();
        for &(i, factor) in &factors {
            sub_scaled(&mut payload, &self.rows[i].payload, factor);
        }

        scale(&mut coefficients, inverse);
        scale(&mut payload, inverse);

        for row in self.rows.iter_mut() {
            let factor = row.coefficients[pivot];
            if !factor.is_zero() {
                sub_scaled(&mut row.coefficients, &coefficients, factor);
                sub_scaled(&mut row.payload, &payload, factor);
            }
        }

        let position = self.rows.partition_point(|row| row.pivot < pivot);
        self.rows.insert(
            position,
            Row {
                pivot,
                coefficients,
                payload,
            },
        );

        Ok(true)
    }

    /// Iterates over the `(coefficients, payload)` pairs of the system, sorted by pivot.
    pub fn rows(&self) -> impl Iterator<Item = (&[F], &[F])> + '_ {
        self.rows
            .iter()
            .map(|row| (row.coefficients.as_slice(), row.payload.as_slice()))
    }

    /// Iterates over the pivot columns of the system, in increasing order.
    pub fn pivots(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.iter().map(|row| row.pivot)
    }
}
