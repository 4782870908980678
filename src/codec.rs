//! Pack raw bytes into elements of $\mathbb{F}_p$ and back.
//!
//! If $\mathbb{F}_p$ needs $b$ bits to represent its elements, each element holds exactly $b - 1$
//! bits of data, e.g. $252$ bits for the scalar field of Ed25519, whose order is a bit above
//! $2^{252}$. Because $2^{b - 1} < p$, any such word is a valid element and the mapping is
//! injective.
//!
//! Bits are taken in little-endian order, i.e. bit $i$ of the data is bit $i \mod 8$ of byte
//! $\lfloor i / 8 \rfloor$, and the last word is padded with zeros.
use ark_ff::{BigInteger, PrimeField};

use crate::error::RlncError;

/// The number of bits of data held by a single element of $\mathbb{F}_p$.
pub fn nb_bits_per_element<F: PrimeField>() -> usize {
    F::MODULUS_BIT_SIZE as usize - 1
}

/// The number of elements of $\mathbb{F}_p$ required to hold `nb_bytes` bytes.
///
/// This is $\lceil 8 \cdot \texttt{nb\_bytes} / b \rceil$ where $b$ is [`nb_bits_per_element`],
/// computed without overflow for any `nb_bytes`.
pub fn nb_elements<F: PrimeField>(nb_bytes: usize) -> usize {
    let bits = nb_bits_per_element::<F>();
    // 8 * nb_bytes = 8 * bits * q + 8 * r
    let (q, r) = (nb_bytes / bits, nb_bytes % bits);
    q * 8 + (r * 8 + bits - 1) / bits
}

#[inline(always)]
fn bit(bytes: &[u8], i: usize) -> bool {
    (bytes[i / 8] >> (i % 8)) & 1 == 1
}

#[inline(always)]
fn set_bit(bytes: &mut [u8], i: usize) {
    bytes[i / 8] |= 1 << (i % 8);
}

/// Packs a chunk of bytes into elements of $\mathbb{F}_p$.
///
/// The output has [`nb_elements`] elements.
///
/// # Example
/// ```
/// use ark_ed25519::Fr;
/// use rlnc::codec::{decode_chunk, encode_chunk};
///
/// let bytes = b"hello world";
/// let chunk = encode_chunk::<Fr>(bytes);
/// assert_eq!(chunk, vec![Fr::from(0x646c726f77206f6c6c6568u128)]);
/// assert_eq!(decode_chunk(&chunk, bytes.len()).unwrap(), bytes);
/// ```
pub fn encode_chunk<F: PrimeField>(bytes: &[u8]) -> Vec<F> {
    let bits = nb_bits_per_element::<F>();
    let nb_bits = bytes.len() * 8;

    (0..nb_elements::<F>(bytes.len()))
        .map(|i| {
            let start = i * bits;
            let end = (start + bits).min(nb_bits);

            let mut word = vec![0u8; (bits + 7) / 8];
            for (j, b) in (start..end).enumerate() {
                if bit(bytes, b) {
                    set_bit(&mut word, j);
                }
            }

            F::from_le_bytes_mod_order(&word)
        })
        .collect()
}

/// Unpacks elements of $\mathbb{F}_p$ back into `nb_bytes` bytes.
///
/// > **Note**
/// >
/// > This is the inverse operation of [`encode_chunk`]. Any element beyond the first
/// > `nb_bytes` bytes, e.g. padding, is ignored.
///
/// # Errors
/// [`RlncError::SizeMismatch`] when the elements do not hold enough bits for `nb_bytes` bytes.
pub fn decode_chunk<F: PrimeField>(elements: &[F], nb_bytes: usize) -> Result<Vec<u8>, RlncError> {
    if nb_elements::<F>(nb_bytes) > elements.len() {
        return Err(RlncError::SizeMismatch(format!(
            "{} elements cannot hold {} bytes",
            elements.len(),
            nb_bytes
        )));
    }

    let bits = nb_bits_per_element::<F>();
    let nb_bits = nb_bytes * 8;

    let mut bytes = vec![0u8; nb_bytes];
    for (i, e) in elements.iter().enumerate() {
        let start = i * bits;
        if start >= nb_bits {
            break;
        }
        let end = (start + bits).min(nb_bits);

        let word = e.into_bigint().to_bytes_le();
        for (j, b) in (start..end).enumerate() {
            if bit(&word, j) {
                set_bit(&mut bytes, b);
            }
        }
    }

    Ok(bytes)
}

/// Computes the size of a chunk when `nb_bytes` bytes are split into `num_chunks` chunks.
///
/// # Errors
/// [`RlncError::SizeMismatch`] when there are no bytes, no chunks, or when `nb_bytes` is not a
/// multiple of `num_chunks`.
pub fn chunk_size(nb_bytes: usize, num_chunks: usize) -> Result<usize, RlncError> {
    if num_chunks == 0 {
        return Err(RlncError::SizeMismatch(
            "number of chunks should be positive".to_string(),
        ));
    }
    if nb_bytes == 0 {
        return Err(RlncError::SizeMismatch("message is empty".to_string()));
    }
    if nb_bytes % num_chunks != 0 {
        return Err(RlncError::SizeMismatch(format!(
            "message of {} bytes is not divisible into {} chunks",
            nb_bytes, num_chunks
        )));
    }

    Ok(nb_bytes / num_chunks)
}

/// Splits a message into `num_chunks` chunks of equal size.
///
/// # Errors
/// See [`chunk_size`].
pub fn split_message(bytes: &[u8], num_chunks: usize) -> Result<Vec<&[u8]>, RlncError> {
    let size = chunk_size(bytes.len(), num_chunks)?;
    Ok(bytes.chunks(size).collect())
}

#[cfg(test)]
mod tests {
    use ark_bls12_381::Fr;
    use ark_ed25519::Fr as Fe;
    use ark_ff::{Field, PrimeField};
    use ark_std::{
        rand::{rngs::StdRng, RngCore, SeedableRng},
        One, Zero,
    };

    use crate::error::RlncError;

    use super::{
        chunk_size, decode_chunk, encode_chunk, nb_bits_per_element, nb_elements, split_message,
    };

    fn bytes(nb_bytes: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; nb_bytes];
        StdRng::seed_from_u64(0).fill_bytes(&mut bytes);
        bytes
    }

    #[test]
    fn bits_per_element() {
        assert_eq!(nb_bits_per_element::<Fe>(), 252);
        assert_eq!(nb_bits_per_element::<Fr>(), 254);

        assert_eq!(nb_elements::<Fe>(0), 0);
        assert_eq!(nb_elements::<Fe>(1), 1);
        assert_eq!(nb_elements::<Fe>(31), 1);
        assert_eq!(nb_elements::<Fe>(32), 2);
        assert_eq!(nb_elements::<Fe>(63), 2);
        assert_eq!(nb_elements::<Fe>(64), 3);
        assert_eq!(nb_elements::<Fe>(31 * 512), 504);
        assert_eq!(nb_elements::<Fe>(252), 8);
        assert_eq!(nb_elements::<Fe>(253), 9);
        for nb_bytes in 0..2_000 {
            assert_eq!(
                nb_elements::<Fe>(nb_bytes),
                (nb_bytes * 8 + 251) / 252,
                "TEST | nb_bytes: {nb_bytes}"
            );
        }
    }

    #[test]
    fn huge_sizes_do_not_overflow() {
        let bits = nb_bits_per_element::<Fe>();
        let expected = (usize::MAX / bits) * 8 + ((usize::MAX % bits) * 8 + bits - 1) / bits;
        assert_eq!(nb_elements::<Fe>(usize::MAX), expected);
        assert!(nb_elements::<Fe>(usize::MAX) > usize::MAX / bits);

        let chunk = encode_chunk::<Fe>(&bytes(40));
        assert!(matches!(
            decode_chunk(&chunk, usize::MAX),
            Err(RlncError::SizeMismatch(..))
        ));
        assert!(matches!(
            decode_chunk(&chunk, usize::MAX / 8 + 1),
            Err(RlncError::SizeMismatch(..))
        ));
    }

    #[test]
    fn packing() {
        // 252 bits of ones, then the 4 remaining ones
        let chunk = encode_chunk::<Fe>(&[0xff; 32]);
        assert_eq!(chunk.len(), 2);
        assert_eq!(chunk[0], Fe::from(2u8).pow([252u64]) - Fe::one());
        assert_eq!(chunk[1], Fe::from(15u8));

        assert_eq!(encode_chunk::<Fe>(&[0x01]), vec![Fe::one()]);
        assert_eq!(encode_chunk::<Fe>(&[0x00, 0x01]), vec![Fe::from(256u16)]);
        assert!(encode_chunk::<Fe>(&[]).is_empty());

        // every word is strictly below the modulus
        let chunk = encode_chunk::<Fe>(&[0xff; 31 * 16]);
        assert!(chunk.iter().all(|e| !e.is_zero()));
    }

    fn round_trip_template<F: PrimeField>(nb_bytes: usize) {
        let bytes = bytes(nb_bytes);
        let chunk = encode_chunk::<F>(&bytes);
        assert_eq!(chunk.len(), nb_elements::<F>(nb_bytes));
        assert_eq!(
            decode_chunk(&chunk, nb_bytes).unwrap(),
            bytes,
            "TEST | nb_bytes: {nb_bytes}"
        );
    }

    #[test]
    fn round_trip() {
        for nb_bytes in [1, 2, 31, 32, 33, 63, 64, 65, 100, 1024, 31 * 512] {
            round_trip_template::<Fe>(nb_bytes);
            round_trip_template::<Fr>(nb_bytes);
        }
    }

    #[test]
    fn decode_with_padding() {
        let bytes = bytes(40);
        let mut chunk = encode_chunk::<Fe>(&bytes);
        chunk.resize(5, Fe::zero());
        assert_eq!(decode_chunk(&chunk, 40).unwrap(), bytes);
        assert_eq!(decode_chunk(&chunk, 10).unwrap(), bytes[..10]);
    }

    #[test]
    fn decode_too_short() {
        let chunk = encode_chunk::<Fe>(&bytes(40));
        assert!(matches!(
            decode_chunk(&chunk, 64),
            Err(RlncError::SizeMismatch(..))
        ));
    }

    #[test]
    fn split() {
        let bytes = bytes(24);

        let chunks = split_message(&bytes, 3).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks.concat(), bytes);
        assert!(chunks.iter().all(|c| c.len() == 8));

        assert_eq!(split_message(&bytes, 24).unwrap().len(), 24);
        assert_eq!(split_message(&bytes, 1).unwrap(), vec![&bytes[..]]);
    }

    #[test]
    fn split_with_invalid_geometry() {
        let bytes = bytes(24);

        for num_chunks in [0, 5, 7, 25] {
            assert!(
                matches!(
                    split_message(&bytes, num_chunks),
                    Err(RlncError::SizeMismatch(..))
                ),
                "splitting 24 bytes into {num_chunks} chunks should fail"
            );
        }
        assert!(matches!(
            split_message(&[], 1),
            Err(RlncError::SizeMismatch(..))
        ));
        assert_eq!(chunk_size(24, 4), Ok(6));
    }
}
