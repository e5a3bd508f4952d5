//! Random buffers used for challenges, user handles and credential ids.

use rand::{Rng, RngCore};

/// Length of every [`Buffer`].
pub const BUFFER_LEN: usize = 8;

/// Exclusive upper bound of each byte in a [`Buffer`].
///
/// Bytes are drawn from `[0, 255)`, so `0xff` never appears in a generated buffer.
pub const BYTE_UPPER_BOUND: u8 = u8::MAX;

const _: () = assert!(BYTE_UPPER_BOUND > 0);

/// A fixed length random sequence, consumed by a single `create()` or `get()` call.
pub type Buffer = [u8; BUFFER_LEN];

/// The range given to [`random_in`] is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("max ({max}) must be greater than min ({min})")]
pub struct InvalidRange {
    /// Inclusive lower bound that was requested.
    pub min: u8,
    /// Exclusive upper bound that was requested.
    pub max: u8,
}

/// Draw a uniformly distributed integer from `[min, max)`.
pub fn random_in<R: Rng + ?Sized>(rng: &mut R, min: u8, max: u8) -> Result<u8, InvalidRange> {
    if max <= min {
        return Err(InvalidRange { min, max });
    }
    Ok(rng.gen_range(min..max))
}

/// Generate a [`Buffer`] from the given random number generator.
pub fn random_buffer_with<R: Rng + ?Sized>(rng: &mut R) -> Buffer {
    let mut array: Buffer = [0; BUFFER_LEN];
    // the range is never empty, see the assertion below `BYTE_UPPER_BOUND`
    array.fill_with(|| random_in(&mut *rng, 0, BYTE_UPPER_BOUND).unwrap_or_default());
    log::debug!("generated buffer {array:?}");
    array
}

/// Generate a [`Buffer`] from the thread local random number generator.
pub fn random_buffer() -> Buffer {
    random_buffer_with(&mut rand::thread_rng())
}

/// Generate random data of specific length.
pub fn random_vec(len: usize) -> Vec<u8> {
    let mut data = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut data);
    data
}
