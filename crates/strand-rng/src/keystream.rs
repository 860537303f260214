//! The keystream primitive the generator samples from.

use chacha20::cipher::{KeyIvInit, StreamCipher, StreamCipherSeek};

/// A stream-cipher block transform.
///
/// Given a key, a nonce, and a 32-bit block counter, [`generate`]
/// deterministically fills a buffer with keystream. Implementations
/// are pure: all state is passed in, none is retained.
///
/// [`generate`]: Self::generate
pub trait KeystreamPrimitive {
    /// The size in bytes of the key.
    const KEY_SIZE: usize;
    /// The size in bytes of the nonce.
    const NONCE_SIZE: usize;
    /// The size in bytes of one keystream block.
    const BLOCK_SIZE: usize;

    /// Fills `out` with `out.len() / BLOCK_SIZE` blocks of
    /// keystream, starting at block `counter`.
    ///
    /// # Panics
    ///
    /// May panic if `key` or `nonce` have the wrong length, or if
    /// `out.len()` is not a multiple of
    /// [`BLOCK_SIZE`][Self::BLOCK_SIZE].
    fn generate(key: &[u8], nonce: &[u8], counter: u32, out: &mut [u8]);
}

/// The ChaCha20 stream cipher (RFC 8439).
pub struct ChaCha20;

impl KeystreamPrimitive for ChaCha20 {
    const KEY_SIZE: usize = 32;
    const NONCE_SIZE: usize = 12;
    const BLOCK_SIZE: usize = 64;

    fn generate(key: &[u8], nonce: &[u8], counter: u32, out: &mut [u8]) {
        debug_assert_eq!(out.len() % Self::BLOCK_SIZE, 0);

        let mut cipher = chacha20::ChaCha20::new(
            chacha20::Key::from_slice(key),
            chacha20::Nonce::from_slice(nonce),
        );
        let pos = u64::from(counter)
            .checked_mul(Self::BLOCK_SIZE as u64)
            .expect("keystream position fits in u64");
        cipher.seek(pos);
        // `apply_keystream` XORs, so start from zeros to get raw
        // keystream.
        out.fill(0);
        cipher.apply_keystream(out);
    }
}
