//! Testing utilities: deterministic mock collaborators.
//!
//! Nothing in this module is cryptographically secure. It exists so
//! tests (and downstream test suites) can drive the generator with
//! known inputs and assert byte-exact outputs and call counts.

use crate::{
    entropy::{EntropyError, EntropySource},
    keystream::KeystreamPrimitive,
};

/// An entropy source that cycles over a fixed byte pattern and
/// counts how often it is read.
///
/// Two sources constructed from the same pattern produce identical
/// byte sequences, which makes generators seeded from them
/// deterministic.
#[derive(Clone, Debug)]
pub struct StubEntropy {
    pattern: Vec<u8>,
    pos: usize,
    calls: usize,
}

impl StubEntropy {
    /// Creates a source cycling over `pattern`.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is empty.
    pub fn new(pattern: &[u8]) -> Self {
        assert!(!pattern.is_empty(), "pattern must be non-empty");
        Self {
            pattern: pattern.to_vec(),
            pos: 0,
            calls: 0,
        }
    }

    /// Returns the number of times [`fill`][EntropySource::fill]
    /// has been called.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl EntropySource for StubEntropy {
    fn fill(&mut self, dst: &mut [u8]) -> Result<(), EntropyError> {
        self.calls += 1;
        for b in dst {
            *b = self.pattern[self.pos % self.pattern.len()];
            self.pos += 1;
        }
        Ok(())
    }
}

/// An entropy source that succeeds a fixed number of times, then
/// fails every read.
#[derive(Clone, Debug)]
pub struct FailAfter {
    left: usize,
}

impl FailAfter {
    /// Creates a source with `successes` successful reads left.
    pub fn new(successes: usize) -> Self {
        Self { left: successes }
    }
}

impl EntropySource for FailAfter {
    fn fill(&mut self, dst: &mut [u8]) -> Result<(), EntropyError> {
        if self.left == 0 {
            return Err(EntropyError::Source("entropy exhausted"));
        }
        self.left -= 1;
        dst.fill(0x5A);
        Ok(())
    }
}

/// A toy "cipher" producing a counting pattern derived from the
/// first key byte and the block counter.
///
/// Key 8, nonce 4, block 16 bytes, so a full sample batch is 256
/// bytes with a 12-byte key erasure reservation. Because the
/// pattern depends on the key, output visibly changes when fast key
/// erasure rotates the key.
pub struct PatternKeystream;

impl KeystreamPrimitive for PatternKeystream {
    const KEY_SIZE: usize = 8;
    const NONCE_SIZE: usize = 4;
    const BLOCK_SIZE: usize = 16;

    fn generate(key: &[u8], _nonce: &[u8], counter: u32, out: &mut [u8]) {
        for (i, b) in out.iter_mut().enumerate() {
            *b = pattern_byte(key[0], counter, i);
        }
    }
}

/// The byte [`PatternKeystream`] produces at offset `i` of a batch
/// generated with first key byte `key0` at block `counter`.
pub fn pattern_byte(key0: u8, counter: u32, i: usize) -> u8 {
    key0.wrapping_mul(3)
        .wrapping_add((counter & 0xff) as u8)
        .wrapping_add((i & 0xff) as u8)
}
