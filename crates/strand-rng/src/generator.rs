//! The generator state machine: sampling, fast key erasure, and
//! byte dispensing.

use core::{cmp, fmt, marker::PhantomData};

use buggy::{BugExt, bug};
use strand_secmem::SecureRegion;
use zeroize::Zeroize;

use crate::{
    csprng::Csprng,
    entropy::EntropySource,
    error::RngError,
    keystream::KeystreamPrimitive,
};

#[cfg(feature = "getrandom")]
use crate::{entropy::OsEntropy, keystream::ChaCha20};

/// Keystream blocks generated per sample batch.
pub const RANDOM_BUFFER_BLOCKS: usize = 16;

/// Keystream blocks that may be produced under one seed before a
/// reseed becomes mandatory.
///
/// The key and nonce are already rotated every batch by fast key
/// erasure; this bound is an additional defense in depth, chosen
/// well below the cipher's counter period.
pub const MAX_COUNTER_VAL: u32 = 1 << 30;

const BLOCKS_PER_SAMPLE: u32 = RANDOM_BUFFER_BLOCKS as u32;

/// A fast key erasure CSPRNG.
///
/// Random bytes are produced in batches of [`RANDOM_BUFFER_BLOCKS`]
/// keystream blocks. Immediately after a batch is generated, its
/// first `KEY_SIZE + NONCE_SIZE` bytes replace the current key and
/// nonce and are zeroed in place, before any byte of the batch can
/// reach a caller. A compromise of the present state therefore
/// reveals neither bytes already dispensed nor the key that
/// produced them, and dispensed bytes cannot predict future output.
/// Every byte handed to a caller is likewise zeroed as it leaves
/// the buffer, so nothing is ever served twice.
///
/// All key material and undispensed keystream live in
/// [`SecureRegion`]s: locked against swap, wiped on release.
///
/// The generator is not internally synchronized. Give each thread
/// its own instance, or serialize access with an external mutex.
///
/// For more information on fast key erasure, see
/// <https://blog.cr.yp.to/20170723-random.html>.
pub struct FastKeyErasureRng<P: KeystreamPrimitive, E: EntropySource> {
    entropy: E,
    /// key ‖ nonce for the next sample.
    secrets: SecureRegion,
    /// Sampled keystream not yet dispensed.
    buf: SecureRegion,
    /// Blocks generated under the current seed. Pinned to
    /// `u32::MAX` while unseeded so the generator cannot sample
    /// until a seed succeeds.
    block_counter: u32,
    /// Unconsumed bytes, occupying the last `remaining` bytes of
    /// `buf`.
    remaining: usize,
    /// Reseed before sampling once `block_counter` passes this.
    reseed_threshold: u32,
    _primitive: PhantomData<P>,
}

impl<P: KeystreamPrimitive, E: EntropySource> FastKeyErasureRng<P, E> {
    /// Bytes per sample batch.
    pub(crate) const CAPACITY: usize = RANDOM_BUFFER_BLOCKS * P::BLOCK_SIZE;
    /// Bytes reserved out of every batch to rotate the key and
    /// nonce.
    pub(crate) const RESERVED: usize = P::KEY_SIZE + P::NONCE_SIZE;

    /// Creates a generator seeded from `entropy`.
    pub fn new(entropy: E) -> Result<Self, RngError> {
        const {
            assert!(
                RANDOM_BUFFER_BLOCKS * P::BLOCK_SIZE > P::KEY_SIZE + P::NONCE_SIZE,
                "sample batch must be larger than the key erasure reservation",
            );
        }

        let mut rng = Self {
            entropy,
            secrets: SecureRegion::alloc(Self::RESERVED, 8)?,
            buf: SecureRegion::alloc(Self::CAPACITY, 64)?,
            // Unsamplable until the first seed succeeds.
            block_counter: u32::MAX,
            remaining: 0,
            reseed_threshold: MAX_COUNTER_VAL,
            _primitive: PhantomData,
        };
        rng.seed()?;
        Ok(rng)
    }

    /// Replaces the key and nonce with fresh entropy, resetting the
    /// block counter.
    ///
    /// Keystream still buffered was produced under the old seed, so
    /// it is wiped rather than dispensed.
    ///
    /// On entropy failure the secrets are wiped and the block
    /// counter is pinned past every threshold: the generator stays
    /// unsamplable, so every later fill re-attempts the seed and
    /// surfaces the failure instead of generating under a wiped
    /// (all-zero) key.
    fn seed(&mut self) -> Result<(), RngError> {
        self.buf.wipe();
        self.remaining = 0;
        if let Err(err) = self.entropy.fill(self.secrets.as_mut_slice()) {
            // No partial-seed state: don't leave half-written key
            // material behind.
            self.secrets.wipe();
            self.block_counter = u32::MAX;
            return Err(err.into());
        }
        self.block_counter = 0;
        tracing::trace!("generator seeded");
        Ok(())
    }

    /// Reseeds iff the block counter has passed the threshold.
    ///
    /// Evaluated only at the start of a sample, never mid-copy.
    fn reseed_if_needed(&mut self) -> Result<(), RngError> {
        if self.block_counter > self.reseed_threshold {
            tracing::debug!(
                blocks = self.block_counter,
                "reseed threshold passed",
            );
            self.seed()?;
        }
        Ok(())
    }

    /// Generates a fresh batch of keystream, then immediately
    /// rotates the key and nonce out of the batch head (fast key
    /// erasure).
    fn new_sample(&mut self) -> Result<(), RngError> {
        self.reseed_if_needed()?;

        let (key, nonce) = self.secrets.as_slice().split_at(P::KEY_SIZE);
        P::generate(key, nonce, self.block_counter, self.buf.as_mut_slice());
        self.block_counter = self
            .block_counter
            .checked_add(BLOCKS_PER_SAMPLE)
            .assume("block counter fits in u32")?;
        self.remaining = Self::CAPACITY;

        // Same drain as dispensing: the consumed slots are zeroed,
        // so the bytes that became the new key/nonce can never be
        // served to a caller.
        let n = drain(
            self.buf.as_mut_slice(),
            &mut self.remaining,
            self.secrets.as_mut_slice(),
        );
        if n != Self::RESERVED {
            bug!("sample batch smaller than the key erasure reservation");
        }
        Ok(())
    }

    /// Copies already-sampled bytes into the front of `dst`,
    /// zeroing each slot as it is copied out.
    fn consume_existing(&mut self, dst: &mut [u8]) -> usize {
        drain(self.buf.as_mut_slice(), &mut self.remaining, dst)
    }

    /// Entirely fills `dst` with cryptographically secure
    /// pseudorandom bytes.
    ///
    /// A zero-length `dst` is a no-op. Requests larger than one
    /// sample batch simply iterate: every pass either copies
    /// buffered bytes or performs exactly one sample, so the loop
    /// always makes progress.
    pub fn try_fill_bytes(&mut self, dst: &mut [u8]) -> Result<(), RngError> {
        let mut filled = 0usize;
        while filled < dst.len() {
            let n = self.consume_existing(&mut dst[filled..]);
            if n == 0 {
                self.new_sample()?;
            }
            filled = filled.checked_add(n).assume("`filled + n <= dst.len()`")?;
        }
        Ok(())
    }

    /// Forces an immediate reseed from the entropy source.
    ///
    /// A fresh batch is sampled right away even though seeding
    /// alone would suffice for security: left empty, the buffer
    /// would force the next read into an avoidable extra sample
    /// under the brand-new seed.
    pub fn reseed(&mut self) -> Result<(), RngError> {
        self.seed()?;
        self.new_sample()
    }
}

/// Moves up to `dst.len()` bytes out of the unconsumed span of
/// `pool` (its last `*remaining` bytes), zeroing each slot as it is
/// copied out.
// `n <= *remaining <= pool.len()`, so none of the arithmetic here
// can wrap.
#[allow(clippy::arithmetic_side_effects)]
fn drain(pool: &mut [u8], remaining: &mut usize, dst: &mut [u8]) -> usize {
    debug_assert!(*remaining <= pool.len());

    let n = cmp::min(*remaining, dst.len());
    if n == 0 {
        return 0;
    }
    let start = pool.len() - *remaining;
    let src = &mut pool[start..start + n];
    dst[..n].copy_from_slice(src);
    src.zeroize();
    *remaining -= n;
    n
}

impl<P: KeystreamPrimitive, E: EntropySource> Csprng for FastKeyErasureRng<P, E> {
    fn fill_bytes(&mut self, dst: &mut [u8]) {
        // Fatal per the `Csprng` contract: an entropy failure must
        // not be masked as a degraded generator.
        self.try_fill_bytes(dst).expect("CSPRNG failure")
    }
}

// Custom Debug implementation that does not expose the key or the
// buffered keystream.
impl<P: KeystreamPrimitive, E: EntropySource> fmt::Debug for FastKeyErasureRng<P, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FastKeyErasureRng")
            .field("block_counter", &self.block_counter)
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}

/// The system generator: ChaCha20 keystream seeded from the OS
/// CSPRNG.
#[cfg(feature = "getrandom")]
#[cfg_attr(docsrs, doc(cfg(feature = "getrandom")))]
pub type SystemRng = FastKeyErasureRng<ChaCha20, OsEntropy>;

#[cfg(feature = "getrandom")]
impl SystemRng {
    /// Creates a generator seeded from the operating system.
    pub fn system() -> Result<Self, RngError> {
        Self::new(OsEntropy)
    }
}
