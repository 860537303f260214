//! A cryptographically secure pseudorandom number generator with
//! fast key erasure.
//!
//! # Overview
//!
//! [`FastKeyErasureRng`] samples keystream from a stream-cipher
//! block transform in fixed-size batches. Immediately after each
//! batch is generated, a prefix of it replaces the current key and
//! nonce and is zeroed in place, so a compromise of the present
//! state reveals neither bytes already dispensed (backward
//! security) nor lets dispensed bytes predict future output
//! (forward security). Every byte handed to a caller is zeroed as
//! it leaves the buffer, and all key material lives in locked,
//! wipe-on-release memory from [`strand_secmem`].
//!
//! The concrete transform and the entropy source are both
//! pluggable: see [`KeystreamPrimitive`](keystream::KeystreamPrimitive)
//! and [`EntropySource`](entropy::EntropySource). The defaults are
//! ChaCha20 seeded from the operating system ([`SystemRng`]).
//!
//! For more information on fast key erasure, see
//! <https://blog.cr.yp.to/20170723-random.html>.
//!
//! # Example
//!
//! ```
//! use strand_rng::{Random, SystemRng};
//!
//! # fn main() -> Result<(), strand_rng::RngError> {
//! let mut rng = SystemRng::system()?;
//! let key: [u8; 32] = Random::random(&mut rng);
//! # let _ = key;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod csprng;
pub mod entropy;
mod error;
mod generator;
pub mod keystream;
#[cfg(any(test, feature = "test_util"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test_util")))]
pub mod test_util;

pub use csprng::{Csprng, Random};
pub use error::RngError;
pub use generator::{FastKeyErasureRng, MAX_COUNTER_VAL, RANDOM_BUFFER_BLOCKS};
#[cfg(feature = "getrandom")]
#[cfg_attr(docsrs, doc(cfg(feature = "getrandom")))]
pub use generator::SystemRng;
