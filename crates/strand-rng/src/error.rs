use buggy::Bug;
use strand_secmem::RegionError;

use crate::entropy::EntropyError;

/// Encompasses the different errors directly returned by this
/// crate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RngError {
    /// The entropy source could not be read.
    #[error(transparent)]
    Entropy(#[from] EntropyError),
    /// The secure memory substrate failed.
    #[error(transparent)]
    Memory(#[from] RegionError),
    /// An internal bug was discovered.
    #[error(transparent)]
    Bug(#[from] Bug),
}
