//! Entropy sources used to (re)seed the generator.

/// A source of unpredictable seed bytes.
///
/// Implementations fill the entire buffer or fail. The generator
/// treats any failure as fatal to the enclosing seed operation:
/// it is surfaced to the caller, never retried, since masking an
/// entropy failure would silently downgrade security.
pub trait EntropySource {
    /// Entirely fills `dst` with unpredictable bytes.
    ///
    /// May block for the duration of a system call.
    fn fill(&mut self, dst: &mut [u8]) -> Result<(), EntropyError>;
}

/// The operating system's CSPRNG.
///
/// Backend selection (e.g. `getrandom(2)` vs. the BCrypt API) is
/// handled per-platform by the [`getrandom`] crate.
#[cfg(feature = "getrandom")]
#[cfg_attr(docsrs, doc(cfg(feature = "getrandom")))]
#[derive(Copy, Clone, Debug, Default)]
pub struct OsEntropy;

#[cfg(feature = "getrandom")]
impl EntropySource for OsEntropy {
    fn fill(&mut self, dst: &mut [u8]) -> Result<(), EntropyError> {
        getrandom::getrandom(dst)?;
        Ok(())
    }
}

/// An entropy source failure.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum EntropyError {
    /// The system CSPRNG could not be read.
    #[cfg(feature = "getrandom")]
    #[error("system entropy source failed: {0}")]
    Os(#[from] getrandom::Error),
    /// Some other source failed.
    ///
    /// It describes what went wrong.
    #[error("entropy source failed: {0}")]
    Source(&'static str),
}
