use core::{fmt, ptr::NonNull, slice};
use std::alloc::{Layout, alloc_zeroed, dealloc};

use zeroize::Zeroize;

use crate::{RegionError, sys};

/// An aligned heap region for secret material.
///
/// The region's pages are locked against swap when it is acquired
/// and its entire extent is overwritten with zeros before the
/// allocation is returned, whether it is dropped normally or during
/// unwinding. A released region is never observable with stale
/// content by a later allocation.
///
/// Acquisition fails outright if the pages cannot be locked.
pub struct SecureRegion {
    ptr: NonNull<u8>,
    layout: Layout,
}

impl SecureRegion {
    /// Acquires a zero-initialized region of `len` bytes aligned to
    /// `align`.
    ///
    /// `len` must be non-zero and `align` must be a power of two.
    pub fn alloc(len: usize, align: usize) -> Result<Self, RegionError> {
        if len == 0 {
            return Err(RegionError::InvalidLayout("zero-length region"));
        }
        let layout = Layout::from_size_align(len, align)
            .map_err(|_| RegionError::InvalidLayout("bad size or alignment"))?;

        // SAFETY: `layout` has a non-zero size.
        let ptr = unsafe { alloc_zeroed(layout) };
        let Some(ptr) = NonNull::new(ptr) else {
            return Err(RegionError::Alloc);
        };

        if let Err(err) = sys::lock(ptr.as_ptr(), len) {
            // Nothing secret has been written yet, so no wipe.
            //
            // SAFETY: `ptr` was returned by `alloc_zeroed` with
            // `layout` and has not been freed.
            unsafe { dealloc(ptr.as_ptr(), layout) };
            return Err(err);
        }
        Ok(Self { ptr, layout })
    }

    /// Returns the size in bytes of the region.
    ///
    /// Will always be non-zero.
    #[allow(clippy::len_without_is_empty)]
    #[inline]
    pub const fn len(&self) -> usize {
        self.layout.size()
    }

    /// Returns the region's contents.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: `ptr` points at `len` initialized bytes owned by
        // `self`; the borrow of `self` prevents mutation.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len()) }
    }

    /// Returns the region's contents.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: `ptr` points at `len` initialized bytes owned by
        // `self`; the exclusive borrow of `self` prevents aliasing.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len()) }
    }

    /// Overwrites the entire region with zeros.
    ///
    /// Uses volatile writes followed by a compiler fence, so the
    /// wipe cannot be elided even when the region is about to be
    /// released.
    #[inline]
    pub fn wipe(&mut self) {
        self.as_mut_slice().zeroize();
    }
}

impl Drop for SecureRegion {
    fn drop(&mut self) {
        self.wipe();
        if let Err(err) = sys::unlock(self.ptr.as_ptr(), self.len()) {
            // The wipe already ran; the pages merely stay pinned
            // until the process exits.
            tracing::warn!(error = %err, "unable to unlock secure region");
        }
        // SAFETY: `ptr` was returned by `alloc_zeroed` with `layout`
        // and is freed exactly once, here.
        unsafe { dealloc(self.ptr.as_ptr(), self.layout) };
    }
}

// SAFETY: `SecureRegion` exclusively owns its allocation.
unsafe impl Send for SecureRegion {}
// SAFETY: shared access is read-only via `as_slice`.
unsafe impl Sync for SecureRegion {}

impl zeroize::ZeroizeOnDrop for SecureRegion {}

// Custom Debug implementation that does not expose the contents of
// the region.
impl fmt::Debug for SecureRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureRegion")
            .field("len", &self.len())
            .field("align", &self.layout.align())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_len_rejected() {
        assert_eq!(
            SecureRegion::alloc(0, 1).unwrap_err(),
            RegionError::InvalidLayout("zero-length region"),
        );
    }

    #[test]
    fn test_non_power_of_two_align_rejected() {
        assert_eq!(
            SecureRegion::alloc(16, 3).unwrap_err(),
            RegionError::InvalidLayout("bad size or alignment"),
        );
    }

    #[test]
    fn test_alloc_is_zeroed_and_aligned() {
        let region = SecureRegion::alloc(1024, 64).expect("unable to allocate region");
        assert_eq!(region.len(), 1024);
        assert_eq!(region.as_slice().as_ptr().addr() % 64, 0);
        assert!(region.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_write_then_read() {
        let mut region = SecureRegion::alloc(32, 8).expect("unable to allocate region");
        region.as_mut_slice().copy_from_slice(&[0xA5; 32]);
        assert_eq!(region.as_slice(), &[0xA5; 32]);
    }

    /// `Drop` runs the same `wipe` routine, then releases the
    /// allocation.
    #[test]
    fn test_wipe_zeroes_entire_extent() {
        let mut region = SecureRegion::alloc(257, 1).expect("unable to allocate region");
        for (i, b) in region.as_mut_slice().iter_mut().enumerate() {
            *b = (i % 251) as u8 | 1;
        }
        region.wipe();
        assert!(region.as_slice().iter().all(|&b| b == 0));
    }
}
