//! Per-platform page pinning.

use cfg_if::cfg_if;

use crate::RegionError;

cfg_if! {
    if #[cfg(unix)] {
        use core::ffi::c_void;

        pub(crate) fn lock(ptr: *mut u8, len: usize) -> Result<(), RegionError> {
            // SAFETY: `ptr..ptr+len` is a single live allocation
            // exclusively owned by the caller.
            unsafe { rustix::mm::mlock(ptr.cast::<c_void>(), len) }
                .map_err(RegionError::Lock)
        }

        pub(crate) fn unlock(ptr: *mut u8, len: usize) -> Result<(), RegionError> {
            // SAFETY: see `lock`.
            unsafe { rustix::mm::munlock(ptr.cast::<c_void>(), len) }
                .map_err(RegionError::Lock)
        }
    } else {
        pub(crate) fn lock(_ptr: *mut u8, _len: usize) -> Result<(), RegionError> {
            Err(RegionError::Unsupported)
        }

        // `lock` always fails here, so there is never anything to
        // unlock.
        pub(crate) fn unlock(_ptr: *mut u8, _len: usize) -> Result<(), RegionError> {
            Ok(())
        }
    }
}
