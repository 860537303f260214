//! Verifies the destructor scrubs a region's storage before it is
//! handed back to the allocator.

use std::{
    alloc::{GlobalAlloc, Layout, System},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

use strand_secmem::SecureRegion;

/// Forwards to the system allocator, inspecting the watched
/// allocation at the moment it is released. At that point the
/// memory is still live; it only stops being ours once it is passed
/// down to [`System`].
struct WatchAlloc;

static WATCHED_ADDR: AtomicUsize = AtomicUsize::new(0);
static WATCHED_LEN: AtomicUsize = AtomicUsize::new(0);
static RELEASED: AtomicBool = AtomicBool::new(false);
static DIRTY: AtomicBool = AtomicBool::new(false);

unsafe impl GlobalAlloc for WatchAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        unsafe { System.alloc(layout) }
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        unsafe { System.alloc_zeroed(layout) }
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        unsafe { System.realloc(ptr, layout, new_size) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        if ptr.addr() == WATCHED_ADDR.load(Ordering::SeqCst)
            && layout.size() == WATCHED_LEN.load(Ordering::SeqCst)
            && !RELEASED.swap(true, Ordering::SeqCst)
        {
            // SAFETY: the allocation is live until the `System`
            // forward below.
            let data = unsafe { core::slice::from_raw_parts(ptr, layout.size()) };
            if data.iter().any(|&b| b != 0) {
                DIRTY.store(true, Ordering::SeqCst);
            }
        }
        unsafe { System.dealloc(ptr, layout) }
    }
}

#[global_allocator]
static ALLOC: WatchAlloc = WatchAlloc;

#[test]
fn test_drop_scrubs_storage_before_release() {
    let mut region = SecureRegion::alloc(512, 64).expect("unable to allocate region");
    WATCHED_ADDR.store(region.as_slice().as_ptr().addr(), Ordering::SeqCst);
    WATCHED_LEN.store(region.len(), Ordering::SeqCst);
    region.as_mut_slice().fill(0xEE);
    drop(region);

    assert!(
        RELEASED.load(Ordering::SeqCst),
        "region was never handed back to the allocator"
    );
    assert!(
        !DIRTY.load(Ordering::SeqCst),
        "secret bytes reached the allocator"
    );
}
