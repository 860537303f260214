/// Encompasses the different errors directly returned by this
/// crate.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum RegionError {
    /// The requested size or alignment cannot be allocated.
    ///
    /// It describes why the layout is invalid.
    #[error("invalid region layout: {0}")]
    InvalidLayout(&'static str),
    /// The allocator could not satisfy the request.
    #[error("region allocation failed")]
    Alloc,
    /// The platform refused to pin the region's pages against
    /// swap.
    #[cfg(unix)]
    #[error("unable to lock region pages: {0}")]
    Lock(#[source] rustix::io::Errno),
    /// The platform has no memory locking primitive.
    #[error("memory locking is not supported on this platform")]
    Unsupported,
}
