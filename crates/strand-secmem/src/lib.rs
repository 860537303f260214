//! Secure memory for Strand.
//!
//! Secret material (keys, nonces, keystream that has not yet been
//! dispensed) lives inside a [`SecureRegion`]: an aligned heap region
//! whose pages are locked against swap on acquisition and whose entire
//! extent is overwritten with zeros before the allocation is returned,
//! on every exit path.
//!
//! If the platform cannot pin the pages, acquisition fails. There is no
//! mode where secrets are silently held in swappable memory.
//!
//! # Operating System Support
//!
//! - Linux
//! - MacOS

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

mod error;
mod region;
mod sys;

pub use error::RegionError;
pub use region::SecureRegion;
