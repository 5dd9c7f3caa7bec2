//! Filesystem primitives for the pagefetch response cache.
//!
//! Writes go through a temporary sibling file that is renamed into place, so a
//! reader never observes a half-written file. Each call is atomic on its own;
//! callers writing several related files get no cross-file guarantee.

pub use self::error::{Error, Result};
pub use self::primitives::{AtomicWriteOptions, atomic_read, atomic_write, ensure_dir, plain_write};

mod error;
mod primitives;
