//! Writing the bundle to disk.

pub mod sink;
pub mod writer;

pub use sink::{FsOutputWriter, OutputWriter, PrewrittenOutput};
pub use writer::{temp_path_for, write_atomic, write_bundle_to};
