//! Façade over the codec and resolver modules: one file per concern,
//! owning the file handles the lower-level codec types stay generic over.

mod flatten;
mod read;
mod write;

pub use flatten::{flatten_all, flatten_labels, flatten_paths, flatten_polygons};
pub use read::{read_library, read_records};
pub use write::write_library;
