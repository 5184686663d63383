//! Uploaded-file storage backends.

mod fs;

pub use fs::FsImageStore;
