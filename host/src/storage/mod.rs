//! Plan storage backends.

mod file;

pub use file::FilePlanRepository;
