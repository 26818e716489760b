//! Filesystem adapters.

mod dir;
mod local;
mod memory;

pub use dir::DirFilesystem;
pub use local::LocalFilesystem;
pub use memory::MemoryFilesystem;
