pub mod catalog;
pub mod entry;

pub use catalog::*;
pub use entry::*;
