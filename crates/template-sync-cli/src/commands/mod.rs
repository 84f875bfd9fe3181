pub mod format;
pub mod list;
pub mod sources;
pub mod sync;
