pub mod file_source;
pub mod fixtures;
pub mod map;
