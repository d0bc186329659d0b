pub mod map_sync;
pub mod session;
pub mod view;
