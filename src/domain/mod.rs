pub mod filter;
pub mod listing;
pub mod selection;
pub mod view_mode;
