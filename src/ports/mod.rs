pub mod listing_source;
pub mod map_surface;
