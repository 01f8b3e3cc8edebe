pub mod cache;
pub mod render;
pub mod sessions;
