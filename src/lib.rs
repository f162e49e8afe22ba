pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod geometry;
pub mod render;
// cmd and reports are modules of the binary crate (main.rs).
