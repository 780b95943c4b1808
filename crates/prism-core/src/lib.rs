pub mod buffer;
pub mod config;
pub mod consts;
pub mod decompose;
pub mod error;
pub mod geometry;
pub mod io;
pub mod task;
pub mod viewport;
