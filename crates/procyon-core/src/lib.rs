pub mod buffer;
pub mod consts;
pub mod curve;
pub mod error;
pub mod host;
pub mod io;
pub mod pipeline;
pub mod tracker;
