pub mod data;

pub use data::cell::*;
pub use data::geometry::*;
