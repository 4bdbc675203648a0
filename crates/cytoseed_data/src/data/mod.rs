//! Core data structures for cytoseed cells.

pub mod cell;
pub mod geometry;
