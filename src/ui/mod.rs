//! Terminal presentation layer.

pub mod board;
