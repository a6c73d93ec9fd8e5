//! External service boundaries. Nothing here is touched by gameplay.

pub mod catalog;
