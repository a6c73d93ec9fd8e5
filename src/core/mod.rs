//! Host-facing plumbing shared across the crate.

pub mod input;
