//! Run output.
//!
//! Flat JSON files under a dated run directory.

pub mod writer;

pub use writer::{clean_payload, write_json, RunLayout};
