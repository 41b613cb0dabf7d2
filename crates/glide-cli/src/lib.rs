//! Glide CLI - simulation helpers and the `alternates` tool.
//!
//! The binaries in this crate:
//! - alternates: flies a descending glide over a field of landables and
//!   prints the ranked landing alternates at every step

pub mod sim;
