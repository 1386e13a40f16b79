//! Deterministic binary serialization.
//!
//! Engine snapshots are serialized using bincode with a deterministic
//! configuration, so the same state always produces the same bytes and the
//! same digest on every platform.

mod bincode_config;

pub use bincode_config::{serialize, deserialize, serialized_size};
