//! Utility functions

mod common;
mod id_gen;

pub use common::{format_timestamp, normalize_timestamp, now_timestamp, parse_timestamp};
pub use id_gen::generate_id;
