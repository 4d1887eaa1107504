//! System importers.
//!
//! - [`load_system`] - JSON or YAML system descriptor
//! - [`load_system_cache`] / [`write_system_cache`] - serialized system kept
//!   next to the descriptor so later runs can skip re-reading it, used only
//!   while [`cache_is_current`]

pub mod cache;
pub mod descriptor;

pub use cache::{cache_is_current, cache_path, load_system_cache, write_system_cache};
pub use descriptor::{load_system, parse_system_json};
