//! Cache implementations for querylens.

pub mod in_memory;
pub mod key;
pub mod noop;
pub mod typed;

pub use in_memory::InMemoryCache;
pub use key::{hashed_key, profile_key};
pub use noop::NoopCache;
pub use typed::{get_json, set_json};
