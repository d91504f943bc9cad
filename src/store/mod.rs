//! store: the Non-Volatile Key-Value Store.
//!
//! Разделение по подмодулям:
//! - core.rs   : NvStore: construction, initialize(), usage, medium error plumbing
//! - statics.rs: static region: registration, typed/array/raw/scalar get/set
//! - dynamic.rs: dynamic blob: set_json/get_json at the blob anchor
//! - shared.rs : SharedStore: one mutex around the whole store (multi-threaded hosts)
//!
//! NvStore has no internal locking and expects a single control thread; mutating
//! operations take `&mut self`.

pub mod core;
pub mod dynamic;
pub mod shared;
pub mod statics;

pub use self::core::{NvStore, Usage};
pub use self::shared::SharedStore;
