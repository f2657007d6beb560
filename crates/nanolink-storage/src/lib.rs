//! Mapping store backends for NanoLink.
//!
//! Every backend enforces short code uniqueness inside the store itself
//! (a unique index for the SQL backends, the map's entry API for the
//! in-memory one), so concurrent inserts of the same code cannot both win.

pub mod cached;
pub mod memory;
pub mod mysql;
mod pool;
pub mod sqlite;

pub use cached::CachedRepository;
pub use memory::InMemoryRepository;
pub use mysql::MySqlRepository;
pub use pool::PoolSettings;
pub use sqlite::SqliteRepository;

pub use nanolink_core::repository::{ReadRepository, Repository, Result};
pub use nanolink_core::StorageError;
