//! # EventPass Store
//!
//! Storage abstraction for EventPass. Device storage is modelled as a
//! process-wide key-value store addressed by fixed string keys, with each
//! value holding one whole JSON-serialized collection.
//!
//! ## Key Types
//!
//! - [`KvStore`] - The async trait for raw key-value access
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`Repository`] - Load/save interface the contexts program against
//! - [`JsonSlot`] - A [`Repository`] that rewrites one JSON value per key
//! - [`CollectionKey`] - The fixed keys, one per collection
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use eventpass_store::{CollectionKey, JsonSlot, Repository, SqliteStore};
//!
//! async fn example() {
//!     let store = Arc::new(SqliteStore::open("eventpass.db").unwrap());
//!     let slot: JsonSlot<_, Vec<String>> =
//!         JsonSlot::new(store, CollectionKey::MessageTemplates.storage_key("@eventpass/"));
//!
//!     slot.save(&vec!["hello".to_string()]).await.unwrap();
//!     let loaded = slot.load().await.unwrap();
//!     assert_eq!(loaded, Some(vec!["hello".to_string()]));
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Whole-value rewrite**: every save replaces the full serialized value
//! - **Last write wins**: there are no versions or compare-and-swap
//! - **Repository seam**: callers depend on [`Repository`], so per-record
//!   storage can replace [`JsonSlot`] without touching them

pub mod error;
pub mod keys;
pub mod memory;
pub mod migration;
pub mod slot;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use keys::CollectionKey;
pub use memory::MemoryStore;
pub use slot::JsonSlot;
pub use sqlite::SqliteStore;
pub use traits::{KvStore, Repository};
