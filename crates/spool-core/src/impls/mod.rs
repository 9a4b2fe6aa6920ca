//! Impls - the two stores behind the [`JobStore`](crate::ports::JobStore) port.
//!
//! # Stores
//! - **FileStore**: one append-only record file per channel.
//! - **SqliteStore**: one row per job in a deployment-owned table.

pub mod file_store;
pub mod record;
pub mod sqlite_store;

pub use self::file_store::FileStore;
pub use self::sqlite_store::{ColumnNames, SqliteStore, TableSpec};
