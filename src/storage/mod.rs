// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Storage backends for engine state.
//!
//! The engine persists two small JSON blobs (visitor and session records)
//! plus a read-only admin flag through the [`StateStore`] port. Two
//! implementations ship with the crate:
//!
//! - [`MemoryStore`]: DashMap-backed, for tests and embedded hosts
//! - [`JsonFileStore`]: a single JSON file, the durable analog of an
//!   origin-scoped browser store (last-write-wins across processes)

pub mod traits;
pub mod memory;
pub mod file;

pub use traits::{StateStore, StorageError};
pub use memory::MemoryStore;
pub use file::JsonFileStore;
