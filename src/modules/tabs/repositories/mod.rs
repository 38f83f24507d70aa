pub mod catalog_repository;
pub mod memory;
pub mod tab_repository;

pub use catalog_repository::{CatalogStore, MySqlCatalogStore};
pub use memory::{MemoryCatalogStore, MemoryTabStore};
pub use tab_repository::{MySqlTabStore, TabStore};
