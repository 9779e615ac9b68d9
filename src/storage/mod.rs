// Storage module: JSON cache of the fetched catalog.

pub mod cache;

pub use cache::{CachedCatalog, CatalogCache};
