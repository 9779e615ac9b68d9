// Fetcher module: retrieves the raw value list for ingestion.

pub mod google_docs;
pub mod traits;

pub use google_docs::GoogleDocsFetcher;
pub use traits::CatalogSource;
