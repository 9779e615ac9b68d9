// Resolver module: matches normalized text chunks against the catalog.

pub mod entity_resolver;
pub mod similarity;

// Re-export the main Resolver implementation for ease of use.
pub use entity_resolver::{EntityResolver, Resolver, find_by_fragment, match_key};
