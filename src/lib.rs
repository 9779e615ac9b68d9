//! Resolves catalog items named in noisy OCR text and values a trade.
//!
//! The core is [`normalizer`] plus [`resolver`]: both are synchronous and read the
//! [`Catalog`](model::Catalog) without mutating it. Everything else (fetching, caching and
//! parsing the value list, aggregating values) feeds or consumes that core.

pub mod aggregator;
pub mod config;
pub mod fetcher;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod report;
pub mod resolver;
pub mod storage;
pub mod utils;
pub mod value_list;

pub use model::{Catalog, CatalogRecord, Match, ResolutionResult};
pub use normalizer::{Normalizer, normalize};
pub use resolver::{EntityResolver, Resolver};
