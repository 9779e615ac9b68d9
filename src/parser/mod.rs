// Parser module: turns the published value list into a Catalog.

pub mod category;
pub mod demand;
pub mod value_list_parser;

pub use demand::status_to_demand;
pub use value_list_parser::{Parser, ValueListParser};
