pub mod detail_parser;

pub use detail_parser::DetailParser;
