pub mod export;
pub mod merge;
pub mod parser;
pub mod reader;
pub mod stats;
pub mod types;
pub mod validate;
pub mod writer;

pub use parser::parse_shard_source;
pub use reader::load_index;
pub use types::*;
pub use validate::validate_index;
pub use writer::IndexWriter;
