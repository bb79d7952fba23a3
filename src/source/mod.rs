pub mod document;
pub mod json;
pub mod raw;
pub mod store;

pub use document::{extract_from_document, extract_pages, ExtractOptions};
pub use json::{deserialize, serialize};
pub use raw::{RawCell, RawColumn, RawTable, POINTS_COLUMN};
pub use store::{default_table_path, load_table, save_table};
