pub mod key;
pub mod search;

pub use key::{normalize_discipline, EventKey, Gender, Modifier};
pub use search::{search, EventQuery};
