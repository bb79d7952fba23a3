pub mod model;
pub mod table;

pub use model::{Direction, ScoringModel, DEFAULT_DEGREE};
pub use table::ScoringTable;
