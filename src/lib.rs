//! Athletics scoring tables: convert marks to points, points to marks, and
//! marks in one event to equivalent marks in another.
//!
//! A [`ScoringTable`] is built from a [`source::RawTable`] (read from the
//! JSON cache or extracted from the scoring document text). Each event's
//! mark/points relationship is approximated by a least-squares polynomial,
//! fitted lazily and cached per table.

pub mod config;
pub mod error;
pub mod event;
pub mod mark;
pub mod output;
pub mod scoring;
pub mod source;

pub use error::ScoringError;
pub use event::{EventKey, EventQuery, Gender, Modifier};
pub use mark::Mark;
pub use scoring::{Direction, ScoringModel, ScoringTable};
