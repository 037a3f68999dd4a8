//! Ladder competition workflows
//!
//! Match recording with rating persistence, and standings queries over the
//! enrolled teams of a ladder.

pub mod recorder;
pub mod standings;

pub use recorder::{MatchRecorder, NewMatch, RecordedMatch};
pub use standings::{standings, StandingsRow};
