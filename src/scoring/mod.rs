//! Scoring and history computations.
//!
//! - `recommend`: the canned recommendation list derived from the scores
//!   and the selected priority
//! - `evolution`: delta comparison between the two most recent records

pub mod evolution;
pub mod recommend;

pub use evolution::{compare_latest, delta_label, Evolution, INSUFFICIENT_DATA_MESSAGE};
pub use recommend::recommendations;
