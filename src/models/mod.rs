//! Data models for Amor Fati assessments.
//!
//! This module contains the data structures shared across the app:
//!
//! - `Dimension`, `Priority`: the five fixed axes and the focus selection
//! - `DimensionScores`, `Assessment`: one completed scoring event
//! - `AppData`, `Settings`: the persisted application state blob

pub mod assessment;
pub mod data;
pub mod dimension;

pub use assessment::{Assessment, DimensionScores};
pub use data::AppData;
pub use dimension::{
    Dimension, Priority, ALL_DIMENSIONS, ALL_PRIORITIES, MAX_DIMENSION_SCORE, MAX_TOTAL_SCORE,
};
