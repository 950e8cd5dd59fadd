//! Tab-specific content rendering.

pub mod assessment;
pub mod history;
pub mod settings;
pub mod welcome;
