//! Pipeline state and the fluent facade over it.

mod broom;
mod cleaning;

pub use broom::Broom;
pub use cleaning::{replay, CleaningPipeline};
